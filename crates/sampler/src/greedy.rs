use crate::SamplerError;

/// Index of the largest entry. Ties go to the lowest index; NaN never wins.
pub fn argmax(probs: &[f32]) -> Result<usize, SamplerError> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &p) in probs.iter().enumerate() {
        match best {
            Some((_, b)) if !(p > b) => {}
            None if p.is_nan() => {}
            _ => best = Some((i, p)),
        }
    }
    match best {
        Some((i, _)) => Ok(i),
        // all NaN: still a valid slot, pick the first
        None if !probs.is_empty() => Ok(0),
        None => Err(SamplerError::EmptyDistribution),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn picks_peak() {
        assert_eq!(argmax(&[0.0, 0.0, 0.7, 0.3]), Ok(2));
    }

    #[test]
    fn ties_break_low() {
        assert_eq!(argmax(&[0.25, 0.5, 0.5, 0.25]), Ok(1));
    }

    #[test]
    fn empty_is_error() {
        assert_eq!(argmax(&[]), Err(SamplerError::EmptyDistribution));
    }

    #[test]
    fn nan_is_ignored() {
        assert_eq!(argmax(&[f32::NAN, 0.1, 0.2]), Ok(2));
    }

    quickcheck! {
        fn one_hot_decodes_to_its_index(i: u8, extra: u8) -> bool {
            let len = i as usize + 1 + extra as usize % 8;
            let mut v = vec![0.0f32; len];
            v[i as usize] = 1.0;
            argmax(&v) == Ok(i as usize)
        }
    }
}
