use rand::Rng;

use crate::{argmax, sample_index, softmax, SamplerError};

/// Draw an index from `probs` after temperature scaling.
///
/// `probs` is a probability vector (negative entries count as zero). The
/// scaled distribution is `(p / p_max)^(1/t)` renormalized, computed in log
/// space so the peak always scales to exactly 1: small `t` sharpens toward
/// arg-max, `t = 1` leaves it unchanged, large `t` flattens it. A
/// distribution with no finite positive mass falls back to arg-max.
pub fn sample_with_temperature<R: Rng + ?Sized>(
    probs: &[f32],
    temperature: f32,
    rng: &mut R,
) -> Result<usize, SamplerError> {
    if !temperature.is_finite() || temperature <= 0.0 {
        return Err(SamplerError::InvalidTemperature(temperature));
    }
    if probs.is_empty() {
        return Err(SamplerError::EmptyDistribution);
    }
    let peak = probs.iter().copied().filter(|&p| p > 0.0).fold(0.0_f32, f32::max);
    if peak <= 0.0 || !peak.is_finite() {
        return argmax(probs);
    }
    let log_peak = peak.ln();
    let mut scaled: Vec<f32> = probs
        .iter()
        .map(|&p| {
            if p > 0.0 {
                (p.ln() - log_peak) / temperature
            } else {
                f32::NEG_INFINITY
            }
        })
        .collect();
    softmax(&mut scaled);
    let mass: f32 = scaled.iter().sum();
    if !mass.is_finite() || mass <= 0.0 {
        return argmax(probs);
    }
    Ok(sample_index(&scaled, rng))
}
