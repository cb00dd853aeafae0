#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
#![deny(missing_docs, unused_must_use)]

//! Token sampling strategies over a next-token distribution: greedy and temperature.
//!
//! Contract: `Strategy::Greedy` is deterministic and needs no RNG state;
//! `Strategy::Temperature` draws from a caller-owned RNG so runs are
//! reproducible per seed.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Arg-max decoding.
pub mod greedy;
/// Temperature-scaled stochastic decoding.
pub mod temperature;

pub use greedy::argmax;
pub use temperature::sample_with_temperature;

/// Error type for samplers
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SamplerError {
    /// Distribution has no entries
    #[error("empty distribution")]
    EmptyDistribution,
    /// Temperature must be finite and > 0
    #[error("invalid temperature: {0}")]
    InvalidTemperature(f32),
}

/// How a distribution is turned into one index.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Strategy {
    /// Highest probability, lowest index on ties.
    #[default]
    Greedy,
    /// Rescale by the temperature and draw.
    Temperature(f32),
}

impl Strategy {
    /// Greedy when `temperature` is `None`, temperature sampling otherwise.
    pub fn from_temperature(temperature: Option<f32>) -> Self {
        temperature.map_or(Self::Greedy, Self::Temperature)
    }

    /// Pick one index from `probs`.
    pub fn pick<R: Rng + ?Sized>(&self, probs: &[f32], rng: &mut R) -> Result<usize, SamplerError> {
        match *self {
            Self::Greedy => argmax(probs),
            Self::Temperature(t) => sample_with_temperature(probs, t, rng),
        }
    }
}

/// Minimal softmax implementation for logits slice
pub fn softmax(logits: &mut [f32]) {
    if logits.is_empty() {
        return;
    }
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0_f32;
    for v in logits.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    if sum == 0.0 || !sum.is_finite() {
        return;
    }
    for v in logits.iter_mut() {
        *v /= sum;
    }
}

/// Simple RNG wrapper returning a seeded ChaCha8Rng
pub fn make_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Sample index from probabilities using provided RNG
pub fn sample_index<R: Rng + ?Sized>(probs: &[f32], rng: &mut R) -> usize {
    let total: f32 = probs.iter().sum();
    let r: f32 = rng.gen::<f32>() * total;
    let mut acc = 0.0_f32;
    for (i, &p) in probs.iter().enumerate() {
        acc += p;
        if p > 0.0 && r < acc {
            return i;
        }
    }
    // float drift: fall back to the last non-zero entry
    probs.iter().rposition(|&p| p > 0.0).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn softmax_sums_to_one() {
        let mut v = vec![1.0, 2.0, 3.0];
        softmax(&mut v);
        let s: f32 = v.iter().sum();
        assert!((s - 1.0).abs() < 1e-6);
        assert!(v[2] > v[1] && v[1] > v[0]);
    }

    #[test]
    fn sample_index_skips_zero_mass() {
        let mut rng = make_rng(7);
        for _ in 0..200 {
            let i = sample_index(&[0.0, 1.0, 0.0], &mut rng);
            assert_eq!(i, 1);
        }
    }

    #[test]
    fn default_strategy_is_greedy() {
        let mut rng = make_rng(1);
        assert_eq!(Strategy::default(), Strategy::Greedy);
        assert_eq!(Strategy::from_temperature(None).pick(&[0.1, 0.6, 0.3], &mut rng), Ok(1));
    }
}
