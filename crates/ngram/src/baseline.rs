#![forbid(unsafe_code)]

use std::collections::HashMap;

use ndarray::Array2;

use crate::generate::NextTokenModel;
use crate::sequence::Sample;

/// Bigram stand-in for a trained network: predicts the next token from how
/// often each token followed the window's last token in the samples.
///
/// Lets the generation loop run without an external model.
#[derive(Debug, Clone, Default)]
pub struct CountingModel {
    vocab_len: usize,
    follows: HashMap<usize, Vec<u32>>,
    unigram: Vec<u32>,
}

impl CountingModel {
    /// Count `(last context token, target)` pairs.
    pub fn fit(samples: &[Sample], vocab_len: usize) -> Self {
        let mut follows: HashMap<usize, Vec<u32>> = HashMap::new();
        let mut unigram = vec![0u32; vocab_len];
        for s in samples {
            if let Some(n) = unigram.get_mut(s.target) {
                *n += 1;
            }
            if let Some(&last) = s.context.last() {
                let row = follows.entry(last).or_insert_with(|| vec![0; vocab_len]);
                if let Some(n) = row.get_mut(s.target) {
                    *n += 1;
                }
            }
        }
        log::debug!("counting model: {} contexts over {} tokens", follows.len(), vocab_len);
        Self {
            vocab_len,
            follows,
            unigram,
        }
    }

    fn normalize(counts: &[u32], len: usize) -> Vec<f32> {
        let total: u32 = counts.iter().sum();
        if total == 0 {
            return vec![1.0 / len.max(1) as f32; len];
        }
        counts.iter().map(|&c| c as f32 / total as f32).collect()
    }
}

impl NextTokenModel for CountingModel {
    fn predict(&self, window: &Array2<f32>) -> Vec<f32> {
        let last = window
            .rows()
            .into_iter()
            .last()
            .and_then(|row| sampler::argmax(&row.to_vec()).ok());
        match last.and_then(|i| self.follows.get(&i)) {
            Some(row) => Self::normalize(row, self.vocab_len),
            None => Self::normalize(&self.unigram, self.vocab_len),
        }
    }
}
