#![forbid(unsafe_code)]

use std::collections::VecDeque;

use ndarray::Array2;
use rand::Rng;
use sampler::Strategy;
use tokenize::{detokenize, tokenize, Vocabulary};

use crate::codec::Codec;
use crate::config::resolve_window_len;
use crate::error::{PipelineError, Result};

/// The external next-token model, seen from the pipeline.
pub trait NextTokenModel {
    /// Input window the model was built for, when it knows one.
    fn window_len(&self) -> Option<usize> {
        None
    }

    /// Distribution over the vocabulary for one `[window_len, vocab_len]`
    /// one-hot window.
    fn predict(&self, window: &Array2<f32>) -> Vec<f32>;
}

/// Autoregressive loop: encode the last window, predict, decode, append.
pub struct Generator<'a, M: NextTokenModel + ?Sized> {
    model: &'a M,
    codec: Codec<'a>,
    window_len: usize,
    strategy: Strategy,
}

impl<'a, M: NextTokenModel + ?Sized> Generator<'a, M> {
    /// Greedy generator. The model's own window length overrides `configured_window`.
    pub fn new(model: &'a M, vocab: &'a Vocabulary, configured_window: usize) -> Result<Self> {
        let window_len = resolve_window_len(model.window_len(), configured_window);
        if window_len == 0 {
            return Err(PipelineError::Config("sequence_length must be >= 1".into()));
        }
        Ok(Self {
            model,
            codec: Codec::new(vocab),
            window_len,
            strategy: Strategy::Greedy,
        })
    }

    /// Decode with `strategy` instead of arg-max.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Window length in use.
    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Seed tokens followed by `count` generated tokens.
    pub fn run<R: Rng + ?Sized>(
        &self,
        seed_text: &str,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<String>> {
        let mut stream = tokenize(seed_text);
        if stream.len() < self.window_len {
            return Err(PipelineError::SeedTooShort {
                needed: self.window_len,
                got: stream.len(),
            });
        }
        let mut window = stream
            .iter()
            .skip(stream.len() - self.window_len)
            .map(|t| self.codec.encode(t))
            .collect::<Result<VecDeque<usize>>>()?;

        for _ in 0..count {
            let input = self.codec.encode_indices(window.make_contiguous())?;
            let distribution = self.model.predict(&input);
            let index = self.codec.decode_with(&distribution, self.strategy, rng)?;
            stream.push(self.codec.token(index)?.to_string());
            window.pop_front();
            window.push_back(index);
        }
        log::debug!("generated {} tokens from a {}-token seed", count, stream.len() - count);
        Ok(stream)
    }

    /// `run`, rebuilt into readable text.
    pub fn run_text<R: Rng + ?Sized>(
        &self,
        seed_text: &str,
        count: usize,
        rng: &mut R,
    ) -> Result<String> {
        Ok(detokenize(&self.run(seed_text, count, rng)?))
    }
}
