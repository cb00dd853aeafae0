#![forbid(unsafe_code)]

use ndarray::{Array2, Array3, Axis};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::codec::write_one_hot;
use crate::error::{PipelineError, Result};
use crate::sequence::Sample;

/// One encoded batch, ready for the training loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// `[batch_size, window_len, vocab_len]` one-hot contexts.
    pub inputs: Array3<f32>,
    /// `[batch_size, vocab_len]` one-hot targets.
    pub labels: Array2<f32>,
}

impl Batch {
    /// Number of samples in the batch.
    pub fn len(&self) -> usize {
        self.labels.nrows()
    }

    /// True for a batch with no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lazy, restartable producer of encoded batches.
///
/// Holds only the sample order. Each epoch hands out `batches_per_epoch`
/// batches; only the batch being pulled is ever one-hot encoded.
#[derive(Debug, Clone)]
pub struct BatchGenerator<'a> {
    samples: &'a [Sample],
    vocab_len: usize,
    window_len: usize,
    batch_size: usize,
    batches_per_epoch: usize,
    order: Vec<usize>,
    rng: Option<ChaCha8Rng>,
    epochs: usize,
}

impl<'a> BatchGenerator<'a> {
    /// Generator over `samples` in their stored order.
    ///
    /// `batches_per_epoch = min(samples / batch_size, limit)`.
    pub fn new(
        samples: &'a [Sample],
        vocab_len: usize,
        window_len: usize,
        batch_size: usize,
        limit: Option<usize>,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(PipelineError::Config("batch_size must be >= 1".into()));
        }
        if window_len == 0 {
            return Err(PipelineError::Config("sequence_length must be >= 1".into()));
        }
        if limit == Some(0) {
            return Err(PipelineError::Config("batch_count_limit must be >= 1".into()));
        }
        let full = samples.len() / batch_size;
        let batches_per_epoch = limit.map_or(full, |l| full.min(l));
        Ok(Self {
            samples,
            vocab_len,
            window_len,
            batch_size,
            batches_per_epoch,
            order: (0..samples.len()).collect(),
            rng: None,
            epochs: 0,
        })
    }

    /// Reshuffle the full sample order at the start of every epoch.
    pub fn shuffled(mut self, seed: u64) -> Self {
        self.rng = Some(sampler::make_rng(seed));
        self
    }

    /// Batches handed out per epoch.
    pub fn batches_per_epoch(&self) -> usize {
        self.batches_per_epoch
    }

    /// Samples per batch.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Epochs started so far.
    pub fn epochs_started(&self) -> usize {
        self.epochs
    }

    /// Start a new epoch from the first batch.
    pub fn epoch(&mut self) -> Epoch<'_> {
        if let Some(rng) = self.rng.as_mut() {
            self.order.shuffle(rng);
        }
        self.epochs += 1;
        log::debug!(
            "epoch {}: {} batches of {}",
            self.epochs,
            self.batches_per_epoch,
            self.batch_size
        );
        Epoch {
            samples: self.samples,
            order: &self.order,
            vocab_len: self.vocab_len,
            window_len: self.window_len,
            batch_size: self.batch_size,
            next: 0,
            total: self.batches_per_epoch,
        }
    }
}

/// Pull-based iterator over one epoch's batches.
#[derive(Debug)]
pub struct Epoch<'g> {
    samples: &'g [Sample],
    order: &'g [usize],
    vocab_len: usize,
    window_len: usize,
    batch_size: usize,
    next: usize,
    total: usize,
}

impl Epoch<'_> {
    fn encode(&self, picks: &[usize]) -> Result<Batch> {
        let mut inputs = Array3::<f32>::zeros((picks.len(), self.window_len, self.vocab_len));
        let mut labels = Array2::<f32>::zeros((picks.len(), self.vocab_len));
        let rows = inputs.axis_iter_mut(Axis(0)).zip(labels.rows_mut());
        for ((mut input, label), &pick) in rows.zip(picks) {
            let sample = self.samples.get(pick).ok_or(PipelineError::Index {
                index: pick,
                len: self.samples.len(),
            })?;
            if sample.context.len() != self.window_len {
                return Err(PipelineError::Config(format!(
                    "sample context has {} tokens, window is {}",
                    sample.context.len(),
                    self.window_len
                )));
            }
            for (pos, &token) in input.rows_mut().into_iter().zip(&sample.context) {
                write_one_hot(pos, token)?;
            }
            write_one_hot(label, sample.target)?;
        }
        Ok(Batch { inputs, labels })
    }
}

impl Iterator for Epoch<'_> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total {
            return None;
        }
        let start = self.next * self.batch_size;
        let picks = self.order.get(start..start + self.batch_size)?;
        self.next += 1;
        Some(self.encode(picks))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total.saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for Epoch<'_> {}
