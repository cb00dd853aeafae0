#![forbid(unsafe_code)]

use std::collections::HashSet;

use tokenize::{filter_with_table, tokenize, FrequencyTable, Vocabulary};

use crate::batch::BatchGenerator;
use crate::codec::Codec;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::sequence::{index_samples, Sample};

/// Everything one pipeline run derives from its corpus.
///
/// Built once, read-only afterwards. Batch generators and codecs borrow
/// from it, so several of them can run off the same context.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    tokens: Vec<String>,
    frequencies: FrequencyTable,
    vocabulary: Vocabulary,
    removed: HashSet<String>,
    samples: Vec<Sample>,
    window_len: usize,
}

impl PipelineContext {
    /// Tokenize `text`, build and filter the vocabulary, index samples.
    pub fn from_corpus(text: &str, config: &PipelineConfig) -> Result<Self> {
        config.validate()?;
        let tokens = tokenize(text);
        let frequencies = FrequencyTable::count(&tokens);
        let candidates = Vocabulary::build(&tokens);
        let outcome = filter_with_table(&candidates, &frequencies, config.min_token_frequency)?;
        let samples =
            index_samples(&tokens, config.sequence_length, &outcome.removed, &outcome.retained)?;
        log::info!(
            "pipeline: {} tokens, vocabulary {} (removed {}), {} samples of window {}",
            tokens.len(),
            outcome.retained.len(),
            outcome.removed.len(),
            samples.len(),
            config.sequence_length
        );
        Ok(Self {
            tokens,
            frequencies,
            vocabulary: outcome.retained,
            removed: outcome.removed,
            samples,
            window_len: config.sequence_length,
        })
    }

    /// Index `text` against a fixed, previously saved vocabulary.
    ///
    /// Corpus tokens the vocabulary lacks count as removed, so windows that
    /// touch them are dropped.
    pub fn from_corpus_with_vocabulary(
        text: &str,
        vocabulary: Vocabulary,
        window_len: usize,
    ) -> Result<Self> {
        let tokens = tokenize(text);
        let frequencies = FrequencyTable::count(&tokens);
        let removed: HashSet<String> = frequencies
            .iter()
            .filter(|(t, _)| !vocabulary.contains(t))
            .map(|(t, _)| t.to_string())
            .collect();
        let samples = index_samples(&tokens, window_len, &removed, &vocabulary)?;
        log::info!(
            "pipeline: {} tokens against fixed vocabulary {} ({} unknown), {} samples",
            tokens.len(),
            vocabulary.len(),
            removed.len(),
            samples.len()
        );
        Ok(Self {
            tokens,
            frequencies,
            vocabulary,
            removed,
            samples,
            window_len,
        })
    }

    /// Context with a vocabulary and no corpus, for generation only.
    pub fn for_generation(vocabulary: Vocabulary, window_len: usize) -> Result<Self> {
        if window_len == 0 {
            return Err(PipelineError::Config("sequence_length must be >= 1".into()));
        }
        Ok(Self {
            tokens: Vec::new(),
            frequencies: FrequencyTable::default(),
            vocabulary,
            removed: HashSet::new(),
            samples: Vec::new(),
            window_len,
        })
    }

    /// Corpus tokens in order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Counts over the whole corpus.
    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    /// Vocabulary after frequency filtering.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Tokens removed by the filter.
    pub fn removed(&self) -> &HashSet<String> {
        &self.removed
    }

    /// Indexed samples.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Window length the samples were built with.
    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Codec over this context's vocabulary.
    pub fn codec(&self) -> Codec<'_> {
        Codec::new(&self.vocabulary)
    }

    /// Batch generator over all samples.
    pub fn batches(&self, config: &PipelineConfig) -> Result<BatchGenerator<'_>> {
        self.generator_over(&self.samples, config)
    }

    /// Split samples into `(train, validation)`; the last
    /// `validation_fraction` of the samples go to validation.
    pub fn split(&self, validation_fraction: f64) -> Result<(&[Sample], &[Sample])> {
        if !(0.0..=1.0).contains(&validation_fraction) {
            return Err(PipelineError::Config(format!(
                "validation fraction {validation_fraction} outside [0, 1]"
            )));
        }
        let held = (self.samples.len() as f64 * validation_fraction).round() as usize;
        let cut = self.samples.len().saturating_sub(held);
        Ok(self.samples.split_at(cut))
    }

    /// Train and validation generators sharing this context.
    pub fn split_batches(
        &self,
        config: &PipelineConfig,
        validation_fraction: f64,
    ) -> Result<(BatchGenerator<'_>, BatchGenerator<'_>)> {
        let (train, validation) = self.split(validation_fraction)?;
        let train = self.generator_over(train, config)?;
        let mut val_config = config.clone();
        val_config.shuffle = false;
        let validation = self.generator_over(validation, &val_config)?;
        Ok((train, validation))
    }

    fn generator_over<'a>(
        &'a self,
        samples: &'a [Sample],
        config: &PipelineConfig,
    ) -> Result<BatchGenerator<'a>> {
        let generator = BatchGenerator::new(
            samples,
            self.vocabulary.len(),
            self.window_len,
            config.batch_size,
            config.batch_count_limit,
        )?;
        Ok(if config.shuffle {
            generator.shuffled(config.seed)
        } else {
            generator
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KENOBI: &str = "Hello there. General Kenobi.";

    fn config(sequence_length: usize, min_token_frequency: usize) -> PipelineConfig {
        PipelineConfig {
            sequence_length,
            min_token_frequency,
            batch_size: 2,
            shuffle: false,
            ..Default::default()
        }
    }

    #[test]
    fn kenobi_min_one() {
        let ctx = PipelineContext::from_corpus(KENOBI, &config(2, 1)).unwrap();
        assert_eq!(ctx.tokens().len(), 6);
        assert_eq!(ctx.vocabulary().len(), 5);
        assert!(ctx.removed().is_empty());
        assert_eq!(ctx.samples().len(), 4);
        let codec = ctx.codec();
        let first = &ctx.samples()[0];
        let ctx_tokens: Vec<&str> = first
            .context
            .iter()
            .map(|&i| codec.token(i).unwrap())
            .collect();
        assert_eq!(ctx_tokens, ["hello", "there"]);
        assert_eq!(codec.token(first.target).unwrap(), ".");
        assert_eq!(ctx.frequencies().get("."), 2);
        assert_eq!(ctx.frequencies().get("kenobi"), 1);
    }

    #[test]
    fn context_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PipelineContext>();
        assert_send_sync::<BatchGenerator<'static>>();

        let ctx = PipelineContext::from_corpus(KENOBI, &config(1, 1)).unwrap();
        let counts = std::thread::scope(|s| {
            let workers: Vec<_> = (0..2)
                .map(|_| s.spawn(|| ctx.batches(&config(1, 1)).unwrap().epoch().count()))
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect::<Vec<_>>()
        });
        assert_eq!(counts, [2, 2]);
    }

    #[test]
    fn kenobi_min_two() {
        let ctx = PipelineContext::from_corpus(KENOBI, &config(2, 2)).unwrap();
        assert_eq!(ctx.vocabulary().tokens(), ["."]);
        assert!(ctx.samples().is_empty());
        let mut generator = ctx.batches(&config(2, 2)).unwrap();
        assert_eq!(generator.batches_per_epoch(), 0);
        assert!(generator.epoch().next().is_none());
    }

    #[test]
    fn window_longer_than_corpus() {
        let ctx = PipelineContext::from_corpus(KENOBI, &config(50, 1)).unwrap();
        assert!(ctx.samples().is_empty());
    }

    #[test]
    fn empty_corpus() {
        let ctx = PipelineContext::from_corpus("", &config(2, 1)).unwrap();
        assert!(ctx.vocabulary().is_empty());
        assert!(ctx.samples().is_empty());
    }

    #[test]
    fn invalid_config_rejected() {
        assert!(matches!(
            PipelineContext::from_corpus(KENOBI, &config(0, 1)),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn batches_have_declared_shape() {
        let ctx = PipelineContext::from_corpus(KENOBI, &config(2, 1)).unwrap();
        let mut generator = ctx.batches(&config(2, 1)).unwrap();
        assert_eq!(generator.batches_per_epoch(), 2);
        for b in generator.epoch() {
            let b = b.unwrap();
            assert_eq!(b.inputs.shape(), &[2, 2, 5]);
            assert_eq!(b.labels.shape(), &[2, 5]);
        }
    }

    #[test]
    fn fixed_vocabulary_drops_unknown_windows() {
        let vocab = Vocabulary::build(&["hello", "there", "."]);
        let ctx = PipelineContext::from_corpus_with_vocabulary(KENOBI, vocab, 2).unwrap();
        assert_eq!(ctx.removed().len(), 2);
        assert_eq!(ctx.samples().len(), 1);
        assert_eq!(ctx.vocabulary().len(), 3);
    }

    #[test]
    fn split_shares_context() {
        let text = "a b c d e f g h i j k l";
        let ctx = PipelineContext::from_corpus(text, &config(1, 1)).unwrap();
        let (train, val) = ctx.split(0.25).unwrap();
        assert_eq!(train.len() + val.len(), ctx.samples().len());
        assert_eq!(val.len(), 3);
        let (mut tg, mut vg) = ctx.split_batches(&config(1, 1), 0.25).unwrap();
        assert_eq!(tg.epoch().count(), 4);
        assert_eq!(vg.epoch().count(), 1);
        assert!(ctx.split(1.5).is_err());
    }

    #[test]
    fn generation_context_has_no_samples() {
        let ctx = PipelineContext::for_generation(Vocabulary::build(&["a"]), 3).unwrap();
        assert!(ctx.samples().is_empty());
        assert_eq!(ctx.window_len(), 3);
        assert!(PipelineContext::for_generation(Vocabulary::default(), 0).is_err());
    }
}
