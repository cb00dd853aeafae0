#![forbid(unsafe_code)]

use ndarray::{Array2, ArrayViewMut1};
use rand::Rng;
use sampler::Strategy;
use tokenize::Vocabulary;

use crate::error::{PipelineError, Result};

/// One-hot vector of length `vocab_len` with a single `1.0` at `index`.
pub fn index_to_one_hot(index: usize, vocab_len: usize) -> Result<Vec<f32>> {
    let mut v = vec![0.0_f32; vocab_len];
    set_hot(&mut v, index)?;
    Ok(v)
}

/// Set `row[index] = 1.0` on an already zeroed row.
pub(crate) fn write_one_hot(mut row: ArrayViewMut1<'_, f32>, index: usize) -> Result<()> {
    let len = row.len();
    let slot = row.get_mut(index).ok_or(PipelineError::Index { index, len })?;
    *slot = 1.0;
    Ok(())
}

fn set_hot(v: &mut [f32], index: usize) -> Result<()> {
    let len = v.len();
    let slot = v.get_mut(index).ok_or(PipelineError::Index { index, len })?;
    *slot = 1.0;
    Ok(())
}

/// Token <-> index <-> one-hot conversions against one vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct Codec<'a> {
    vocab: &'a Vocabulary,
}

impl<'a> Codec<'a> {
    /// Borrow `vocab` for encoding and decoding.
    pub fn new(vocab: &'a Vocabulary) -> Self {
        Self { vocab }
    }

    /// Vocabulary size, the width of every one-hot vector.
    pub fn vocab_len(&self) -> usize {
        self.vocab.len()
    }

    /// Index of `token`. Unknown tokens are an error, never a sentinel.
    pub fn encode(&self, token: &str) -> Result<usize> {
        self.vocab
            .token_to_index(token)
            .ok_or_else(|| PipelineError::Encoding {
                token: token.to_string(),
            })
    }

    /// Token at `index`.
    pub fn token(&self, index: usize) -> Result<&'a str> {
        Ok(self.vocab.index_to_token(index)?)
    }

    /// `[indices.len(), vocab_len]` one-hot matrix, one row per index.
    pub fn encode_indices(&self, indices: &[usize]) -> Result<Array2<f32>> {
        let mut m = Array2::<f32>::zeros((indices.len(), self.vocab_len()));
        for (row, &index) in m.rows_mut().into_iter().zip(indices) {
            write_one_hot(row, index)?;
        }
        Ok(m)
    }

    /// `[tokens.len(), vocab_len]` one-hot matrix for a context window.
    pub fn encode_window<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Array2<f32>> {
        let indices = tokens
            .iter()
            .map(|t| self.encode(t.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.encode_indices(&indices)
    }

    /// Arg-max index of `distribution`, lowest index on ties.
    pub fn decode(&self, distribution: &[f32]) -> Result<usize> {
        Ok(sampler::argmax(distribution)?)
    }

    /// Index picked by `strategy`, checked against the vocabulary.
    pub fn decode_with<R: Rng + ?Sized>(
        &self,
        distribution: &[f32],
        strategy: Strategy,
        rng: &mut R,
    ) -> Result<usize> {
        let index = strategy.pick(distribution, rng)?;
        if index >= self.vocab_len() {
            return Err(PipelineError::Index {
                index,
                len: self.vocab_len(),
            });
        }
        Ok(index)
    }

    /// Token picked by `strategy`.
    pub fn decode_token<R: Rng + ?Sized>(
        &self,
        distribution: &[f32],
        strategy: Strategy,
        rng: &mut R,
    ) -> Result<&'a str> {
        self.token(self.decode_with(distribution, strategy, rng)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sampler::make_rng;

    fn vocab() -> Vocabulary {
        Vocabulary::build(&["hello", "there", ".", "general", "kenobi"])
    }

    #[test]
    fn encode_known_and_unknown() {
        let v = vocab();
        let codec = Codec::new(&v);
        assert_eq!(codec.encode("general").unwrap(), 3);
        assert!(matches!(
            codec.encode("grievous"),
            Err(PipelineError::Encoding { token }) if token == "grievous"
        ));
    }

    #[test]
    fn one_hot_shape() {
        assert_eq!(index_to_one_hot(2, 4).unwrap(), vec![0.0, 0.0, 1.0, 0.0]);
        assert!(matches!(
            index_to_one_hot(4, 4),
            Err(PipelineError::Index { index: 4, len: 4 })
        ));
    }

    #[test]
    fn window_matrix_rows() {
        let v = vocab();
        let codec = Codec::new(&v);
        let m = codec.encode_window(&["there", "."]).unwrap();
        assert_eq!(m.shape(), &[2, 5]);
        assert_eq!(m[[0, 1]], 1.0);
        assert_eq!(m[[1, 2]], 1.0);
        assert_eq!(m.sum(), 2.0);
    }

    #[test]
    fn decode_out_of_vocab_index_is_index_error() {
        let v = vocab();
        let codec = Codec::new(&v);
        let mut rng = make_rng(0);
        let dist = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        assert!(matches!(
            codec.decode_token(&dist, Strategy::Greedy, &mut rng),
            Err(PipelineError::Index { index: 6, len: 5 })
        ));
    }

    #[test]
    fn decode_token_greedy() {
        let v = vocab();
        let codec = Codec::new(&v);
        let mut rng = make_rng(0);
        let dist = [0.1, 0.1, 0.1, 0.1, 0.6];
        assert_eq!(
            codec.decode_token(&dist, Strategy::Greedy, &mut rng).unwrap(),
            "kenobi"
        );
    }

    #[test]
    fn empty_distribution_is_error() {
        let v = vocab();
        let codec = Codec::new(&v);
        assert!(matches!(codec.decode(&[]), Err(PipelineError::Sampler(_))));
    }

    proptest! {
        #[test]
        fn one_hot_decodes_back(v in 1usize..64, seed in 0usize..1000) {
            let i = seed % v;
            let hot = index_to_one_hot(i, v).unwrap();
            let vocab = Vocabulary::default();
            prop_assert_eq!(Codec::new(&vocab).decode(&hot).unwrap(), i);
        }
    }
}
