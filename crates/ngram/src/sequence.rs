#![forbid(unsafe_code)]

use std::collections::HashSet;

use tokenize::Vocabulary;

use crate::error::{PipelineError, Result};

/// One training example: `window_len` context indices and the index that follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Consecutive token indices, oldest first.
    pub context: Vec<usize>,
    /// Index of the token right after the context.
    pub target: usize,
}

/// Build index samples, dropping every window that touches a removed token.
///
/// Slides a `window_len` context over `tokens`: `N - L` samples when
/// `N > L` and nothing is removed, none otherwise.
///
/// Tokens outside `removed` must be in `vocab`; the two always come from the
/// same filter pass, so a miss means they were mixed across runs.
pub fn index_samples(
    tokens: &[String],
    window_len: usize,
    removed: &HashSet<String>,
    vocab: &Vocabulary,
) -> Result<Vec<Sample>> {
    if window_len == 0 {
        return Err(PipelineError::Config("sequence_length must be >= 1".into()));
    }
    // None marks a removed token
    let encoded = tokens
        .iter()
        .map(|t| {
            if removed.contains(t) {
                Ok(None)
            } else {
                vocab
                    .token_to_index(t)
                    .map(Some)
                    .ok_or_else(|| PipelineError::Encoding { token: t.clone() })
            }
        })
        .collect::<Result<Vec<Option<usize>>>>()?;

    let mut samples = Vec::with_capacity(tokens.len().saturating_sub(window_len));
    let mut dropped = 0usize;
    for w in encoded.windows(window_len + 1) {
        let Some(indices) = w.iter().copied().collect::<Option<Vec<usize>>>() else {
            dropped += 1;
            continue;
        };
        let mut context = indices;
        if let Some(target) = context.pop() {
            samples.push(Sample { context, target });
        }
    }
    log::debug!(
        "indexed {} samples (window {}), dropped {} touching removed tokens",
        samples.len(),
        window_len,
        dropped
    );
    Ok(samples)
}
