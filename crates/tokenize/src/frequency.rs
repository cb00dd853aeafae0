#![forbid(unsafe_code)]

use std::collections::{HashMap, HashSet};

use crate::error::TokenizeError;
use crate::vocab::Vocabulary;

/// Occurrence count of every token over a full corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, usize>,
}

impl FrequencyTable {
    /// Count every token in a single pass.
    pub fn count<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for t in tokens {
            let t = t.as_ref();
            match counts.get_mut(t) {
                Some(n) => *n += 1,
                None => {
                    counts.insert(t.to_string(), 1);
                }
            }
        }
        Self { counts }
    }

    /// Occurrences of `token` (0 when never seen).
    pub fn get(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Highest count in the table, 0 when empty.
    pub fn max_count(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Number of distinct tokens counted.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True when nothing was counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate `(token, count)` in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(t, n)| (t.as_str(), *n))
    }
}

/// Result of the minimum-frequency filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Tokens that met the threshold, in their original relative order.
    pub retained: Vocabulary,
    /// Tokens that fell below the threshold.
    pub removed: HashSet<String>,
}

/// Split `candidates` by the counts in `table`.
///
/// Tokens with `count >= min_frequency` are kept. A threshold above every
/// count yields an empty vocabulary, which is not an error.
pub fn filter_with_table(
    candidates: &Vocabulary,
    table: &FrequencyTable,
    min_frequency: usize,
) -> Result<FilterOutcome, TokenizeError> {
    if min_frequency == 0 {
        return Err(TokenizeError::InvalidThreshold(min_frequency));
    }
    let mut kept = Vec::with_capacity(candidates.len());
    let mut removed = HashSet::new();
    for (_, token) in candidates.iter() {
        if table.get(token) >= min_frequency {
            kept.push(token.to_string());
        } else {
            removed.insert(token.to_string());
        }
    }
    let retained = Vocabulary::from_tokens(kept)?;
    log::debug!(
        "frequency filter (min={}): kept {} of {} tokens",
        min_frequency,
        retained.len(),
        candidates.len()
    );
    Ok(FilterOutcome { retained, removed })
}

/// Count `tokens` and filter `candidates` in one call.
pub fn filter_by_frequency<S: AsRef<str>>(
    tokens: &[S],
    candidates: &Vocabulary,
    min_frequency: usize,
) -> Result<FilterOutcome, TokenizeError> {
    filter_with_table(candidates, &FrequencyTable::count(tokens), min_frequency)
}
