/// Errors raised while building or querying a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizeError {
    /// Index lookup outside `[0, len)`
    #[error("index {index} out of range for vocabulary of {len} tokens")]
    IndexOutOfRange {
        /// requested index
        index: usize,
        /// vocabulary length at the time of the lookup
        len: usize,
    },
    /// A token list handed to `Vocabulary::from_tokens` repeats a token
    #[error("duplicate vocabulary token {0:?}")]
    DuplicateToken(String),
    /// Minimum frequency must be at least 1
    #[error("invalid minimum token frequency {0}, expected >= 1")]
    InvalidThreshold(usize),
}
