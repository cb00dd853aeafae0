#![forbid(unsafe_code)]

use std::path::PathBuf;

use sampler::SamplerError;
use tokenize::TokenizeError;

/// Errors surfaced by the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Token has no index in the vocabulary in use
    #[error("cannot encode unknown token {token:?}")]
    Encoding {
        /// the offending token
        token: String,
    },
    /// Index outside `[0, len)`
    #[error("index {index} out of range for vocabulary of {len} tokens")]
    Index {
        /// requested index
        index: usize,
        /// vocabulary length
        len: usize,
    },
    /// Vocabulary file missing or malformed
    #[error("cannot load vocabulary from {}: {reason}", path.display())]
    Load {
        /// file that was read
        path: PathBuf,
        /// what went wrong
        reason: String,
    },
    /// Vocabulary file could not be written
    #[error("cannot save vocabulary to {}: {reason}", path.display())]
    Save {
        /// file that was written
        path: PathBuf,
        /// what went wrong
        reason: String,
    },
    /// Configuration value out of its valid range
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Generation seed has fewer tokens than the window
    #[error("seed text has {got} tokens, window needs {needed}")]
    SeedTooShort {
        /// window length
        needed: usize,
        /// tokens in the seed
        got: usize,
    },
    /// Corpus or config file could not be read
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// file that was read
        path: PathBuf,
        /// underlying error
        #[source]
        source: std::io::Error,
    },
    /// Vocabulary construction failed
    #[error(transparent)]
    Tokenize(TokenizeError),
    /// Decoding failed
    #[error(transparent)]
    Sampler(#[from] SamplerError),
}

impl From<TokenizeError> for PipelineError {
    fn from(err: TokenizeError) -> Self {
        match err {
            TokenizeError::IndexOutOfRange { index, len } => Self::Index { index, len },
            TokenizeError::InvalidThreshold(n) => {
                Self::Config(format!("min_token_frequency must be >= 1, got {n}"))
            }
            other => Self::Tokenize(other),
        }
    }
}

/// Shorthand used across the crate.
pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
