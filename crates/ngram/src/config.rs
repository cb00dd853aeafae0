#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// What to do when the vocabulary cannot be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFailurePolicy {
    /// Log a warning and keep going without a persisted vocabulary.
    #[default]
    Warn,
    /// Return `PipelineError::Save`.
    Fail,
}

/// Pipeline configuration. Every field has a default, so `{}` is a valid
/// JSON config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Tokens per context window (L).
    pub sequence_length: usize,
    /// Tokens seen fewer times than this are removed.
    pub min_token_frequency: usize,
    /// Samples per batch (B).
    pub batch_size: usize,
    /// Cap on batches per epoch; `None` is unbounded.
    pub batch_count_limit: Option<usize>,
    /// Shuffle samples across the whole set at the start of each epoch.
    pub shuffle: bool,
    /// Seed for shuffling and temperature sampling.
    pub seed: u64,
    /// Only the first `n` characters of the corpus are used.
    pub max_corpus_chars: Option<usize>,
    /// Behaviour on vocabulary save failure.
    pub save_failure_policy: SaveFailurePolicy,
    /// Directory holding one sub-directory per named model.
    pub vocabulary_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sequence_length: 10,
            min_token_frequency: 1,
            batch_size: 32,
            batch_count_limit: None,
            shuffle: true,
            seed: 42,
            max_corpus_chars: None,
            save_failure_policy: SaveFailurePolicy::Warn,
            vocabulary_dir: PathBuf::from("models"),
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| PipelineError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let cfg: Self = serde_json::from_str(&raw)
            .map_err(|e| PipelineError::Config(format!("{}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check that every count is positive.
    pub fn validate(&self) -> Result<()> {
        if self.sequence_length == 0 {
            return Err(PipelineError::Config("sequence_length must be >= 1".into()));
        }
        if self.min_token_frequency == 0 {
            return Err(PipelineError::Config("min_token_frequency must be >= 1".into()));
        }
        if self.batch_size == 0 {
            return Err(PipelineError::Config("batch_size must be >= 1".into()));
        }
        if self.batch_count_limit == Some(0) {
            return Err(PipelineError::Config("batch_count_limit must be >= 1".into()));
        }
        Ok(())
    }
}

/// Window length for a run: a model's own input window wins over the
/// configured one, since feeding a model windows of another width is unsafe.
pub fn resolve_window_len(model_window: Option<usize>, configured: usize) -> usize {
    match model_window {
        Some(w) if w != configured => {
            log::warn!(
                "model window length {} overrides configured sequence_length {}",
                w,
                configured
            );
            w
        }
        Some(w) => w,
        None => configured,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_all_defaults() {
        let cfg: PipelineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, PipelineConfig::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_overrides() {
        let cfg: PipelineConfig = serde_json::from_str(
            r#"{"sequence_length": 3, "batch_count_limit": 5, "save_failure_policy": "fail"}"#,
        )
        .unwrap();
        assert_eq!(cfg.sequence_length, 3);
        assert_eq!(cfg.batch_count_limit, Some(5));
        assert_eq!(cfg.save_failure_policy, SaveFailurePolicy::Fail);
        assert_eq!(cfg.batch_size, 32);
    }

    #[test]
    fn zero_values_rejected() {
        for cfg in [
            PipelineConfig {
                sequence_length: 0,
                ..Default::default()
            },
            PipelineConfig {
                min_token_frequency: 0,
                ..Default::default()
            },
            PipelineConfig {
                batch_size: 0,
                ..Default::default()
            },
            PipelineConfig {
                batch_count_limit: Some(0),
                ..Default::default()
            },
        ] {
            assert!(matches!(cfg.validate(), Err(PipelineError::Config(_))));
        }
    }

    #[test]
    fn reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{"batch_size": 4}"#).unwrap();
        let cfg = PipelineConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg.batch_size, 4);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = PipelineConfig::from_json_file(dir.path().join("nope.json"));
        assert!(matches!(res, Err(PipelineError::Io { .. })));
    }

    #[test]
    fn model_window_wins() {
        assert_eq!(resolve_window_len(Some(4), 10), 4);
        assert_eq!(resolve_window_len(Some(10), 10), 10);
        assert_eq!(resolve_window_len(None, 10), 10);
    }
}
