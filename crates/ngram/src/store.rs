#![forbid(unsafe_code)]

use std::path::{Component, Path, PathBuf};

use tokenize::Vocabulary;

use crate::config::SaveFailurePolicy;
use crate::error::{PipelineError, Result};

const VOCABULARY_FILE: &str = "vocabulary.json";

/// Reads and writes one vocabulary per named model as a JSON array of strings.
#[derive(Debug, Clone)]
pub struct VocabularyStore {
    root: PathBuf,
    policy: SaveFailurePolicy,
}

impl VocabularyStore {
    /// Store rooted at `root` (`<root>/<model>/vocabulary.json`).
    pub fn new(root: impl Into<PathBuf>, policy: SaveFailurePolicy) -> Self {
        Self {
            root: root.into(),
            policy,
        }
    }

    /// File backing model `name`.
    ///
    /// The name must be a single plain path component, so every model file
    /// stays under the store root.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None)
                if part == name && !name.contains(['/', '\\']) =>
            {
                Ok(self.root.join(name).join(VOCABULARY_FILE))
            }
            _ => Err(PipelineError::Config(format!(
                "model name {name:?} must be a single directory name"
            ))),
        }
    }

    /// Persist `vocab` for model `name`.
    ///
    /// Returns the written path, or `None` when the write failed and the
    /// policy is `Warn`.
    /// An invalid model name is an error under either policy.
    pub fn save(&self, name: &str, vocab: &Vocabulary) -> Result<Option<PathBuf>> {
        let path = self.path_for(name)?;
        match write_json(&path, vocab) {
            Ok(()) => {
                log::info!("saved vocabulary ({} tokens) to {}", vocab.len(), path.display());
                Ok(Some(path))
            }
            Err(reason) => match self.policy {
                SaveFailurePolicy::Warn => {
                    log::warn!(
                        "could not save vocabulary to {}: {}; continuing without it",
                        path.display(),
                        reason
                    );
                    Ok(None)
                }
                SaveFailurePolicy::Fail => Err(PipelineError::Save { path, reason }),
            },
        }
    }

    /// Load the vocabulary of model `name`. Missing or malformed files are errors.
    pub fn load(&self, name: &str) -> Result<Vocabulary> {
        let path = self.path_for(name)?;
        let load_error = |reason: String| PipelineError::Load {
            path: path.clone(),
            reason,
        };
        let raw = std::fs::read_to_string(&path).map_err(|e| load_error(e.to_string()))?;
        let vocab: Vocabulary =
            serde_json::from_str(&raw).map_err(|e| load_error(e.to_string()))?;
        log::info!("loaded vocabulary ({} tokens) from {}", vocab.len(), path.display());
        Ok(vocab)
    }
}

fn write_json(path: &Path, vocab: &Vocabulary) -> Result<(), String> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| e.to_string())?;
    }
    let json = serde_json::to_string(vocab).map_err(|e| e.to_string())?;
    std::fs::write(path, json).map_err(|e| e.to_string())
}
