#![forbid(unsafe_code)]

use std::path::Path;

use crate::error::{PipelineError, Result};

/// Read a UTF-8 corpus, keeping at most `max_chars` characters.
pub fn load_corpus(path: impl AsRef<Path>, max_chars: Option<usize>) -> Result<String> {
    let path = path.as_ref();
    let mut text = std::fs::read_to_string(path)
        .map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    if let Some(limit) = max_chars {
        truncate_chars(&mut text, limit);
    }
    log::info!("loaded corpus {} ({} bytes)", path.display(), text.len());
    Ok(text)
}

fn truncate_chars(text: &mut String, limit: usize) {
    if let Some((byte_idx, _)) = text.char_indices().nth(limit) {
        text.truncate(byte_idx);
    }
}
