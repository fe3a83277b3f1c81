//! Journey log loading.
//!
//! The log is a JSON array of message objects. Loading is all-or-nothing:
//! one malformed record or a repeated id rejects the whole file.

use super::models::Message;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid journey data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate message id {0}")]
    DuplicateId(i64),
}

/// Read and validate the journey log at `path`, preserving file order.
pub fn load_messages(path: &Path) -> Result<Vec<Message>, LoadError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io { path: path.to_path_buf(), source: e },
    })?;
    parse_messages(&content)
}

/// Parse a journey log document.
pub fn parse_messages(json: &str) -> Result<Vec<Message>, LoadError> {
    let messages: Vec<Message> = serde_json::from_str(json)?;

    let mut seen = HashSet::with_capacity(messages.len());
    for msg in &messages {
        if !seen.insert(msg.id) {
            return Err(LoadError::DuplicateId(msg.id));
        }
    }

    Ok(messages)
}
