use std::path::PathBuf;

use thiserror::Error;

use crate::matcher::match_result::MatchResult;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Path {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persists the outcome of a matching run.
pub trait OutputStore {
    /// Writes the result and returns the identifier of the stored record.
    fn store(&self, result: &MatchResult) -> Result<String, StoreError>;
}
