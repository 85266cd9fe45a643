use thiserror::Error;

pub type Result<T> = std::result::Result<T, DataTreeError>;

/// Failures at the edges of the crate: reading and parsing documents.
///
/// Building, locating and navigating never fail.
#[derive(Debug, Error)]
pub enum DataTreeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}
