use thiserror::Error;

/// Error type that captures storage and serialization failures.
///
/// Document updates and pacing are pure and never produce one of these; only
/// the persistence paths do.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(String),
}
