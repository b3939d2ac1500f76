use thiserror::Error;

/// Application-specific error type
#[derive(Debug, Error)]
pub enum CellkeeperError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not determine data directory")]
    NoDataDirectory,

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Invalid input: {0}")]
    Invalid(&'static str),

    #[error("Unsupported snapshot version {0}")]
    UnsupportedSnapshot(u32),
}

/// Convenience type alias for Result with CellkeeperError
pub type Result<T> = std::result::Result<T, CellkeeperError>;
