/// Result type alias for scout operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the keyword analysis fabric
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Persist error: {0}")]
    Persist(String),

    #[error("Route unavailable: {0}")]
    RouteUnavailable(String),

    #[error("Adapter error: {0}")]
    Adapter(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this error is recoverable (can retry with backoff)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::NotFound(_) => false,
            Error::Persist(_) => true,
            Error::RouteUnavailable(_) => true,
            Error::Adapter(_) => true,
            Error::Serialization(_) => false,
            Error::InvalidInput(_) => false,
            Error::Io(_) => true,
        }
    }
}
