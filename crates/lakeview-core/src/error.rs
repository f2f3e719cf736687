use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Contract violation detected by the algebra: mode mismatch, unsupported
    /// scope, or input that cannot be turned into a result set.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Failure reported by a graph or store backend.
    #[error("Backend failure: {0}")]
    Backend(String),
}

impl Error {
    pub fn backend(e: impl std::fmt::Display) -> Self {
        Error::Backend(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
