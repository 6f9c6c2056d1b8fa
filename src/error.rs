use thiserror::Error;

/// Failures surfaced by the service layer.
///
/// Storage and hashing failures arrive as `anyhow::Error` and are treated as
/// fatal to the request; every other variant carries a client-facing message.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
