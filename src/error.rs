use thiserror::Error;

/// Application-wide error types.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Invalid slug: {0}")]
    InvalidSlug(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Directory read failed: {0}")]
    DirectoryRead(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
