//! Unified error types for the to-do API.

use thiserror::Error;

/// Unified error type for the application.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration is present but invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Item store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// HTTP request error (upstream proxy).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Item store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No item exists with the requested id.
    #[error("item not found")]
    NotFound,

    /// The database stayed unreachable after the retry budget was spent.
    #[error("store unavailable after {attempts} attempts: {reason}")]
    Unavailable {
        /// Attempts made before giving up.
        attempts: u32,
        /// Last connectivity failure observed.
        reason: String,
    },

    /// Non-transient database failure.
    #[error("database error: {0}")]
    Backend(#[from] sqlx::Error),
}

/// Errors surfaced at the HTTP boundary.
///
/// `NotFound` and `Malformed` are expected, caller-recoverable conditions;
/// `Unavailable` hides backend detail behind a generic message.
#[derive(Error, Debug)]
pub enum ApiError {
    /// 404: no item with the requested id.
    #[error("item not found")]
    NotFound,

    /// 400: request body or query string could not be decoded.
    #[error("malformed request: {0}")]
    Malformed(String),

    /// 500: the store could not serve the request.
    #[error("store unavailable")]
    Unavailable,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound,
            StoreError::Unavailable { .. } | StoreError::Backend(_) => ApiError::Unavailable,
        }
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
