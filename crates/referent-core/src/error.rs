use thiserror::Error;

/// Application-wide error types for Referent.
///
/// The `Display` text of every variant is the message shown to the user.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required request field is missing or malformed.
    #[error("{0}")]
    ValidationError(String),

    /// Required configuration (usually an API key) is absent.
    #[error("{0}")]
    ConfigError(String),

    /// Connection to the article host or a provider failed.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Any other transport-level failure (building the client, reading a body).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The upstream answered with a non-success status.
    #[error("{message}")]
    UpstreamError { status_code: u16, message: String },

    /// The image model is still warming up (HTTP 503).
    #[error("Model is loading. Try again in a few seconds.")]
    ModelLoading,

    /// The upstream answered successfully but not with the expected media type.
    #[error("{0}")]
    UnexpectedFormat(String),

    /// The extracted article has no usable body text.
    #[error("Could not extract readable content from the page")]
    ContentUnavailable,

    /// Another action is still in flight.
    #[error("Another request is already in progress")]
    Busy,

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

/// Display-only grouping of errors into friendly categories.
///
/// Purely cosmetic: it never changes the status code an error maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Parse,
    Content,
    Api,
    Unknown,
}

impl ErrorCategory {
    pub fn headline(self) -> &'static str {
        match self {
            ErrorCategory::Network => "Could not reach the server",
            ErrorCategory::Parse => "Could not read the article",
            ErrorCategory::Content => "The article has no readable text",
            ErrorCategory::Api => "The AI service returned an error",
            ErrorCategory::Unknown => "Something went wrong",
        }
    }
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::NetworkError(_) | AppError::HttpError(_) => ErrorCategory::Network,
            AppError::ValidationError(_) | AppError::SerializationError(_) => {
                ErrorCategory::Parse
            }
            AppError::ContentUnavailable => ErrorCategory::Content,
            AppError::UpstreamError { .. }
            | AppError::ModelLoading
            | AppError::UnexpectedFormat(_)
            | AppError::ConfigError(_) => ErrorCategory::Api,
            AppError::Busy | AppError::Generic(_) => ErrorCategory::Unknown,
        }
    }
}
