//! Error types for moji2anki
//!
//! The taxonomy mirrors the failure modes of the deck pipeline:
//! - Transport failures and non-2xx responses from the dictionary service
//! - The application-level "list missing or inaccessible" code
//! - Malformed or insufficient upstream data
//! - Local I/O and deck packaging failures
//!
//! Every error knows its terminal-progress kind name (the `Failed: <kind>:`
//! prefix polled by clients) and its HTTP status code for API responses.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for moji2anki operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for moji2anki
#[derive(Debug, Error)]
pub enum Error {
    /// Non-2xx response from the dictionary service
    #[error("network error: status {status} from {url}")]
    Network {
        /// The URL that returned the bad status
        url: String,
        /// The HTTP status code received
        status: u16,
        /// The raw response body, for diagnostics
        body: String,
    },

    /// Transport-level failure (connect, timeout, TLS, ...)
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The word list does not exist or the session has no access to it
    #[error("word list missing or inaccessible: {url}")]
    Unauthorized {
        /// The URL of the rejected request
        url: String,
    },

    /// Malformed or insufficient data from the service
    #[error("invalid data: {message}")]
    Data {
        /// What was wrong with the data
        message: String,
    },

    /// Task or file absent at the HTTP boundary
    #[error("{0} not found")]
    NotFound(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Deck packaging failed (note construction or archive write)
    #[error("packaging error: {0}")]
    Packaging(String),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "service.headers")
        key: Option<String>,
    },

    /// API server error
    #[error("API server error: {0}")]
    ApiServer(String),
}

impl Error {
    /// Stable kind name used in the terminal `"Failed: <kind>:<message>"`
    /// progress line. Clients match on these names, so they must not change.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Error::Network { .. } | Error::Http(_) => "NetworkError",
            Error::Unauthorized { .. } => "UnauthorizedError",
            Error::Data { .. } | Error::Serialization(_) => "DataError",
            Error::NotFound(_) => "NotFound",
            Error::Io(_) => "IoError",
            Error::Packaging(_) => "PackagingError",
            Error::Config { .. } => "ConfigError",
            Error::ApiServer(_) => "ApiServerError",
        }
    }

    /// Shorthand for a [`Error::Data`] with the given message
    pub fn data(message: impl Into<String>) -> Self {
        Error::Data {
            message: message.into(),
        }
    }
}

/// API error response format
///
/// Returned by API endpoints when an error occurs: a machine-readable code,
/// a human-readable message, and optional contextual details.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "not_found",
///     "message": "Task not found"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "not_found", "validation_error")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create a "not found" error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new("not_found", format!("{} not found", resource.into()))
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::Config { .. } => 400,

            // 401 Unauthorized - The upstream session has no access
            Error::Unauthorized { .. } => 401,

            // 404 Not Found
            Error::NotFound(_) => 404,

            // 422 Unprocessable Entity - Semantic errors in upstream data
            Error::Data { .. } => 422,

            // 500 Internal Server Error
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::Packaging(_) => 500,
            Error::ApiServer(_) => 500,

            // 502 Bad Gateway - External service errors
            Error::Network { .. } => 502,
            Error::Http(_) => 502,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Network { .. } => "network_error",
            Error::Http(_) => "network_error",
            Error::Unauthorized { .. } => "unauthorized",
            Error::Data { .. } => "data_error",
            Error::NotFound(_) => "not_found",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::Packaging(_) => "packaging_error",
            Error::Config { .. } => "config_error",
            Error::ApiServer(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Network { url, status, .. } => Some(serde_json::json!({
                "url": url,
                "status": status,
            })),
            Error::Unauthorized { url } => Some(serde_json::json!({
                "url": url,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
