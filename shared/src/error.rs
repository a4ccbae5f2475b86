//! The error type every layer reports with.

use thiserror::Error;

/// Result alias used across the workspace.
pub type NewsResult<T> = Result<T, NewsError>;

/// The single error every client operation reports.
///
/// Stores keep the last error around while also handing it back to the
/// caller, so the type is `Clone` and only carries messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NewsError {
    /// Rejected on the client before any request was sent.
    #[error("{0}")]
    Validation(String),
    /// The server answered with a non-2xx status.
    #[error("request failed with status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl NewsError {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Human readable message, without the variant prefix.
    ///
    /// This is what dialogs show to the user: the server's
    /// message for status errors, the raw text otherwise.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(message)
            | Self::Network(message)
            | Self::Decode(message)
            | Self::Status {
                message, ..
            } => message,
        }
    }

    /// True when the error was produced locally, without a request.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
