//! Shared error type across metricboard crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Result submitted for an identifier nobody registered.
    UnknownUser,
    /// Empty or malformed input.
    InvalidInput,
    /// Configuration rejected at startup.
    BadConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::UnknownUser => "UNKNOWN_USER",
            ClientCode::InvalidInput => "INVALID_INPUT",
            ClientCode::BadConfig => "BAD_CONFIG",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetricboardError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum MetricboardError {
    #[error("unknown user: {0}")]
    UnknownUser(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl MetricboardError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            MetricboardError::UnknownUser(_) => ClientCode::UnknownUser,
            MetricboardError::InvalidInput(_) => ClientCode::InvalidInput,
            MetricboardError::BadConfig(_) => ClientCode::BadConfig,
            MetricboardError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            MetricboardError::Internal(_) => ClientCode::Internal,
        }
    }
}
