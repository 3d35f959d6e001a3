//! Error types for the gateway.
//!
//! Two layers: [`ApiError`] is what the request gateway returns for a single
//! HTTP round trip, [`GatewayError`] is what device operations hand back to
//! the hosting application.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use reqwest::StatusCode;
use thiserror::Error;

use crate::auth::AuthError;

/// Failure of one request gateway call.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Request cancelled")]
    Cancelled,

    #[error("{method} request to {url} failed with status: {status}")]
    Status {
        method: reqwest::Method,
        url: String,
        status: StatusCode,
    },

    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to encode request payload: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Access token is not a valid header value")]
    InvalidToken,
}

impl ApiError {
    /// HTTP status of a non-200 response, if this is a status error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the remote rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport(_) => ErrorCategory::Network,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::Status { status, .. } => match status.as_u16() {
                401 | 403 => ErrorCategory::Authentication,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::Decode(_) | Self::Encode(_) => ErrorCategory::Serialization,
            Self::InvalidUrl(_) => ErrorCategory::Configuration,
            Self::InvalidToken => ErrorCategory::Authentication,
        }
    }

    /// Whether the caller may reasonably try again. Nothing is retried internally.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Timeout | ErrorCategory::Server
        )
    }
}

/// Domain-facing error returned by device operations.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Unauthorized access: {op}")]
    UnauthorizedAccess { op: &'static str },

    #[error("Not implemented: {op}")]
    NotImplemented { op: &'static str },

    #[error("Invalid device id: {id:?}")]
    InvalidDeviceId { id: String },

    #[error("{op} failed: {source}")]
    Api {
        op: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl GatewayError {
    pub fn api(op: &'static str, source: ApiError) -> Self {
        Self::Api { op, source }
    }

    /// Name of the operation that failed, where one is attached.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Self::UnauthorizedAccess { op } | Self::NotImplemented { op } | Self::Api { op, .. } => {
                Some(*op)
            }
            _ => None,
        }
    }

    /// Underlying request gateway error, unchanged.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api { source, .. } => Some(source),
            Self::Auth(auth) => auth.api_error(),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnauthorizedAccess { .. } | Self::Auth(_) => ErrorCategory::Authentication,
            Self::NotImplemented { .. } => ErrorCategory::Unsupported,
            Self::InvalidDeviceId { .. } => ErrorCategory::InvalidInput,
            Self::Api { source, .. } => source.category(),
            Self::Configuration(_) => ErrorCategory::Configuration,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Authentication => RecoverySuggestion::Reauthenticate,
            ErrorCategory::Network | ErrorCategory::Server => RecoverySuggestion::RetryLater,
            ErrorCategory::Timeout => RecoverySuggestion::IncreaseTimeout,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::InvalidInput => RecoverySuggestion::FixRequest,
            ErrorCategory::Cancelled => RecoverySuggestion::None,
            _ => RecoverySuggestion::ContactSupport,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, GatewayError>;
