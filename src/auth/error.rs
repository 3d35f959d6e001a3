use thiserror::Error;

use crate::error::ApiError;

/// Failures while establishing or renewing a session.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Login failed: {0}")]
    Login(#[source] ApiError),
    #[error("Token refresh failed: {0}")]
    Refresh(#[source] ApiError),
    #[error("No refresh token available")]
    MissingRefreshToken,
    #[error("Invalid credential blob: {0}")]
    InvalidCredentialBlob(#[source] serde_json::Error),
    #[error("Credential source unavailable: {0}")]
    CredentialSource(String),
}

impl AuthError {
    /// The request gateway error behind a failed exchange, unchanged.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Login(err) | Self::Refresh(err) => Some(err),
            _ => None,
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        matches!(self.api_error(), Some(ApiError::Cancelled))
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::CredentialSource(error.to_string())
    }
}
