use std::fs;
use std::path::{Path, PathBuf};

use super::error::AuthError;

/// Source of the raw credential blob for one user.
///
/// The blob is read-only from the gateway's point of view: refreshed tokens
/// are never written back.
pub trait CredentialProvider: Send + Sync {
    fn provide_secret(&self) -> Result<String, AuthError>;
}

/// In-memory credential blob.
#[derive(Clone)]
pub struct StaticCredentials {
    blob: String,
}

impl StaticCredentials {
    pub fn new(blob: impl Into<String>) -> Self {
        Self { blob: blob.into() }
    }
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials").finish_non_exhaustive()
    }
}

impl CredentialProvider for StaticCredentials {
    fn provide_secret(&self) -> Result<String, AuthError> {
        Ok(self.blob.clone())
    }
}

/// Credential blob stored as a JSON file.
///
/// # Example
/// ```no_run
/// use chargeamps_gateway::auth::{CredentialProvider, FileCredentials};
///
/// let provider = FileCredentials::new("/etc/chargeamps/user-42.json");
/// let blob = provider.provide_secret()?;
/// # Ok::<(), chargeamps_gateway::auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileCredentials {
    path: PathBuf,
}

impl FileCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialProvider for FileCredentials {
    fn provide_secret(&self) -> Result<String, AuthError> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(data),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(
                AuthError::CredentialSource(format!("{} not found", self.path.display())),
            ),
            Err(err) => Err(err.into()),
        }
    }
}

/// Credential blob held in an environment variable.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvCredentials {
    fn provide_secret(&self) -> Result<String, AuthError> {
        std::env::var(&self.var)
            .map_err(|e| AuthError::CredentialSource(format!("{}: {e}", self.var)))
    }
}
