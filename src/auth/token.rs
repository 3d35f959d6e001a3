use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::error::AuthError;

/// Token pair and user profile returned by `auth/login` and
/// `auth/refreshToken`, and stored in credential blobs.
///
/// An empty `access_token` means "not authenticated".
///
/// # Example
/// ```
/// use chargeamps_gateway::auth::SessionToken;
///
/// let token = SessionToken::from_blob(
///     r#"{"token":"T1","refreshToken":"R1","user":{"id":"u1"}}"#,
/// )?;
/// assert_eq!(token.access_token, "T1");
/// assert_eq!(token.user.id, "u1");
/// # Ok::<(), chargeamps_gateway::auth::AuthError>(())
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "token", default, deserialize_with = "null_as_default")]
    pub access_token: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub refresh_token: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: UserProfile,
}

impl SessionToken {
    /// Decode a raw credential blob.
    pub fn from_blob(blob: &str) -> Result<Self, AuthError> {
        serde_json::from_str(blob).map_err(AuthError::InvalidCredentialBlob)
    }

    /// Serialize back to the wire shape.
    pub fn to_blob(&self) -> Result<String, AuthError> {
        serde_json::to_string(self).map_err(AuthError::InvalidCredentialBlob)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.access_token.is_empty()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("message", &self.message)
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub mobile: String,
    pub rfid_tags: Option<Vec<RfidTag>>,
    #[serde(deserialize_with = "null_as_default")]
    pub user_status: String,
}

impl UserProfile {
    /// Tags the user may start a charge with.
    pub fn active_rfid_tags(&self) -> impl Iterator<Item = &RfidTag> {
        self.rfid_tags.iter().flatten().filter(|tag| tag.active)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RfidTag {
    pub active: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub rfid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rfid_dec: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rfid_dec_reverse: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}
