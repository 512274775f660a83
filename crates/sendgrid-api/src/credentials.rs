//! Provider credentials and the choice of API variant they imply.

use crate::error::{Error, Result};
use std::fmt;

/// How requests are authenticated.
///
/// An API key selects the v3 JSON API; a username and password select the
/// legacy v2 form API.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// v3 API key, sent as a bearer token.
    ApiKey(String),
    /// v2 account credentials, sent as `api_user` / `api_key` fields.
    Legacy {
        /// Account username.
        user: String,
        /// Account password.
        password: String,
    },
}

impl Credentials {
    /// Creates API key credentials.
    #[must_use]
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(key.into())
    }

    /// Creates legacy username/password credentials.
    #[must_use]
    pub fn legacy(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Legacy {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Picks credentials from the available sources.
    ///
    /// Precedence: an explicit key, then a username (which needs a password),
    /// then a fallback key from configuration or the environment. Empty
    /// strings count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredentials`] when nothing usable is present.
    pub fn resolve(
        explicit_key: Option<&str>,
        user: Option<&str>,
        password: Option<&str>,
        fallback_key: Option<&str>,
    ) -> Result<Self> {
        if let Some(key) = present(explicit_key) {
            return Ok(Self::api_key(key));
        }
        if let Some(user) = present(user) {
            return present(password)
                .map(|password| Self::legacy(user, password))
                .ok_or(Error::MissingCredentials);
        }
        present(fallback_key)
            .map(Self::api_key)
            .ok_or(Error::MissingCredentials)
    }

    /// Returns true if these credentials use the legacy API.
    #[must_use]
    pub const fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy { .. })
    }
}

/// Treats an empty string as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.debug_tuple("ApiKey").field(&"<redacted>").finish(),
            Self::Legacy { user, .. } => f
                .debug_struct("Legacy")
                .field("user", user)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}
