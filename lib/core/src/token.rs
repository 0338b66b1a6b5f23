//! Bearer credential wrapper.
//!
//! Raw tokens travel through logging-heavy code paths, so the wrapper keeps
//! them out of `Debug` output. Use [`AccessToken::secret`] where the raw
//! value is genuinely needed (forwarding to the provider, handing it back to
//! the caller).

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque bearer token as presented by a client.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper, returning the raw token.
    #[must_use]
    pub fn into_secret(self) -> String {
        self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([redacted])")
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}
