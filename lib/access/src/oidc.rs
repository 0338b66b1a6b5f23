//! Keycloak realm configuration.
//!
//! This module provides the configuration needed to reach a Keycloak realm
//! and derives the realm's OpenID Connect endpoint URLs from it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Path of a realm's OpenID Connect endpoints below the server URL.
const OIDC_PATH: &str = "protocol/openid-connect";

/// Configuration for the Keycloak identity provider.
///
/// Fields with defaults can be omitted when loading from environment variables.
#[derive(Clone, Serialize, Deserialize)]
pub struct KeycloakConfig {
    /// Base URL of the Keycloak server (e.g., "https://sso.example.com").
    server_url: String,
    /// The realm users authenticate against.
    realm: String,
    /// The confidential client registered in the realm.
    client_id: String,
    /// The client secret.
    client_secret: String,
    /// OAuth2 scopes to request as a comma-separated string.
    /// Default: "openid,profile,email"
    #[serde(default = "default_scopes")]
    scopes: String,
    /// Redirect URI used when exchanging codes on the callback endpoint.
    /// Default: "http://localhost:3000/auth/callback"
    #[serde(default = "default_callback_redirect_uri")]
    callback_redirect_uri: String,
    /// Timeout for each request to Keycloak, in seconds.
    /// Default: 10
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
}

fn default_scopes() -> String {
    "openid,profile,email".to_string()
}

fn default_callback_redirect_uri() -> String {
    "http://localhost:3000/auth/callback".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

impl KeycloakConfig {
    /// Creates a new configuration with defaults for optional fields.
    #[must_use]
    pub fn new(server_url: String, realm: String, client_id: String, client_secret: String) -> Self {
        Self {
            server_url,
            realm,
            client_id,
            client_secret,
            scopes: default_scopes(),
            callback_redirect_uri: default_callback_redirect_uri(),
            timeout_seconds: default_timeout_seconds(),
        }
    }

    /// Creates a configuration builder for more customization.
    #[must_use]
    pub fn builder(
        server_url: String,
        realm: String,
        client_id: String,
        client_secret: String,
    ) -> KeycloakConfigBuilder {
        KeycloakConfigBuilder::new(server_url, realm, client_id, client_secret)
    }

    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    #[must_use]
    pub fn realm(&self) -> &str {
        &self.realm
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Returns the OAuth2 scopes to request, parsed from comma-separated string.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.scopes
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    #[must_use]
    pub fn callback_redirect_uri(&self) -> &str {
        &self.callback_redirect_uri
    }

    #[must_use]
    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    /// Returns the realm issuer URL, e.g. `https://sso.example.com/realms/main`.
    #[must_use]
    pub fn issuer_url(&self) -> String {
        format!(
            "{}/realms/{}",
            self.server_url.trim_end_matches('/'),
            self.realm
        )
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{OIDC_PATH}/{name}", self.issuer_url())
    }

    #[must_use]
    pub fn authorization_endpoint(&self) -> String {
        self.endpoint("auth")
    }

    #[must_use]
    pub fn token_endpoint(&self) -> String {
        self.endpoint("token")
    }

    #[must_use]
    pub fn introspection_endpoint(&self) -> String {
        self.endpoint("token/introspect")
    }

    #[must_use]
    pub fn userinfo_endpoint(&self) -> String {
        self.endpoint("userinfo")
    }

    #[must_use]
    pub fn revocation_endpoint(&self) -> String {
        self.endpoint("revoke")
    }

    #[must_use]
    pub fn end_session_endpoint(&self) -> String {
        self.endpoint("logout")
    }
}

impl fmt::Debug for KeycloakConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeycloakConfig")
            .field("server_url", &self.server_url)
            .field("realm", &self.realm)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("scopes", &self.scopes)
            .field("callback_redirect_uri", &self.callback_redirect_uri)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Builder for `KeycloakConfig`.
#[derive(Debug)]
pub struct KeycloakConfigBuilder {
    config: KeycloakConfig,
    scopes: Vec<String>,
}

impl KeycloakConfigBuilder {
    /// Creates a new builder with required fields.
    #[must_use]
    pub fn new(server_url: String, realm: String, client_id: String, client_secret: String) -> Self {
        let config = KeycloakConfig::new(server_url, realm, client_id, client_secret);
        let scopes = config.scopes().into_iter().map(str::to_string).collect();
        Self { config, scopes }
    }

    /// Sets the OAuth2 scopes to request.
    #[must_use]
    pub fn scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Adds a scope to the list of scopes to request.
    #[must_use]
    pub fn add_scope(mut self, scope: String) -> Self {
        if !self.scopes.contains(&scope) {
            self.scopes.push(scope);
        }
        self
    }

    #[must_use]
    pub fn callback_redirect_uri(mut self, uri: String) -> Self {
        self.config.callback_redirect_uri = uri;
        self
    }

    #[must_use]
    pub fn timeout_seconds(mut self, seconds: u64) -> Self {
        self.config.timeout_seconds = seconds;
        self
    }

    /// Builds the `KeycloakConfig`.
    #[must_use]
    pub fn build(self) -> KeycloakConfig {
        KeycloakConfig {
            scopes: self.scopes.join(","),
            ..self.config
        }
    }
}
