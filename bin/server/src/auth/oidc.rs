//! Keycloak client for the realm's OpenID Connect endpoints.
//!
//! Token endpoint semantics stay with Keycloak: this client only forwards
//! parameters and hands back Keycloak's JSON. It also implements
//! [`Verifier`] so the bearer authenticator can introspect tokens and fetch
//! their claims.

use async_trait::async_trait;
use keycloak_gate_access::{ClaimSet, Introspection, KeycloakConfig, Verifier, VerifierError};
use oauth2::basic::BasicClient;
use oauth2::{AuthUrl, ClientId, CsrfToken, RedirectUrl, Scope};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// Tokens issued by Keycloak's token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_state: Option<String>,
}

/// Which kind of token is being revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenTypeHint {
    AccessToken,
    RefreshToken,
}

impl TokenTypeHint {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::RefreshToken => "refresh_token",
        }
    }
}

/// Error body returned by Keycloak endpoints.
#[derive(Debug, Default, Deserialize)]
struct KeycloakErrorBody {
    error: Option<String>,
    error_description: Option<String>,
}

/// Keycloak client errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Configuration error (invalid URLs, HTTP client setup).
    Configuration(String),
    /// The caller supplied an unusable parameter.
    InvalidRequest(String),
    /// Keycloak could not be reached.
    Transport(String),
    /// Keycloak did not answer within the configured timeout.
    Timeout,
    /// Keycloak refused the request.
    Rejected { status: u16, description: String },
    /// Keycloak's response could not be decoded.
    InvalidResponse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "Keycloak configuration error: {msg}"),
            Self::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            Self::Transport(msg) => write!(f, "Keycloak transport error: {msg}"),
            Self::Timeout => write!(f, "Keycloak request timed out"),
            Self::Rejected {
                status,
                description,
            } => write!(f, "Keycloak returned {status}: {description}"),
            Self::InvalidResponse(msg) => write!(f, "invalid Keycloak response: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<ProviderError> for VerifierError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Timeout => Self::Timeout,
            ProviderError::Rejected {
                status,
                description,
            } => Self::Provider {
                status,
                reason: description,
            },
            ProviderError::InvalidResponse(reason) => Self::InvalidResponse { reason },
            ProviderError::Configuration(reason)
            | ProviderError::InvalidRequest(reason)
            | ProviderError::Transport(reason) => Self::Transport { reason },
        }
    }
}

/// Keycloak client for one realm.
///
/// Holds a pooled HTTP client; cheap to share behind an `Arc`.
pub struct KeycloakClient {
    http: reqwest::Client,
    config: KeycloakConfig,
}

impl KeycloakClient {
    /// Creates a client for the configured realm.
    ///
    /// # Errors
    ///
    /// Returns an error if the realm URLs are invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: KeycloakConfig) -> Result<Self, ProviderError> {
        AuthUrl::new(config.authorization_endpoint())
            .map_err(|e| ProviderError::Configuration(format!("invalid server URL: {e}")))?;

        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()
            .map_err(|e| {
                ProviderError::Configuration(format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self { http, config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &KeycloakConfig {
        &self.config
    }

    /// Builds the Keycloak login URL for an authorization-code flow.
    ///
    /// Returns the URL and the freshly generated `state` value.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidRequest`] if `redirect_uri` is not a URL.
    pub fn authorization_url(
        &self,
        redirect_uri: &str,
        nonce: &str,
    ) -> Result<(String, String), ProviderError> {
        let auth_url = AuthUrl::new(self.config.authorization_endpoint())
            .map_err(|e| ProviderError::Configuration(format!("invalid auth URL: {e}")))?;
        let redirect_url = RedirectUrl::new(redirect_uri.to_string())
            .map_err(|e| ProviderError::InvalidRequest(format!("invalid redirect_uri: {e}")))?;

        let client = BasicClient::new(ClientId::new(self.config.client_id().to_string()))
            .set_auth_uri(auth_url)
            .set_redirect_uri(redirect_url);

        let mut auth_request = client.authorize_url(CsrfToken::new_random);

        for scope in self.config.scopes() {
            auth_request = auth_request.add_scope(Scope::new(scope.to_string()));
        }

        let (url, csrf_token) = auth_request
            .add_extra_param("nonce", nonce.to_string())
            .url();

        Ok((url.to_string(), csrf_token.secret().clone()))
    }

    /// Exchanges an authorization code for tokens.
    #[instrument(skip_all)]
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenSet, ProviderError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", self.config.client_id()),
            ("client_secret", self.config.client_secret()),
        ];
        self.post_form_json(&self.config.token_endpoint(), &form)
            .await
    }

    /// Obtains fresh tokens with a refresh token.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, ProviderError> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.config.client_id()),
            ("client_secret", self.config.client_secret()),
        ];
        self.post_form_json(&self.config.token_endpoint(), &form)
            .await
    }

    /// Asks Keycloak whether a token is active.
    #[instrument(skip_all)]
    pub async fn introspect_token(&self, token: &str) -> Result<Introspection, ProviderError> {
        let form = [
            ("token", token),
            ("client_id", self.config.client_id()),
            ("client_secret", self.config.client_secret()),
        ];
        self.post_form_json(&self.config.introspection_endpoint(), &form)
            .await
    }

    /// Fetches the userinfo claims for an access token.
    #[instrument(skip_all)]
    pub async fn userinfo(&self, access_token: &str) -> Result<ClaimSet, ProviderError> {
        let response = self
            .http
            .get(self.config.userinfo_endpoint())
            .bearer_auth(access_token)
            .send()
            .await?;
        let value: serde_json::Value = read_json(check_status(response).await?).await?;

        keycloak_gate_access::claims_from_value(value)
            .ok_or_else(|| ProviderError::InvalidResponse("userinfo is not a JSON object".to_string()))
    }

    /// Revokes an access or refresh token.
    #[instrument(skip(self, token))]
    pub async fn revoke(&self, token: &str, hint: TokenTypeHint) -> Result<(), ProviderError> {
        let form = [
            ("token", token),
            ("token_type_hint", hint.as_str()),
            ("client_id", self.config.client_id()),
            ("client_secret", self.config.client_secret()),
        ];
        self.post_form(&self.config.revocation_endpoint(), &form)
            .await
            .map(drop)
    }

    /// Ends the Keycloak session tied to a refresh token.
    #[instrument(skip_all)]
    pub async fn logout(&self, refresh_token: &str) -> Result<(), ProviderError> {
        let form = [
            ("refresh_token", refresh_token),
            ("client_id", self.config.client_id()),
            ("client_secret", self.config.client_secret()),
        ];
        self.post_form(&self.config.end_session_endpoint(), &form)
            .await
            .map(drop)
    }

    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<reqwest::Response, ProviderError> {
        let response = self.http.post(url).form(form).send().await?;
        check_status(response).await
    }

    async fn post_form_json<T: DeserializeOwned>(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        read_json(self.post_form(url, form).await?).await
    }
}

/// Passes successful responses through; turns error statuses into
/// [`ProviderError::Rejected`] carrying Keycloak's error description.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let parsed: KeycloakErrorBody = serde_json::from_str(&body).unwrap_or_default();
    let description = parsed
        .error_description
        .filter(|d| !d.is_empty())
        .or(parsed.error)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

    debug!(status = status.as_u16(), %description, "Keycloak rejected request");

    Err(ProviderError::Rejected {
        status: status.as_u16(),
        description,
    })
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ProviderError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ProviderError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl Verifier for KeycloakClient {
    async fn introspect(
        &self,
        token: &str,
    ) -> keycloak_gate_core::Result<Introspection, VerifierError> {
        Ok(self
            .introspect_token(token)
            .await
            .map_err(VerifierError::from)?)
    }

    async fn fetch_claims(
        &self,
        token: &str,
    ) -> keycloak_gate_core::Result<ClaimSet, VerifierError> {
        Ok(self.userinfo(token).await.map_err(VerifierError::from)?)
    }
}
