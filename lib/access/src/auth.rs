//! Bearer-token authentication strategy.
//!
//! [`BearerAuthenticator`] maps the raw `Authorization` header of a request
//! to exactly one [`AuthOutcome`]:
//! - no header: the strategy abstains
//! - a header not shaped `Bearer <token>`: malformed, rejected by the caller
//! - a token the provider refuses, or any provider failure: rejected
//! - otherwise: an authenticated principal plus the raw token
//!
//! The strategy keeps no state between calls and is safe to share across
//! concurrent requests.

use crate::error::AuthenticationError;
use crate::principal::Principal;
use crate::verifier::Verifier;
use keycloak_gate_core::AccessToken;
use tracing::{debug, instrument, warn};

/// Literal prefix of a bearer credential. Case-sensitive.
pub const BEARER_PREFIX: &str = "Bearer ";

/// A verified caller: the principal and the token it presented.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedPrincipal {
    principal: Principal,
    token: AccessToken,
}

impl AuthenticatedPrincipal {
    #[must_use]
    pub fn new(principal: Principal, token: AccessToken) -> Self {
        Self { principal, token }
    }

    #[must_use]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Returns the raw token, for pass-through to other services.
    #[must_use]
    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    #[must_use]
    pub fn into_parts(self) -> (Principal, AccessToken) {
        (self.principal, self.token)
    }
}

/// Terminal result of one authentication attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// No credential was presented. Other strategies may still apply.
    NoCredential,
    /// A credential was presented but is not `Bearer <token>`.
    MalformedCredential,
    /// The token is inactive, could not be verified, or names no user.
    Rejected,
    /// The provider confirmed the token.
    Authenticated(Box<AuthenticatedPrincipal>),
}

impl AuthOutcome {
    /// Returns true if the strategy abstained.
    #[must_use]
    pub fn is_abstention(&self) -> bool {
        matches!(self, Self::NoCredential)
    }

    /// Returns the principal if authentication succeeded.
    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Authenticated(auth) => Some(auth.principal()),
            _ => None,
        }
    }

    /// Converts the outcome into a `Result`, treating abstention as a
    /// missing credential.
    ///
    /// # Errors
    ///
    /// Returns the matching [`AuthenticationError`] for every outcome other
    /// than `Authenticated`.
    pub fn into_result(self) -> Result<AuthenticatedPrincipal, AuthenticationError> {
        match self {
            Self::Authenticated(auth) => Ok(*auth),
            Self::NoCredential => Err(AuthenticationError::MissingCredential),
            Self::MalformedCredential => Err(AuthenticationError::MalformedCredential),
            Self::Rejected => Err(AuthenticationError::Rejected),
        }
    }

    /// Like [`into_result`](Self::into_result), but abstention is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed or rejected credentials.
    pub fn into_optional(self) -> Result<Option<AuthenticatedPrincipal>, AuthenticationError> {
        match self {
            Self::NoCredential => Ok(None),
            other => other.into_result().map(Some),
        }
    }
}

/// Shape of the credential found in an `Authorization` header.
#[derive(Debug, PartialEq, Eq)]
enum Credential<'a> {
    Absent,
    Malformed,
    Bearer(&'a str),
}

fn parse_credential(header: Option<&str>) -> Credential<'_> {
    let Some(header) = header.filter(|h| !h.is_empty()) else {
        return Credential::Absent;
    };

    match header.strip_prefix(BEARER_PREFIX).map(str::trim) {
        Some(token) if !token.is_empty() => Credential::Bearer(token),
        _ => Credential::Malformed,
    }
}

/// Authenticates requests by verifying bearer tokens with the provider.
#[derive(Debug, Clone)]
pub struct BearerAuthenticator<V> {
    verifier: V,
}

impl<V: Verifier> BearerAuthenticator<V> {
    /// Creates an authenticator backed by `verifier`.
    #[must_use]
    pub fn new(verifier: V) -> Self {
        Self { verifier }
    }

    /// Authenticates a request from its raw `Authorization` header value.
    ///
    /// Never fails: every provider error is logged and reported as
    /// [`AuthOutcome::Rejected`].
    #[instrument(skip_all)]
    pub async fn authenticate(&self, authorization: Option<&str>) -> AuthOutcome {
        let token = match parse_credential(authorization) {
            Credential::Absent => return AuthOutcome::NoCredential,
            Credential::Malformed => {
                debug!("authorization header is not a bearer credential");
                return AuthOutcome::MalformedCredential;
            }
            Credential::Bearer(token) => token,
        };

        match self.verifier.introspect(token).await {
            Ok(introspection) if introspection.active => {}
            Ok(_) => {
                debug!("token is not active");
                return AuthOutcome::Rejected;
            }
            Err(report) => {
                warn!(error = %report, "token introspection failed");
                return AuthOutcome::Rejected;
            }
        }

        let claims = match self.verifier.fetch_claims(token).await {
            Ok(claims) => claims,
            Err(report) => {
                warn!(error = %report, "fetching token claims failed");
                return AuthOutcome::Rejected;
            }
        };

        let principal = Principal::from_claims(&claims);
        if !principal.has_resolvable_username() {
            warn!("token claims carry no usable username");
            return AuthOutcome::Rejected;
        }

        debug!(
            username = principal.username(),
            display_name = %principal.display_name(),
            roles = %principal.roles(),
            "bearer token authenticated"
        );

        AuthOutcome::Authenticated(Box::new(AuthenticatedPrincipal::new(
            principal,
            AccessToken::new(token),
        )))
    }
}
