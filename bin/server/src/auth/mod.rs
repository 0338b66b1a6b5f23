//! Authentication module for the keycloak-gate server.
//!
//! This module provides:
//! - The Keycloak client that forwards OAuth2 flows to the realm
//! - Bearer-token extractors for Axum routes
//! - The `/oauth2/*` route handlers
//!
//! # Authorization Model
//!
//! Every authenticated request is verified against Keycloak (introspection,
//! then userinfo). Nothing is cached or stored server-side, so a token
//! revoked in Keycloak stops working on the next request.
//!
//! Role checks are left to handlers: extract a [`RequireBearer`] and call
//! [`require_role`] or [`require_any_role`].

pub mod middleware;
pub mod oidc;
pub mod routes;

use keycloak_gate_access::{BearerAuthenticator, Verifier};
use std::sync::Arc;

pub use middleware::{AuthRejection, OptionalBearer, RequireBearer, require_any_role, require_role};
pub use oidc::{KeycloakClient, ProviderError, TokenSet, TokenTypeHint};
pub use routes::{callback, login, logout, me, refresh, revoke, token};

/// Shared application state.
pub struct AppState {
    /// Keycloak client for the OAuth2 endpoints.
    pub keycloak: Arc<KeycloakClient>,
    /// Bearer authentication strategy.
    pub authenticator: BearerAuthenticator<Arc<dyn Verifier>>,
}

impl AppState {
    /// Creates application state that verifies bearer tokens with `keycloak`.
    pub fn new(keycloak: KeycloakClient) -> Self {
        let keycloak = Arc::new(keycloak);
        let verifier: Arc<dyn Verifier> = keycloak.clone();
        Self {
            keycloak,
            authenticator: BearerAuthenticator::new(verifier),
        }
    }
}
