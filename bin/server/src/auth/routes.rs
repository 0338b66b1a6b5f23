//! OAuth2 routes: login redirect, code exchange, refresh, revoke, logout.
//!
//! Each handler forwards its parameters to Keycloak and reshapes the answer.
//! Keycloak refusals are reported as 400 with Keycloak's error description.

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header::LOCATION},
    response::IntoResponse,
};
use keycloak_gate_access::{Principal, UserInfo};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{AppState, RequireBearer, TokenSet, TokenTypeHint};
use crate::error::ApiError;

/// Query parameters for the login redirect.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    redirect_uri: String,
    nonce: String,
}

/// Query parameters for exchanging a code.
#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    code: String,
    redirect_uri: String,
}

/// Query parameters for the OAuth2 callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: String,
}

/// Body carrying a refresh token.
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    refresh_token: String,
}

/// Body of a revocation request.
#[derive(Debug, Deserialize)]
pub struct RevokeTokenRequest {
    token: String,
    token_type_hint: TokenTypeHint,
}

/// Issued tokens together with the userinfo of the new access token.
///
/// `userinfo` is omitted when Keycloak could not provide it.
#[derive(Debug, Serialize)]
pub struct TokenWithUserInfo {
    #[serde(flatten)]
    pub token: TokenSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub userinfo: Option<UserInfo>,
}

/// Redirects the user agent to the Keycloak login page.
///
/// A fresh random `state` is attached to the authorization URL; the caller's
/// `nonce` is passed through.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoginQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (auth_url, _csrf_state) = state
        .keycloak
        .authorization_url(&query.redirect_uri, &query.nonce)
        .map_err(|e| ApiError::from_provider("Failed to build login URL", e))?;

    Ok((StatusCode::FOUND, [(LOCATION, auth_url)]))
}

/// Exchanges an authorization code for tokens.
pub async fn token(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<TokenWithUserInfo>, ApiError> {
    exchange_with_userinfo(&state, &query.code, &query.redirect_uri)
        .await
        .map(Json)
}

/// Exchanges a code using the configured callback redirect URI.
pub async fn callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<TokenWithUserInfo>, ApiError> {
    let redirect_uri = state.keycloak.config().callback_redirect_uri().to_string();
    exchange_with_userinfo(&state, &query.code, &redirect_uri)
        .await
        .map(Json)
}

async fn exchange_with_userinfo(
    state: &AppState,
    code: &str,
    redirect_uri: &str,
) -> Result<TokenWithUserInfo, ApiError> {
    let token = state
        .keycloak
        .exchange_code(code, redirect_uri)
        .await
        .map_err(|e| ApiError::from_provider("Failed to get token", e))?;

    // A missing userinfo does not invalidate freshly issued tokens.
    let userinfo = match state.keycloak.userinfo(&token.access_token).await {
        Ok(claims) => Some(UserInfo::from_claims(&claims)),
        Err(e) => {
            tracing::warn!(error = %e, "Fetching userinfo after code exchange failed");
            None
        }
    };

    Ok(TokenWithUserInfo { token, userinfo })
}

/// Obtains fresh tokens with a refresh token.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<Json<TokenSet>, ApiError> {
    state
        .keycloak
        .refresh(&request.refresh_token)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_provider("Failed to refresh token", e))
}

/// Revokes an access or refresh token.
pub async fn revoke(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RevokeTokenRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .keycloak
        .revoke(&request.token, request.token_type_hint)
        .await
        .map_err(|e| ApiError::from_provider("Failed to revoke token", e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Ends the Keycloak session of a refresh token.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .keycloak
        .logout(&request.refresh_token)
        .await
        .map_err(|e| ApiError::from_provider("Failed to logout", e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the authenticated principal.
pub async fn me(RequireBearer(auth): RequireBearer) -> Json<Principal> {
    let (principal, _token) = auth.into_parts();
    Json(principal)
}
