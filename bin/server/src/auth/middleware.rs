//! Bearer authentication extractors for Axum.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{
        HeaderValue,
        header::{AUTHORIZATION, WWW_AUTHENTICATE},
        request::Parts,
    },
    response::{IntoResponse, Response},
};
use keycloak_gate_access::{
    AuthOutcome, AuthenticatedPrincipal, AuthenticationError, AuthorizationError, Principal,
};
use std::sync::Arc;

use super::AppState;
use crate::error::ApiError;

/// Reads the `Authorization` header and runs the bearer strategy.
///
/// A header that is not valid visible ASCII counts as malformed.
async fn authenticate_parts(parts: &Parts, state: &AppState) -> AuthOutcome {
    match parts.headers.get(AUTHORIZATION).map(HeaderValue::to_str) {
        None => AuthOutcome::NoCredential,
        Some(Err(_)) => AuthOutcome::MalformedCredential,
        Some(Ok(header)) => state.authenticator.authenticate(Some(header)).await,
    }
}

/// Extractor for requiring a verified bearer token.
///
/// Requests without a valid token are answered with 401.
pub struct RequireBearer(pub AuthenticatedPrincipal);

impl<S> FromRequestParts<S> for RequireBearer
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        authenticate_parts(parts, &app_state)
            .await
            .into_result()
            .map(RequireBearer)
            .map_err(AuthRejection)
    }
}

/// Extractor for optionally authenticating the request.
///
/// Returns `None` when no credential was sent. A malformed or refused
/// credential is still rejected with 401.
pub struct OptionalBearer(pub Option<AuthenticatedPrincipal>);

impl<S> FromRequestParts<S> for OptionalBearer
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        authenticate_parts(parts, &app_state)
            .await
            .into_optional()
            .map(OptionalBearer)
            .map_err(AuthRejection)
    }
}

/// Rejection type for the bearer extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthRejection(pub AuthenticationError);

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let mut response = ApiError::Unauthorized(self.0).into_response();
        response
            .headers_mut()
            .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        response
    }
}

/// Fails with 403 unless `principal` holds `role`.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] if the role is missing.
pub fn require_role(principal: &Principal, role: &str) -> Result<(), ApiError> {
    if principal.has_role(role) {
        return Ok(());
    }
    Err(ApiError::Forbidden(AuthorizationError::MissingRole {
        username: principal.username().to_string(),
        role: role.to_string(),
    }))
}

/// Fails with 403 unless `principal` holds at least one of `roles`.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] if none of the roles is held.
pub fn require_any_role(principal: &Principal, roles: &[&str]) -> Result<(), ApiError> {
    if principal.has_any_role(roles) {
        return Ok(());
    }
    Err(ApiError::Forbidden(AuthorizationError::MissingAnyRole {
        username: principal.username().to_string(),
        roles: roles.iter().map(|r| (*r).to_string()).collect(),
    }))
}
