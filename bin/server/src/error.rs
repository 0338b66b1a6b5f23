//! HTTP error responses.
//!
//! Every error body has the shape `{"detail": "<message>"}`. Messages are
//! user-safe: upstream failures are logged here and replaced by a generic
//! message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use keycloak_gate_access::{AuthenticationError, AuthorizationError};
use serde::Serialize;
use std::fmt;

use crate::auth::ProviderError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Errors returned by route handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The request or Keycloak's verdict on it was invalid.
    BadRequest(String),
    /// Bearer authentication failed.
    Unauthorized(AuthenticationError),
    /// The principal lacks a required role.
    Forbidden(AuthorizationError),
    /// Keycloak could not be reached or answered nonsense.
    Upstream(ProviderError),
}

impl ApiError {
    /// Classifies a Keycloak failure for the operation described by `action`
    /// (e.g. "Failed to get token").
    ///
    /// Refusals by Keycloak and bad caller input become 400 with Keycloak's
    /// description; everything else is an upstream failure.
    pub fn from_provider(action: &str, err: ProviderError) -> Self {
        match err {
            ProviderError::Rejected { description, .. } => {
                Self::BadRequest(format!("{action}: {description}"))
            }
            ProviderError::InvalidRequest(reason) => Self::BadRequest(format!("{action}: {reason}")),
            other => Self::Upstream(other),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "{msg}"),
            Self::Unauthorized(err) => write!(f, "{err}"),
            Self::Forbidden(_) => write!(f, "You do not have permission to perform this action."),
            Self::Upstream(_) => write!(f, "Identity provider unavailable"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Upstream(err) => {
                tracing::error!(error = %err, "Keycloak request failed");
            }
            Self::Forbidden(err) => {
                tracing::info!(reason = %err, "Role check failed");
            }
            Self::BadRequest(_) | Self::Unauthorized(_) => {}
        }

        let body = ErrorBody {
            detail: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
