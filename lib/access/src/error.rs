//! Error types for the access crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `VerifierError`: Failures talking to the identity provider
//! - `AuthenticationError`: Bearer authentication failures shown to callers
//! - `AuthorizationError`: Role check failures

use std::fmt;

/// Errors raised by a [`Verifier`](crate::Verifier) implementation.
///
/// These carry the real cause and are meant for logs. The authentication
/// strategy folds all of them into a single rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifierError {
    /// The provider could not be reached.
    Transport { reason: String },
    /// The provider did not answer in time.
    Timeout,
    /// The provider answered with an error status.
    Provider { status: u16, reason: String },
    /// The provider's response could not be decoded.
    InvalidResponse { reason: String },
}

impl fmt::Display for VerifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { reason } => {
                write!(f, "identity provider unreachable: {reason}")
            }
            Self::Timeout => {
                write!(f, "identity provider timed out")
            }
            Self::Provider { status, reason } => {
                write!(f, "identity provider returned {status}: {reason}")
            }
            Self::InvalidResponse { reason } => {
                write!(f, "invalid identity provider response: {reason}")
            }
        }
    }
}

impl std::error::Error for VerifierError {}

/// Bearer authentication failures.
///
/// The `Display` output is safe to return to clients; it never contains the
/// reason a token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationError {
    /// No `Authorization` header was sent.
    MissingCredential,
    /// The `Authorization` header is not of the form `Bearer <token>`.
    MalformedCredential,
    /// The token is inactive, unverifiable, or does not identify a user.
    Rejected,
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential => {
                write!(f, "authentication credentials were not provided")
            }
            Self::MalformedCredential => {
                write!(f, "invalid Authorization header")
            }
            Self::Rejected => {
                write!(f, "invalid access_token")
            }
        }
    }
}

impl std::error::Error for AuthenticationError {}

/// Errors from role-based authorization checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    /// The principal lacks a required role.
    MissingRole { username: String, role: String },
    /// The principal holds none of the accepted roles.
    MissingAnyRole {
        username: String,
        roles: Vec<String>,
    },
}

impl fmt::Display for AuthorizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRole { username, role } => {
                write!(f, "user {username} lacks role '{role}'")
            }
            Self::MissingAnyRole { username, roles } => {
                write!(f, "user {username} holds none of [{}]", roles.join(", "))
            }
        }
    }
}

impl std::error::Error for AuthorizationError {}
