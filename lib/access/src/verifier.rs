//! Token verification capability consumed by the authentication strategy.
//!
//! The identity provider client lives outside this crate; the strategy only
//! needs the two calls below. Tests substitute an in-memory fake.

use crate::claims::ClaimSet;
use crate::error::VerifierError;
use async_trait::async_trait;
use keycloak_gate_core::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of token introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Introspection {
    /// Whether the provider considers the token currently valid.
    ///
    /// A response without `active` is treated as inactive.
    #[serde(default)]
    pub active: bool,
}

impl Introspection {
    #[must_use]
    pub fn active() -> Self {
        Self { active: true }
    }

    #[must_use]
    pub fn inactive() -> Self {
        Self { active: false }
    }
}

/// Confirms tokens and resolves their claims against the identity provider.
///
/// Implementations report every failure as an error; they must not panic.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Asks the provider whether `token` is active.
    async fn introspect(&self, token: &str) -> Result<Introspection, VerifierError>;

    /// Fetches the claim set for `token`.
    ///
    /// Only called after [`Verifier::introspect`] reported the token active.
    async fn fetch_claims(&self, token: &str) -> Result<ClaimSet, VerifierError>;
}

#[async_trait]
impl<V: Verifier + ?Sized> Verifier for Arc<V> {
    async fn introspect(&self, token: &str) -> Result<Introspection, VerifierError> {
        (**self).introspect(token).await
    }

    async fn fetch_claims(&self, token: &str) -> Result<ClaimSet, VerifierError> {
        (**self).fetch_claims(token).await
    }
}

#[async_trait]
impl<V: Verifier + ?Sized> Verifier for &V {
    async fn introspect(&self, token: &str) -> Result<Introspection, VerifierError> {
        (**self).introspect(token).await
    }

    async fn fetch_claims(&self, token: &str) -> Result<ClaimSet, VerifierError> {
        (**self).fetch_claims(token).await
    }
}
