//! Keycloak claims model and bearer-token authentication for keycloak-gate.
//!
//! This crate provides:
//! - Claim set helpers (`ClaimSet`, typed claim lookups)
//! - Role extraction from Keycloak realm and client roles (`RoleSet`)
//! - The per-request authenticated identity (`Principal`)
//! - The userinfo summary handed out with issued tokens (`UserInfo`)
//! - The bearer authentication strategy (`BearerAuthenticator`, `AuthOutcome`)
//! - The provider capability it depends on (`Verifier`)
//! - Keycloak realm configuration (`KeycloakConfig`)
//!
//! # Role Model
//!
//! Realm roles are kept verbatim; client roles become `<client>:<role>`.
//! Both land in one sorted, de-duplicated set.
//!
//! # Example
//!
//! ```
//! use keycloak_gate_access::{Principal, claims_from_value};
//! use serde_json::json;
//!
//! let claims = claims_from_value(json!({
//!     "sub": "u1",
//!     "preferred_username": "alice",
//!     "realm_access": {"roles": ["user"]},
//!     "resource_access": {"billing": {"roles": ["viewer"]}}
//! }))
//! .expect("claims are an object");
//!
//! let principal = Principal::from_claims(&claims);
//!
//! assert_eq!(principal.username(), "alice");
//! assert_eq!(principal.roles().as_slice(), &["billing:viewer", "user"]);
//! assert!(principal.has_all_roles(["user", "billing:viewer"]));
//! ```

pub mod auth;
pub mod claims;
pub mod error;
pub mod oidc;
pub mod principal;
pub mod role;
pub mod userinfo;
pub mod verifier;

// Re-export main types at crate root
pub use auth::{AuthOutcome, AuthenticatedPrincipal, BEARER_PREFIX, BearerAuthenticator};
pub use claims::{ClaimSet, claims_from_value};
pub use error::{AuthenticationError, AuthorizationError, VerifierError};
pub use oidc::{KeycloakConfig, KeycloakConfigBuilder};
pub use principal::{Principal, build_principal, has_all_roles, has_any_role, has_role};
pub use role::RoleSet;
pub use userinfo::UserInfo;
pub use verifier::{Introspection, Verifier};
