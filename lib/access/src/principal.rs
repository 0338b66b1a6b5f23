//! The authenticated principal produced for a verified request.
//!
//! A [`Principal`] is built once per request from the provider's claim set
//! and discarded when the request completes. Construction is total: missing
//! or wrong-shaped claims yield absent or default values.

use crate::claims::{ClaimSet, bool_claim, names, non_empty_string_claim, string_claim};
use crate::role::RoleSet;
use serde::Serialize;

/// Identity and role memberships of an authenticated caller.
///
/// Serializes to the shape downstream handlers expose as "current user":
/// `username`, `name`, `given_name`, `family_name`, `preferred_username`,
/// `email`, `email_verified`, `sub`, `claims`, `roles`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Principal {
    username: String,
    name: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    preferred_username: Option<String>,
    email: Option<String>,
    email_verified: bool,
    #[serde(rename = "sub")]
    subject: String,
    #[serde(rename = "claims")]
    raw_claims: ClaimSet,
    roles: RoleSet,
}

impl Principal {
    /// Builds a principal from a claim set.
    ///
    /// The username is the first non-empty of `preferred_username`, `email`
    /// and `sub`; it is empty when none of them is usable.
    #[must_use]
    pub fn from_claims(claims: &ClaimSet) -> Self {
        let owned = |name: &str| string_claim(claims, name).map(str::to_string);

        let username = [names::PREFERRED_USERNAME, names::EMAIL, names::SUBJECT]
            .into_iter()
            .find_map(|name| non_empty_string_claim(claims, name))
            .unwrap_or_default()
            .to_string();

        Self {
            username,
            name: owned(names::NAME),
            given_name: owned(names::GIVEN_NAME),
            family_name: owned(names::FAMILY_NAME),
            preferred_username: owned(names::PREFERRED_USERNAME),
            email: owned(names::EMAIL),
            email_verified: bool_claim(claims, names::EMAIL_VERIFIED).unwrap_or(false),
            subject: owned(names::SUBJECT).unwrap_or_default(),
            raw_claims: claims.clone(),
            roles: RoleSet::from_claims(claims),
        }
    }

    /// Returns the `sub` claim, empty if the provider omitted it.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns false when none of `preferred_username`, `email` or `sub`
    /// produced a username.
    #[must_use]
    pub fn has_resolvable_username(&self) -> bool {
        !self.username.is_empty()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn given_name(&self) -> Option<&str> {
        self.given_name.as_deref()
    }

    #[must_use]
    pub fn family_name(&self) -> Option<&str> {
        self.family_name.as_deref()
    }

    #[must_use]
    pub fn preferred_username(&self) -> Option<&str> {
        self.preferred_username.as_deref()
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    #[must_use]
    pub fn email_verified(&self) -> bool {
        self.email_verified
    }

    /// Human-readable name: given and family name when both are present,
    /// otherwise the `name` claim, otherwise the username.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (self.given_name(), self.family_name(), self.name()) {
            (Some(given), Some(family), _) => format!("{given} {family}"),
            (_, _, Some(name)) if !name.is_empty() => name.to_string(),
            _ => self.username.clone(),
        }
    }

    /// Returns the roles in sorted order.
    #[must_use]
    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    /// Returns the claim set the principal was built from.
    #[must_use]
    pub fn raw_claims(&self) -> &ClaimSet {
        &self.raw_claims
    }

    /// Returns true if the principal holds exactly `role`.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Returns true if at least one of `roles` is held. False for no roles.
    pub fn has_any_role<I, S>(&self, roles: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        roles.into_iter().any(|r| self.has_role(r.as_ref()))
    }

    /// Returns true if every one of `roles` is held. True for no roles.
    pub fn has_all_roles<I, S>(&self, roles: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        roles.into_iter().all(|r| self.has_role(r.as_ref()))
    }
}

/// Builds a principal from a claim set. See [`Principal::from_claims`].
#[must_use]
pub fn build_principal(claims: &ClaimSet) -> Principal {
    Principal::from_claims(claims)
}

#[must_use]
pub fn has_role(principal: &Principal, role: &str) -> bool {
    principal.has_role(role)
}

pub fn has_any_role<I, S>(principal: &Principal, roles: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    principal.has_any_role(roles)
}

pub fn has_all_roles<I, S>(principal: &Principal, roles: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    principal.has_all_roles(roles)
}
