//! Raw claim sets as returned by the identity provider.
//!
//! Keycloak answers introspection and userinfo requests with loosely typed
//! JSON. These helpers read individual claims with explicit type checks and
//! treat a wrong shape the same as a missing claim.

use serde_json::{Map, Value};

/// Mapping from claim name to arbitrary JSON value, exactly as returned by
/// the provider.
pub type ClaimSet = Map<String, Value>;

/// Standard claim names read by the claims model.
pub mod names {
    pub const SUBJECT: &str = "sub";
    pub const PREFERRED_USERNAME: &str = "preferred_username";
    pub const EMAIL: &str = "email";
    pub const EMAIL_VERIFIED: &str = "email_verified";
    pub const NAME: &str = "name";
    pub const GIVEN_NAME: &str = "given_name";
    pub const FAMILY_NAME: &str = "family_name";
    pub const REALM_ACCESS: &str = "realm_access";
    pub const RESOURCE_ACCESS: &str = "resource_access";
    pub const ROLES: &str = "roles";
}

/// Returns a string claim, or `None` if it is missing or not a string.
#[must_use]
pub fn string_claim<'a>(claims: &'a ClaimSet, name: &str) -> Option<&'a str> {
    claims.get(name).and_then(Value::as_str)
}

/// Returns a string claim only when it is present and non-empty.
#[must_use]
pub fn non_empty_string_claim<'a>(claims: &'a ClaimSet, name: &str) -> Option<&'a str> {
    string_claim(claims, name).filter(|s| !s.is_empty())
}

/// Returns a boolean claim, or `None` if it is missing or not a boolean.
#[must_use]
pub fn bool_claim(claims: &ClaimSet, name: &str) -> Option<bool> {
    claims.get(name).and_then(Value::as_bool)
}

/// Returns the string entries of `value["roles"]`.
///
/// Anything that is not an object holding an array yields nothing; non-string
/// array items are skipped.
pub(crate) fn role_names(value: &Value) -> impl Iterator<Item = &str> {
    value
        .as_object()
        .and_then(|obj| obj.get(names::ROLES))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

/// Interprets a JSON document as a claim set.
///
/// Returns `None` unless the document is a JSON object.
#[must_use]
pub fn claims_from_value(value: Value) -> Option<ClaimSet> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
