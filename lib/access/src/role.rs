//! Role memberships derived from Keycloak claims.
//!
//! Keycloak reports roles in two independent namespaces:
//! - realm roles under `realm_access.roles`
//! - client roles under `resource_access.<client>.roles`
//!
//! Both are flattened into one [`RoleSet`]. Client roles are namespaced as
//! `<client>:<role>` so a client role never collides with a realm role of the
//! same bare name.

use crate::claims::{ClaimSet, names, role_names};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// De-duplicated role names in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RoleSet {
    roles: Vec<String>,
}

impl RoleSet {
    /// Creates a role set from arbitrary role names.
    ///
    /// Duplicates are dropped and the result is sorted.
    #[must_use]
    pub fn from_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = roles.into_iter().map(Into::into).collect();
        Self {
            roles: set.into_iter().collect(),
        }
    }

    /// Extracts realm and client roles from a claim set.
    ///
    /// Never fails: missing or wrong-shaped role claims contribute nothing.
    #[must_use]
    pub fn from_claims(claims: &ClaimSet) -> Self {
        let mut set = BTreeSet::new();

        if let Some(realm_access) = claims.get(names::REALM_ACCESS) {
            set.extend(role_names(realm_access).map(str::to_string));
        }

        if let Some(resource_access) = claims
            .get(names::RESOURCE_ACCESS)
            .and_then(|v| v.as_object())
        {
            for (client, access) in resource_access {
                set.extend(role_names(access).map(|role| format!("{client}:{role}")));
            }
        }

        Self {
            roles: set.into_iter().collect(),
        }
    }

    /// Returns true if `role` is an exact member.
    #[must_use]
    pub fn contains(&self, role: &str) -> bool {
        self.roles
            .binary_search_by(|r| r.as_str().cmp(role))
            .is_ok()
    }

    /// Returns the roles in sorted order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.roles
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

/// Comma-separated roles, e.g. `billing:viewer,user`.
impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, role) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(role)?;
        }
        Ok(())
    }
}

impl From<Vec<String>> for RoleSet {
    fn from(roles: Vec<String>) -> Self {
        Self::from_roles(roles)
    }
}

impl From<RoleSet> for Vec<String> {
    fn from(set: RoleSet) -> Self {
        set.roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: serde_json::Value) -> ClaimSet {
        crate::claims::claims_from_value(value).expect("object")
    }

    #[test]
    fn no_role_claims_yields_empty_set() {
        let roles = RoleSet::from_claims(&claims(json!({"sub": "u1"})));
        assert!(roles.is_empty());
        assert_eq!(roles.as_slice(), &[] as &[String]);
    }

    #[test]
    fn realm_and_client_roles_are_merged_and_sorted() {
        let roles = RoleSet::from_claims(&claims(json!({
            "realm_access": {"roles": ["b", "a"]},
            "resource_access": {"svc": {"roles": ["x"]}}
        })));
        assert_eq!(roles.as_slice(), &["a", "b", "svc:x"]);
    }

    #[test]
    fn client_roles_are_namespaced() {
        let roles = RoleSet::from_claims(&claims(json!({
            "realm_access": {"roles": ["admin"]},
            "resource_access": {
                "billing": {"roles": ["admin", "viewer"]},
                "account": {"roles": ["manage-account"]}
            }
        })));
        assert_eq!(
            roles.as_slice(),
            &[
                "account:manage-account",
                "admin",
                "billing:admin",
                "billing:viewer"
            ]
        );
    }

    #[test]
    fn duplicates_are_removed() {
        let roles = RoleSet::from_claims(&claims(json!({
            "realm_access": {"roles": ["user", "user", "admin"]}
        })));
        assert_eq!(roles.as_slice(), &["admin", "user"]);
    }

    #[test]
    fn malformed_role_claims_are_skipped() {
        let roles = RoleSet::from_claims(&claims(json!({
            "realm_access": ["not", "an", "object"],
            "resource_access": {
                "broken": "nope",
                "also-broken": {"roles": "reader"},
                "ok": {"roles": ["reader", 7, null]}
            }
        })));
        assert_eq!(roles.as_slice(), &["ok:reader"]);
    }

    #[test]
    fn non_object_resource_access_is_ignored() {
        let roles = RoleSet::from_claims(&claims(json!({
            "realm_access": {"roles": ["user"]},
            "resource_access": ["svc"]
        })));
        assert_eq!(roles.as_slice(), &["user"]);
    }

    #[test]
    fn input_order_does_not_matter() {
        let a = RoleSet::from_claims(&claims(json!({
            "realm_access": {"roles": ["z", "a", "m"]}
        })));
        let b = RoleSet::from_claims(&claims(json!({
            "realm_access": {"roles": ["m", "z", "a"]}
        })));
        assert_eq!(a, b);
    }

    #[test]
    fn contains_is_exact() {
        let roles = RoleSet::from_roles(["admin", "svc:reader"]);
        assert!(roles.contains("admin"));
        assert!(roles.contains("svc:reader"));
        assert!(!roles.contains("reader"));
        assert!(!roles.contains("Admin"));
    }

    #[test]
    fn deserializing_restores_invariants() {
        let roles: RoleSet = serde_json::from_str(r#"["b","a","b"]"#).expect("deserialize");
        assert_eq!(roles.as_slice(), &["a", "b"]);
        assert_eq!(serde_json::to_string(&roles).expect("serialize"), r#"["a","b"]"#);
    }
    #[test]
    fn displays_sorted_comma_list() {
        let roles = RoleSet::from_roles(["user", "billing:viewer"]);
        assert_eq!(roles.to_string(), "billing:viewer,user");
        assert_eq!(roles.iter().count(), 2);
        assert_eq!(RoleSet::default().to_string(), "");
    }
}
