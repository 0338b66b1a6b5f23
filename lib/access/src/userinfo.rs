//! Userinfo summary returned alongside freshly issued tokens.

use crate::claims::{ClaimSet, bool_claim, names, string_claim};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The subset of userinfo claims exposed to clients after a code exchange.
///
/// Absent optional claims are omitted; `email_verified` defaults to false and
/// `resource_access` to an empty object. All other claims are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    /// Client roles keyed by client id. Entries that are not objects are dropped.
    #[serde(default)]
    pub resource_access: Map<String, Value>,
    #[serde(default)]
    pub sub: String,
}

impl UserInfo {
    /// Picks the exposed claims out of a userinfo claim set.
    #[must_use]
    pub fn from_claims(claims: &ClaimSet) -> Self {
        let owned = |name: &str| string_claim(claims, name).map(str::to_string);

        let resource_access = claims
            .get(names::RESOURCE_ACCESS)
            .and_then(Value::as_object)
            .map(|clients| {
                clients
                    .iter()
                    .filter(|(_, access)| access.is_object())
                    .map(|(client, access)| (client.clone(), access.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name: owned(names::NAME),
            given_name: owned(names::GIVEN_NAME),
            family_name: owned(names::FAMILY_NAME),
            preferred_username: owned(names::PREFERRED_USERNAME),
            email: owned(names::EMAIL),
            email_verified: bool_claim(claims, names::EMAIL_VERIFIED).unwrap_or(false),
            resource_access,
            sub: owned(names::SUBJECT).unwrap_or_default(),
        }
    }
}
