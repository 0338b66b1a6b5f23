//! Keycloak client tests against a wiremock realm.

use keycloak_gate_access::{AuthOutcome, BearerAuthenticator, KeycloakConfig, Verifier};
use keycloak_gate_server::auth::{KeycloakClient, ProviderError, TokenTypeHint};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INTROSPECT: &str = "/realms/test/protocol/openid-connect/token/introspect";
const USERINFO: &str = "/realms/test/protocol/openid-connect/userinfo";
const TOKEN: &str = "/realms/test/protocol/openid-connect/token";
const REVOKE: &str = "/realms/test/protocol/openid-connect/revoke";
const LOGOUT: &str = "/realms/test/protocol/openid-connect/logout";

fn client_for(server: &MockServer) -> KeycloakClient {
    let config = KeycloakConfig::builder(
        server.uri(),
        "test".to_string(),
        "gate".to_string(),
        "secret".to_string(),
    )
    .timeout_seconds(1)
    .build();
    KeycloakClient::new(config).expect("client")
}

fn token_response() -> serde_json::Value {
    json!({
        "access_token": "new-access",
        "refresh_token": "new-refresh",
        "id_token": "id",
        "scope": "openid profile email",
        "token_type": "Bearer",
        "expires_in": 300,
        "refresh_expires_in": 1800,
        "session_state": "sess-1",
        "not-before-policy": 0
    })
}

#[tokio::test]
async fn introspect_sends_client_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INTROSPECT))
        .and(body_string_contains("token=abc"))
        .and(body_string_contains("client_id=gate"))
        .and(body_string_contains("client_secret=secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"active": true})))
        .expect(1)
        .mount(&server)
        .await;

    let introspection = client_for(&server)
        .introspect_token("abc")
        .await
        .expect("introspect");

    assert!(introspection.active);
}

#[tokio::test]
async fn userinfo_uses_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(USERINFO))
        .and(header("authorization", "Bearer abc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"sub": "u1", "email": "a@b.c"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let claims = client_for(&server).userinfo("abc").await.expect("userinfo");

    assert_eq!(claims.get("sub"), Some(&json!("u1")));
}

#[tokio::test]
async fn userinfo_rejects_non_object_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(USERINFO))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["sub"])))
        .mount(&server)
        .await;

    let err = client_for(&server).userinfo("abc").await.expect_err("not an object");

    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}

#[tokio::test]
async fn exchange_code_forwards_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=the-code"))
        .and(body_string_contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fcb",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = client_for(&server)
        .exchange_code("the-code", "http://localhost:3000/cb")
        .await
        .expect("tokens");

    assert_eq!(tokens.access_token, "new-access");
    assert_eq!(tokens.refresh_token.as_deref(), Some("new-refresh"));
    assert_eq!(tokens.refresh_expires_in, Some(1800));
    assert_eq!(tokens.session_state.as_deref(), Some("sess-1"));
}

#[tokio::test]
async fn token_errors_carry_keycloak_description() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Token is not active"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .refresh("stale")
        .await
        .expect_err("refused");

    assert_eq!(
        err,
        ProviderError::Rejected {
            status: 400,
            description: "Token is not active".to_string()
        }
    );
}

#[tokio::test]
async fn error_without_description_falls_back_to_error_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(REVOKE))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_token"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .revoke("t", TokenTypeHint::AccessToken)
        .await
        .expect_err("refused");

    assert!(matches!(
        err,
        ProviderError::Rejected { ref description, .. } if description == "invalid_token"
    ));
}

#[tokio::test]
async fn revoke_and_logout_succeed_on_2xx() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(REVOKE))
        .and(body_string_contains("token_type_hint=refresh_token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(LOGOUT))
        .and(body_string_contains("refresh_token=r1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .revoke("r1", TokenTypeHint::RefreshToken)
        .await
        .expect("revoke");
    client.logout("r1").await.expect("logout");
}

#[tokio::test]
async fn slow_provider_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INTROSPECT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"active": true}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .introspect_token("abc")
        .await
        .expect_err("timeout");

    assert_eq!(err, ProviderError::Timeout);
}

#[tokio::test]
async fn authenticator_accepts_active_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INTROSPECT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"active": true})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(USERINFO))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sub": "u1",
            "preferred_username": "alice",
            "realm_access": {"roles": ["user"]}
        })))
        .mount(&server)
        .await;

    let auth = BearerAuthenticator::new(client_for(&server));
    let outcome = auth.authenticate(Some("Bearer abc")).await;

    let principal = outcome.principal().expect("authenticated");
    assert_eq!(principal.username(), "alice");
    assert_eq!(principal.roles().as_slice(), &["user"]);
}

#[tokio::test]
async fn authenticator_rejects_inactive_token_without_userinfo() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INTROSPECT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"active": false})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(USERINFO))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sub": "u1"})))
        .expect(0)
        .mount(&server)
        .await;

    let auth = BearerAuthenticator::new(client_for(&server));

    assert_eq!(auth.authenticate(Some("Bearer abc")).await, AuthOutcome::Rejected);
}

#[tokio::test]
async fn verifier_reports_provider_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INTROSPECT))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client_for(&server);

    assert!(client.introspect("abc").await.is_err());
    let auth = BearerAuthenticator::new(client);
    assert_eq!(auth.authenticate(Some("Bearer abc")).await, AuthOutcome::Rejected);
}
