//! Integration tests for login and startup access resolution

mod common;

use atrium_client::AccessDecision;
use atrium_core::{CredentialStore, MemoryCredentialStore, TokenPair};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn profile_body() -> serde_json::Value {
    json!({
        "data": {
            "uuid": "0a8c9f66-1f2b-4f3a-9a3d-2f9d9a4c1b70",
            "email": "admin@example.com"
        }
    })
}

#[tokio::test]
async fn login_persists_token_pair_and_logout_clears_it() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryCredentialStore::new());

    Mock::given(method("POST"))
        .and(path("/api/v1/users/login"))
        .and(body_json(json!({
            "email": "ada@example.com",
            "password": "hunter2"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"token": "T1", "refreshToken": "R1"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ctx = common::context(&server.uri(), Arc::clone(&store));

    let pair = ctx.login("ada@example.com", "hunter2").await.unwrap();
    assert_eq!(pair.token, "T1");
    assert_eq!(store.get(atrium_core::ACCESS_TOKEN_KEY).as_deref(), Some("T1"));
    assert_eq!(
        store.get(atrium_core::REFRESH_TOKEN_KEY).as_deref(),
        Some("R1")
    );

    ctx.logout();
    assert_eq!(store.token_pair(), TokenPair::default());
}

#[tokio::test]
async fn missing_token_resolves_unauthenticated() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryCredentialStore::new());
    let ctx = common::context(&server.uri(), store);

    let decision = ctx.resolve_access().await.unwrap();
    match decision {
        AccessDecision::Unauthenticated { auth_web_url } => {
            assert_eq!(auth_web_url, common::AUTH_WEB_URL);
        }
        other => panic!("expected Unauthenticated, got {other:?}"),
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn matching_service_grant_resolves_granted() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryCredentialStore::new());
    store.store_pair("T1", "R1");

    Mock::given(method("GET"))
        .and(path("/api/v1/users/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/permissions/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"uuid": common::SERVICE_ID, "name": "Atrium Admin"},
                {"uuid": "11111111-2222-3333-4444-555555555555", "name": "Other Service"}
            ]
        })))
        .mount(&server)
        .await;

    let ctx = common::context(&server.uri(), store);
    let decision = ctx.resolve_access().await.unwrap();
    match decision {
        AccessDecision::Granted { user } => {
            assert_eq!(user.email.as_deref(), Some("admin@example.com"));
        }
        other => panic!("expected Granted, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_grant_resolves_denied() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryCredentialStore::new());
    store.store_pair("T1", "R1");

    Mock::given(method("GET"))
        .and(path("/api/v1/users/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/permissions/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let ctx = common::context(&server.uri(), store);
    assert!(matches!(
        ctx.resolve_access().await.unwrap(),
        AccessDecision::Denied { .. }
    ));
}

#[tokio::test]
async fn permission_lookup_failure_degrades_to_denied() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryCredentialStore::new());
    store.store_pair("T1", "R1");

    Mock::given(method("GET"))
        .and(path("/api/v1/users/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/permissions/user"))
        .respond_with(ResponseTemplate::new(500).set_body_string("permission service down"))
        .mount(&server)
        .await;

    let ctx = common::context(&server.uri(), store);
    assert!(matches!(
        ctx.resolve_access().await.unwrap(),
        AccessDecision::Denied { .. }
    ));
}
