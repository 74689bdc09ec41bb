//! Integration tests for the authenticated Atrium client

mod common;

use atrium_client::{AppContext, ClientError};
use atrium_core::{CredentialStore, MemoryCredentialStore};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn profile_body() -> serde_json::Value {
    json!({
        "data": {
            "uuid": "0a8c9f66-1f2b-4f3a-9a3d-2f9d9a4c1b70",
            "email": "admin@example.com",
            "firstName": "Ada"
        }
    })
}

#[tokio::test]
async fn attaches_bearer_token_from_store() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryCredentialStore::new());
    store.store_pair("T1", "R1");

    Mock::given(method("GET"))
        .and(path("/api/v1/users/profile"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = common::context(&server.uri(), store);
    let client = ctx.authenticated().await.unwrap();

    let user = client.profile().await.unwrap();
    assert_eq!(user.email.as_deref(), Some("admin@example.com"));
    assert_eq!(user.first_name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn sends_unauthenticated_when_no_token_is_stored() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryCredentialStore::new());

    Mock::given(method("GET"))
        .and(path("/api/v1/users/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = common::context(&server.uri(), store);
    let client = ctx.authenticated().await.unwrap();
    client.profile().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn client_construction_is_shared_and_memoized() {
    let server = MockServer::start().await;
    let (source, loads) = common::CountingSource::new(common::test_config(&server.uri()));
    let ctx = AppContext::builder().config_source(source).build();

    let (a, b) = tokio::join!(ctx.authenticated(), ctx.authenticated());
    let a = a.unwrap();
    let b = b.unwrap();
    let c = ctx.authenticated().await.unwrap();

    assert!(a.same_instance(&b));
    assert!(a.same_instance(&c));
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn non_auth_errors_pass_through_without_retry() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryCredentialStore::new());
    store.store_pair("T1", "R1");

    Mock::given(method("GET"))
        .and(path("/api/v1/company"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = common::context(&server.uri(), Arc::clone(&store));
    let client = ctx.authenticated().await.unwrap();

    let result = client.company().await;
    assert!(matches!(
        result,
        Err(ClientError::ServerError { status: 500, .. })
    ));

    // No refresh, no store mutation
    let pair = store.token_pair();
    assert_eq!(pair.token.as_deref(), Some("T1"));
    assert_eq!(pair.refresh_token.as_deref(), Some("R1"));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn filtered_listing_sends_page_and_search() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryCredentialStore::new());
    store.store_pair("T1", "R1");

    Mock::given(method("PATCH"))
        .and(path("/api/v1/users"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"uuid": "0a8c9f66-1f2b-4f3a-9a3d-2f9d9a4c1b70", "email": "ada@example.com"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = common::context(&server.uri(), store);
    let client = ctx.authenticated().await.unwrap();

    let users = client
        .list_users(atrium_client::types::Page::new(2, 25), Some("ada"))
        .await
        .unwrap();
    assert_eq!(users.len(), 1);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({"search": "ada"}));
}
