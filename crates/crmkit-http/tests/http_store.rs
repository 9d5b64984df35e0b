//! Mock document service tests for the HTTP store.
//!
//! These tests use wiremock to simulate the document service and check the
//! wire protocol without network access.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crmkit_core::error::StoreError;
use crmkit_core::{
    ApiKey, CollectionName, Collections, Error, FetchConstraints, Fields, ListOptions, RecordId,
    RemoteStore, RepositoryFactory, StoreUrl,
};
use crmkit_http::HttpStore;

/// Helper to create a store URL from a mock server.
fn mock_store_url(server: &MockServer) -> StoreUrl {
    StoreUrl::new(format!("http://127.0.0.1:{}", server.address().port())).unwrap()
}

fn store(server: &MockServer) -> HttpStore {
    HttpStore::new(mock_store_url(server), Some(ApiKey::new("test-key"))).unwrap()
}

fn customers() -> CollectionName {
    CollectionName::new("customers").unwrap()
}

fn fields(value: serde_json::Value) -> Fields {
    value.as_object().cloned().unwrap()
}

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
async fn test_fetch_many_sends_limit_and_start_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/collections/customers/documents"))
        .and(query_param("limit", "2"))
        .and(query_param("startAfter", "a1"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [
                {"id": "b2", "fields": {"name": "Jane"}},
                {"id": "c3", "fields": {"name": "John"}}
            ]
        })))
        .mount(&server)
        .await;

    let constraints = FetchConstraints::new(2).start_after(RecordId::new("a1").unwrap());
    let docs = store(&server)
        .fetch_many(&customers(), &constraints)
        .await
        .unwrap();

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].id.as_str(), "b2");
    assert_eq!(docs[1].fields["name"], json!("John"));
}

#[tokio::test]
async fn test_fetch_many_first_page_omits_start_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/collections/customers/documents"))
        .and(query_param("limit", "100"))
        .and(query_param_is_missing("startAfter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"documents": []})))
        .mount(&server)
        .await;

    let docs = store(&server)
        .fetch_many(&customers(), &FetchConstraints::new(100))
        .await
        .unwrap();
    assert!(docs.is_empty());
}

#[tokio::test]
async fn test_fetch_one_found_and_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/collections/customers/documents/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abc",
            "fields": {"name": "Jane", "email": "jane@x.com"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/collections/customers/documents/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "NotFound",
            "message": "no such document"
        })))
        .mount(&server)
        .await;

    let store = store(&server);

    let doc = store
        .fetch_one(&customers(), &RecordId::new("abc").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc.fields["email"], json!("jane@x.com"));

    let missing = store
        .fetch_one(&customers(), &RecordId::new("missing").unwrap())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_invalid_id_from_server_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/collections/customers/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{"id": "has spaces", "fields": {}}]
        })))
        .mount(&server)
        .await;

    let err = store(&server)
        .fetch_many(&customers(), &FetchConstraints::new(10))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Store(StoreError::Malformed { .. })));
}

// ============================================================================
// Writes
// ============================================================================

#[tokio::test]
async fn test_insert_posts_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/collections/customers/documents"))
        .and(body_json(json!({"fields": {"name": "Jane", "email": "jane@x.com"}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "new-id"})))
        .expect(1)
        .mount(&server)
        .await;

    let id = store(&server)
        .insert(
            &customers(),
            &fields(json!({"name": "Jane", "email": "jane@x.com"})),
        )
        .await
        .unwrap();
    assert_eq!(id.as_str(), "new-id");
}

#[tokio::test]
async fn test_patch_missing_document_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v1/collections/customers/documents/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = store(&server)
        .patch(
            &customers(),
            &RecordId::new("ghost").unwrap(),
            &fields(json!({"name": "X"})),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Store(StoreError::NotFound { .. })));
}

#[tokio::test]
async fn test_patch_sends_only_changed_fields() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v1/collections/customers/documents/abc"))
        .and(body_json(json!({"fields": {"email": "jane@new.com"}})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    store(&server)
        .patch(
            &customers(),
            &RecordId::new("abc").unwrap(),
            &fields(json!({"email": "jane@new.com"})),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_remove_treats_404_as_success() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/collections/customers/documents/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    store(&server)
        .remove(&customers(), &RecordId::new("gone").unwrap())
        .await
        .unwrap();
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_permission_denied_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/collections/customers/documents"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": "PermissionDenied",
            "message": "missing or insufficient permissions"
        })))
        .mount(&server)
        .await;

    let err = store(&server)
        .fetch_many(&customers(), &FetchConstraints::new(10))
        .await
        .unwrap_err();

    match err {
        Error::Store(store_err) => {
            assert!(store_err.is_permission_denied());
            assert!(store_err.to_string().contains("403"));
        }
        other => panic!("expected store error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_error_without_body_keeps_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/collections/customers/documents"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = store(&server)
        .insert(&customers(), &fields(json!({"name": "Jane"})))
        .await
        .unwrap_err();

    match err {
        Error::Store(StoreError::Rejected(rejected)) => {
            assert_eq!(rejected.status, 503);
            assert!(rejected.code.is_none());
        }
        other => panic!("expected rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/collections/customers/documents/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "slow", "fields": {}}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let store = HttpStore::with_timeout(mock_store_url(&server), None, Duration::from_millis(100))
        .unwrap();
    let err = store
        .fetch_one(&customers(), &RecordId::new("slow").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Store(StoreError::Timeout)));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Reserve a free port, then release it so nothing is listening.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = StoreUrl::new(format!("http://127.0.0.1:{}", port)).unwrap();

    let store = HttpStore::new(url, None).unwrap();
    let err = store
        .fetch_many(&customers(), &FetchConstraints::new(1))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Store(StoreError::Transport { .. })));
}

// ============================================================================
// Through the repository layer
// ============================================================================

#[tokio::test]
async fn test_invalid_customer_never_hits_the_wire() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "x"})))
        .expect(0)
        .mount(&server)
        .await;

    let factory = RepositoryFactory::new(Arc::new(store(&server)));
    let collections = Collections::new(&factory).unwrap();

    let err = collections
        .customers
        .create(&fields(json!({"name": "John Doe", "email": "invalid-email"})))
        .await
        .unwrap_err();
    assert_eq!(err.as_validation().unwrap().field, "email");
}

#[tokio::test]
async fn test_repository_cursor_threads_start_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/collections/projects/documents"))
        .and(query_param_is_missing("startAfter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [
                {"id": "p1", "fields": {"title": "Kitchen"}},
                {"id": "p2", "fields": {"title": "Bath"}}
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/collections/projects/documents"))
        .and(query_param("startAfter", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{"id": "p3", "fields": {"title": "Deck"}}]
        })))
        .mount(&server)
        .await;

    let factory = RepositoryFactory::new(Arc::new(store(&server)));
    let collections = Collections::new(&factory).unwrap();

    let first = collections
        .projects
        .get_all(ListOptions::new().limit(2))
        .await
        .unwrap();
    assert_eq!(first.len(), 2);

    let second = collections
        .projects
        .get_all(ListOptions::new().limit(2).after(first.cursor))
        .await
        .unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second.items[0].id.as_str(), "p3");
    assert!(second.cursor.is_none());
}
