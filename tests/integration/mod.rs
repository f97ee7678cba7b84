//! Integration tests for the people service.
//!
//! These drive the full router in-process with `tower::ServiceExt::oneshot`.
//! Run with: cargo test --test integration

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use futures::future::{BoxFuture, FutureExt};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use people_api::api::{create_router, AppState};
use people_api::config::Config;
use people_api::health::{Check, HealthChecks, Resolver};
use people_api::people::PeopleStore;

/// Router over a seeded store with probes disabled.
fn seeded_app() -> Router {
    create_router(AppState::new(PeopleStore::seeded()))
}

async fn call(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Resolver whose lookups never complete.
#[derive(Debug)]
struct Stalled;

impl Resolver for Stalled {
    fn lookup<'a>(&'a self, _host: &'a str) -> BoxFuture<'a, io::Result<Vec<SocketAddr>>> {
        futures::future::pending().boxed()
    }
}

fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// Created records can be read back with the path ID.
#[tokio::test]
async fn test_create_then_get() {
    let app = seeded_app();
    let body = json!({
        "id": "ignored",
        "firstname": "Ada",
        "lastname": "Lovelace",
        "address": {"city": "London", "state": "England"}
    });

    let (status, list) = call(&app, Method::POST, "/people/10", &body.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&list), vec!["1", "2", "3", "10"]);

    let (status, person) = call(&app, Method::GET, "/people/10", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        person,
        json!({
            "id": "10",
            "firstname": "Ada",
            "lastname": "Lovelace",
            "address": {"city": "London", "state": "England"}
        })
    );

    let (_, person) = call(&app, Method::GET, "/people/ignored", "").await;
    assert_eq!(person, json!({}));
}

/// A POST without a body stores a record carrying only the ID.
#[tokio::test]
async fn test_create_without_body() {
    let app = seeded_app();

    let (status, _) = call(&app, Method::POST, "/people/bare", "").await;
    assert_eq!(status, StatusCode::OK);

    let (_, person) = call(&app, Method::GET, "/people/bare", "").await;
    assert_eq!(person, json!({"id": "bare"}));
}

/// Explicit nulls read as absent fields instead of failing the request.
#[tokio::test]
async fn test_create_with_null_fields() {
    let app = seeded_app();
    let body = r#"{"firstname": "Ada", "lastname": null, "address": {"city": null, "state": "X"}}"#;

    let (status, _) = call(&app, Method::POST, "/people/20", body).await;
    assert_eq!(status, StatusCode::OK);

    let (_, person) = call(&app, Method::GET, "/people/20", "").await;
    assert_eq!(
        person,
        json!({"id": "20", "firstname": "Ada", "address": {"state": "X"}})
    );

    let (status, _) = call(&app, Method::POST, "/people/21", "null").await;
    assert_eq!(status, StatusCode::OK);

    let (_, person) = call(&app, Method::GET, "/people/21", "").await;
    assert_eq!(person, json!({"id": "21"}));
}

/// Capitalized keys are accepted alongside the canonical lowercase ones.
#[tokio::test]
async fn test_create_with_capitalized_keys() {
    let app = seeded_app();
    let body = json!({
        "FirstName": "Grace",
        "LastName": "Hopper",
        "Address": {"City": "Arlington", "State": "Virginia"}
    });

    let (status, _) = call(&app, Method::POST, "/people/30", &body.to_string()).await;
    assert_eq!(status, StatusCode::OK);

    let (_, person) = call(&app, Method::GET, "/people/30", "").await;
    assert_eq!(
        person,
        json!({
            "id": "30",
            "firstname": "Grace",
            "lastname": "Hopper",
            "address": {"city": "Arlington", "state": "Virginia"}
        })
    );
}

/// Deleted records read back as the empty person.
#[tokio::test]
async fn test_delete_then_get() {
    let app = seeded_app();

    let (status, list) = call(&app, Method::DELETE, "/people/1", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&list), vec!["2", "3"]);

    let (status, person) = call(&app, Method::GET, "/people/1", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(person, json!({}));
}

/// Deleting an unknown ID returns the unchanged list.
#[tokio::test]
async fn test_delete_missing_is_noop() {
    let app = seeded_app();
    let (_, before) = call(&app, Method::GET, "/people", "").await;

    let (status, after) = call(&app, Method::DELETE, "/people/nobody", "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(before, after);
}

/// Duplicate IDs are refused and the store is left as it was.
#[tokio::test]
async fn test_duplicate_create_conflicts() {
    let app = seeded_app();

    let (status, body) = call(
        &app,
        Method::POST,
        "/people/3",
        r#"{"firstname": "Other", "lastname": "Person"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");

    let (_, person) = call(&app, Method::GET, "/people/3", "").await;
    assert_eq!(person["firstname"], "Francesca");

    let (_, list) = call(&app, Method::GET, "/people", "").await;
    assert_eq!(ids(&list), vec!["1", "2", "3"]);
}

/// Malformed bodies are refused and nothing is stored.
#[tokio::test]
async fn test_malformed_body_rejected() {
    let app = seeded_app();

    let (status, body) = call(&app, Method::POST, "/people/9", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    let (_, person) = call(&app, Method::GET, "/people/9", "").await;
    assert_eq!(person, json!({}));
}

/// Default configuration serves seed data and both probes.
#[tokio::test]
async fn test_app_from_default_config() {
    let config = Config {
        health_dns_timeout_ms: 2_000,
        ..Config::default()
    };
    let app = create_router(AppState::from_config(&config, None));

    let (_, list) = call(&app, Method::GET, "/people", "").await;
    assert_eq!(ids(&list), vec!["1", "2", "3"]);

    let (status, _) = call(&app, Method::GET, "/live", "").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, Method::GET, "/ready?full=1", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"task-threshold": "OK", "upstream-dns": "OK"}));
}

/// Liveness fails once more tasks are alive than allowed.
#[tokio::test]
async fn test_liveness_fails_over_task_threshold() {
    let mut checks = HealthChecks::new();
    checks.add_liveness_check("task-threshold", Check::TaskThreshold { max: 2 });
    let app = create_router(AppState::new(PeopleStore::new()).with_health(checks));

    let parked: Vec<_> = (0..5)
        .map(|_| tokio::spawn(std::future::pending::<()>()))
        .collect();

    let (status, body) = call(&app, Method::GET, "/live", "").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["task-threshold"]
        .as_str()
        .unwrap()
        .starts_with("too many tasks alive"));

    for handle in &parked {
        handle.abort();
    }
    for handle in parked {
        let _ = handle.await;
    }

    let (status, _) = call(&app, Method::GET, "/live", "").await;
    assert_eq!(status, StatusCode::OK);
}

/// A lookup that outlives its deadline makes the service unready.
#[tokio::test]
async fn test_readiness_fails_on_dns_timeout() {
    let mut checks = HealthChecks::new();
    checks.add_readiness_check(
        "upstream-dns",
        Check::dns_with("upstream.test", Duration::from_millis(20), Arc::new(Stalled)),
    );
    let app = create_router(AppState::new(PeopleStore::new()).with_health(checks));

    let (status, body) = call(&app, Method::GET, "/ready", "").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body,
        json!({"upstream-dns": "lookup of upstream.test timed out after 20ms"})
    );

    let (status, body) = call(&app, Method::GET, "/live", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}
