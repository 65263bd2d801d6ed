//! End-to-end tests over a real listener.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use api_starter::config::validation::validate_config;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_health_check_over_http() {
    let upstream = common::unreachable_addr().await;
    let server = common::start_server(common::test_config(upstream)).await;

    let res = common::client()
        .get(server.url("/?anything=1"))
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"message": "API is Live!"}));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_demo_call_relays_upstream_status() {
    let calls = Arc::new(AtomicU32::new(0));
    let c = calls.clone();
    let upstream = common::start_programmable_backend(move || {
        let c = c.clone();
        async move {
            c.fetch_add(1, Ordering::SeqCst);
            (204, String::new())
        }
    })
    .await;
    let server = common::start_server(common::test_config(upstream)).await;

    let res = common::client().get(server.url("/api")).send().await.unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"message": "Demo API called (127.0.0.1)", "data": 204})
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_demo_call_does_not_retry_on_failure() {
    let calls = Arc::new(AtomicU32::new(0));
    let c = calls.clone();
    let upstream = common::start_programmable_backend(move || {
        let c = c.clone();
        async move {
            c.fetch_add(1, Ordering::SeqCst);
            (503, "Service Unavailable".into())
        }
    })
    .await;
    let server = common::start_server(common::test_config(upstream)).await;

    let res = common::client().get(server.url("/api")).send().await.unwrap();

    assert_eq!(res.status(), 500);
    let body = res.json::<Value>().await.unwrap();
    assert_eq!(body, json!({"error": "Failed to call external API"}));
    assert!(!body.to_string().contains("Service Unavailable"));
    assert_eq!(calls.load(Ordering::SeqCst), 1, "exactly one attempt");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_demo_call_unreachable_upstream() {
    let upstream = common::unreachable_addr().await;
    let server = common::start_server(common::test_config(upstream)).await;

    let res = common::client().get(server.url("/api")).send().await.unwrap();

    assert_eq!(res.status(), 500);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"error": "Failed to call external API"})
    );

    // The process keeps serving.
    let res = common::client().get(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_slow_upstream_answers_before_request_deadline() {
    let upstream = common::start_programmable_backend(|| async {
        tokio::time::sleep(Duration::from_secs(3)).await;
        (200, "late".into())
    })
    .await;
    let mut config = common::test_config(upstream);
    config.upstream.timeout_secs = 1;
    config.server.request_timeout_secs = 2;
    assert!(validate_config(&config).is_ok());

    let server = common::start_server(config).await;
    let res = common::client().get(server.url("/api")).send().await.unwrap();

    assert_eq!(res.status(), 500);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"error": "Failed to call external API"})
    );

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_unknown_routes_are_404() {
    let upstream = common::unreachable_addr().await;
    let server = common::start_server(common::test_config(upstream)).await;
    let client = common::client();

    for res in [
        client.get(server.url("/obviously/this/route/cant/exist")).send().await.unwrap(),
        client.post(server.url("/api")).send().await.unwrap(),
        client.patch(server.url("/events")).send().await.unwrap(),
    ] {
        assert_eq!(res.status(), 404);
        assert_eq!(
            res.json::<Value>().await.unwrap(),
            json!({"success": false, "message": "API route does not exist"})
        );
    }

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_body_is_client_error() {
    let upstream = common::unreachable_addr().await;
    let server = common::start_server(common::test_config(upstream)).await;

    let res = common::client()
        .post(server.url("/"))
        .header("content-type", "application/json")
        .body("{\"unterminated\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    let body = res.json::<Value>().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 400);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_docs_endpoint() {
    let upstream = common::unreachable_addr().await;
    let mut config = common::test_config(upstream);
    config.base_url = "http://api.example.test".into();
    let server = common::start_server(config).await;
    let client = common::client();

    let res = client.get(server.url("/docs")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let doc: Value = client
        .get(server.url("/docs/openapi.json"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(doc["info"]["title"], "API Starter");
    assert_eq!(doc["servers"][0]["url"], "http://api.example.test");
    for path in ["/", "/api", "/events"] {
        assert!(doc["paths"][path]["get"].is_object(), "no operation for {path}");
    }

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_graceful_shutdown() {
    let upstream = common::unreachable_addr().await;
    let server = common::start_server(common::test_config(upstream)).await;

    server.shutdown.trigger();

    let result = tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}
