// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end lifecycle tests across engine, storage, sweeper and gateway.
//!
//! Each test creates an isolated TestHarness with a temp SQLite database and a
//! manual clock. Tests are independent and order-insensitive.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use vanish_core::{Clock, VanishError};
use vanish_cron::Sweeper;
use vanish_gateway::{build_router, AuthConfig, GatewayState};
use vanish_test_utils::TestHarness;

const CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::new(198, 51, 100, 7));

// ---- Lifecycle: create, read, expire, sweep ----

#[tokio::test]
async fn secret_lives_for_its_ttl_then_vanishes() {
    let harness = TestHarness::builder()
        .with_config(|c| c.cleanup.sweep_on_write = false)
        .build()
        .await
        .unwrap();

    let created = harness.service.create("hello", &CLIENT).await.unwrap();
    assert_eq!(created.expires_in, 86_400);

    // Readable any number of times before expiry.
    for _ in 0..3 {
        let got = harness.service.retrieve(&created.token).await.unwrap();
        assert_eq!(got.plaintext.as_str(), "hello");
    }

    harness.clock.advance(86_399);
    let got = harness.service.retrieve(&created.token).await.unwrap();
    assert_eq!(got.time_remaining, 1);

    // Expired but not yet swept: still unreadable.
    harness.clock.advance(2);
    assert!(matches!(
        harness.service.retrieve(&created.token).await,
        Err(VanishError::NotFound)
    ));
    assert_eq!(harness.service.statistics().await.unwrap().expired_secrets, 1);

    let sweeper = Sweeper::new(harness.service.clone(), Duration::from_secs(3600));
    let report = sweeper.run_once().await.unwrap();
    assert_eq!(report.secrets_deleted, 1);
    assert_eq!(sweeper.last_report(), Some(report));

    let stats = harness.service.statistics().await.unwrap();
    assert_eq!(stats.total_secrets, 0);
    assert_eq!(stats.last_cleanup_at, Some(harness.clock.now()));
}

#[tokio::test]
async fn write_path_sweep_removes_expired_neighbours() {
    let harness = TestHarness::builder().with_ttl_secs(10).build().await.unwrap();

    let old = harness.service.create("old", &CLIENT).await.unwrap();
    harness.clock.advance(11);
    let fresh = harness.service.create("fresh", &CLIENT).await.unwrap();

    let stats = harness.service.statistics().await.unwrap();
    assert_eq!(stats.total_secrets, 1);
    assert!(matches!(
        harness.service.retrieve(&old.token).await,
        Err(VanishError::NotFound)
    ));
    assert_eq!(
        harness.service.retrieve(&fresh.token).await.unwrap().plaintext.as_str(),
        "fresh"
    );
}

// ---- Rate limiting across a window boundary ----

#[tokio::test]
async fn rate_limit_window_resets() {
    let harness = TestHarness::builder()
        .with_config(|c| {
            c.rate_limit.max_requests = 2;
            c.rate_limit.window_secs = 60;
        })
        .build()
        .await
        .unwrap();

    harness.service.create("1", &CLIENT).await.unwrap();
    harness.service.create("2", &CLIENT).await.unwrap();
    match harness.service.create("3", &CLIENT).await {
        Err(VanishError::RateLimited { retry_after_secs }) => assert_eq!(retry_after_secs, 60),
        other => panic!("expected rate limit, got {other:?}"),
    }

    // Another client is unaffected.
    let other = IpAddr::V4(Ipv4Addr::new(198, 51, 100, 8));
    harness.service.create("x", &other).await.unwrap();

    harness.clock.advance(61);
    harness.service.create("4", &CLIENT).await.unwrap();
}

// ---- Full HTTP round trip ----

#[tokio::test]
async fn http_create_retrieve_expire() {
    let harness = TestHarness::builder().with_ttl_secs(300).build().await.unwrap();
    let app = build_router(GatewayState {
        service: Arc::clone(&harness.service),
        auth: AuthConfig::new(None),
        trust_proxy_headers: false,
        start_time: Instant::now(),
    });

    let request = Request::builder()
        .method(Method::POST)
        .uri("/create")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"secret":"launch codes"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value =
        serde_json::from_slice(&to_bytes(response.into_body(), 1 << 16).await.unwrap()).unwrap();
    let token = body["token"].as_str().unwrap().to_uppercase();

    // Tokens are accepted case-insensitively.
    let retrieve = |token: String| {
        Request::builder()
            .uri(format!("/retrieve/{token}"))
            .body(Body::empty())
            .unwrap()
    };
    let response = app.clone().oneshot(retrieve(token.clone())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value =
        serde_json::from_slice(&to_bytes(response.into_body(), 1 << 16).await.unwrap()).unwrap();
    assert_eq!(body["secret"], "launch codes");

    harness.clock.advance(301);
    let response = app.oneshot(retrieve(token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---- Persistence across restarts ----

#[tokio::test]
async fn secrets_survive_service_restart() {
    use vanish_core::StorageAdapter;
    use vanish_engine::{EngineSettings, SecretService};
    use vanish_ratelimit::IdentityHasher;
    use vanish_storage::SqliteStorage;

    let harness = TestHarness::builder().build().await.unwrap();
    let created = harness.service.create("durable", &CLIENT).await.unwrap();
    harness.service.shutdown().await.unwrap();

    let storage = Arc::new(SqliteStorage::new(harness.config.storage.clone()));
    storage.initialize().await.unwrap();
    let restarted = SecretService::new(
        storage,
        IdentityHasher::new(Some("another-salt")).unwrap(),
        harness.clock.clone(),
        EngineSettings::from_config(&harness.config),
    );
    let got = restarted.retrieve(&created.token).await.unwrap();
    assert_eq!(got.plaintext.as_str(), "durable");
}
