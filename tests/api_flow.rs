//! End-to-end flow through the router: register, pair up, record expenses,
//! calculate, confirm, and read back history.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use shared_expense_tracker::backend;
use shared_expense_tracker::config::Config;
use shared_expense_tracker::database::db::migrate;

async fn test_app() -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    migrate::run_migrations(&pool).await.expect("migrations");

    let config = Arc::new(Config {
        database_url: "sqlite::memory:".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        jwt_secret: "test-secret".to_string(),
    });
    backend::app(pool, config)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn register(app: &Router, email: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": email, "password": "password123", "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

async fn create_expense(app: &Router, token: &str, amount: i64, date: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/expenses",
        Some(token),
        Some(json!({
            "amount": amount,
            "category": "groceries",
            "description": null,
            "date": date,
            "split_user1": 50,
            "split_user2": 50
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create expense failed: {body}");
    body["expense_id"].as_i64().unwrap()
}

#[tokio::test]
async fn full_settlement_flow() {
    let app = test_app().await;

    let alice = register(&app, "alice@example.com", "Alice").await;
    let bob = register(&app, "bob@example.com", "Bob").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/couples",
        Some(&alice),
        Some(json!({ "partner_email": "bob@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Alice paid $30, Bob paid $10, both split 50/50.
    let e1 = create_expense(&app, &alice, 3000, "2026-08-05T00:00:00").await;
    let e2 = create_expense(&app, &bob, 1000, "2026-08-06T00:00:00").await;

    let (status, proposal) = send(
        &app,
        "POST",
        "/api/settlements/calculate",
        Some(&alice),
        Some(json!({
            "period_start": "2026-08-01T00:00:00",
            "period_end": "2026-08-31T00:00:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(proposal["expense_count"], 2);
    assert_eq!(proposal["total_amount"], 4000);
    assert_eq!(proposal["user1_paid_amount"], 3000);
    assert_eq!(proposal["user2_paid_amount"], 1000);
    assert_eq!(proposal["user1_owed_amount"], 2000);
    assert_eq!(proposal["user2_owed_amount"], 2000);
    // Bob owes Alice $10.
    assert_eq!(proposal["net_transfer_user1_to_user2"], -1000);

    let (status, settlement) = send(
        &app,
        "POST",
        "/api/settlements/confirm",
        Some(&alice),
        Some(json!({
            "period_start": "2026-08-01T00:00:00",
            "period_end": "2026-08-31T00:00:00",
            "expense_ids": [e1, e2],
            "details": proposal
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "confirm failed: {settlement}");
    let settlement_id = settlement["settlement_id"].as_i64().unwrap();

    // Consumed expenses no longer show up in a fresh calculation.
    let (_, replay) = send(
        &app,
        "POST",
        "/api/settlements/calculate",
        Some(&bob),
        Some(json!({
            "period_start": "2026-08-01T00:00:00",
            "period_end": "2026-08-31T00:00:00"
        })),
    )
    .await;
    assert_eq!(replay["expense_count"], 0);
    assert_eq!(replay["total_amount"], 0);

    let (status, listing) = send(&app, "GET", "/api/settlements", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["settlements"][0]["expense_count"], 2);

    let (status, fetched) = send(
        &app,
        "GET",
        &format!("/api/settlements/{settlement_id}"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["settlement_id"], settlement_id);

    // Settled expenses are frozen.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/expenses/{e1}"),
        Some(&alice),
        Some(json!({
            "amount": 1,
            "category": "groceries",
            "description": null,
            "date": "2026-08-05T00:00:00",
            "split_user1": 50,
            "split_user2": 50
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn validation_and_auth_failures() {
    let app = test_app().await;

    let alice = register(&app, "alice@example.com", "Alice").await;
    register(&app, "bob@example.com", "Bob").await;
    send(
        &app,
        "POST",
        "/api/couples",
        Some(&alice),
        Some(json!({ "partner_email": "bob@example.com" })),
    )
    .await;

    // No token.
    let (status, _) = send(&app, "GET", "/api/settlements", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Inverted period.
    let (status, _) = send(
        &app,
        "POST",
        "/api/settlements/calculate",
        Some(&alice),
        Some(json!({
            "period_start": "2026-08-31T00:00:00",
            "period_end": "2026-08-01T00:00:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Empty expense set.
    let (status, _) = send(
        &app,
        "POST",
        "/api/settlements/confirm",
        Some(&alice),
        Some(json!({
            "period_start": "2026-08-01T00:00:00",
            "period_end": "2026-08-31T00:00:00",
            "expense_ids": [],
            "details": {}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown settlement id.
    let (status, _) = send(&app, "GET", "/api/settlements/424242", Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Split percentages must sum to 100.
    let (status, _) = send(
        &app,
        "POST",
        "/api/expenses",
        Some(&alice),
        Some(json!({
            "amount": 100,
            "category": "misc",
            "description": null,
            "date": "2026-08-01T00:00:00",
            "split_user1": 70,
            "split_user2": 40
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_period_calculates_to_zero() {
    let app = test_app().await;

    let alice = register(&app, "alice@example.com", "Alice").await;
    register(&app, "bob@example.com", "Bob").await;
    send(
        &app,
        "POST",
        "/api/couples",
        Some(&alice),
        Some(json!({ "partner_email": "bob@example.com" })),
    )
    .await;

    let (status, proposal) = send(
        &app,
        "POST",
        "/api/settlements/calculate",
        Some(&alice),
        Some(json!({
            "period_start": "2026-01-01T00:00:00",
            "period_end": "2026-01-31T00:00:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(proposal["expense_count"], 0);
    assert_eq!(proposal["expense_ids"], json!([]));
}

#[tokio::test]
async fn pagination_falls_back_to_defaults() {
    let app = test_app().await;

    let alice = register(&app, "alice@example.com", "Alice").await;
    register(&app, "bob@example.com", "Bob").await;
    send(
        &app,
        "POST",
        "/api/couples",
        Some(&alice),
        Some(json!({ "partner_email": "bob@example.com" })),
    )
    .await;

    // page=0 and pageSize=1000 are out of range; both fall back rather
    // than erroring.
    let (status, listing) = send(
        &app,
        "GET",
        "/api/settlements?page=0&pageSize=1000",
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["total"], 0);
    assert_eq!(listing["settlements"], json!([]));
}
