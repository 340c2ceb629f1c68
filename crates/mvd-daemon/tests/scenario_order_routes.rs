//! In-process scenario tests for the read endpoints, the status-update
//! endpoint, health, and routing/auth edges.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Duration;
use http_body_util::BodyExt;
use mvd_daemon::{auth, routes, state::AppState};
use mvd_orders::{OrderStore, PaymentGateway, ProductLookup};
use mvd_testkit::{product, FixedGateway, MemoryOrderStore, StaticCatalog};
use tower::ServiceExt; // oneshot
use uuid::Uuid;

const SECRET: &str = "scenario-secret";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Harness {
    state: Arc<AppState>,
}

fn make_harness() -> Harness {
    let state = Arc::new(AppState::new(
        Arc::new(MemoryOrderStore::new()) as Arc<dyn OrderStore>,
        Arc::new(StaticCatalog::new(vec![product("p1", 10, 50)])) as Arc<dyn ProductLookup>,
        Arc::new(FixedGateway::approving()) as Arc<dyn PaymentGateway>,
        SECRET,
    ));
    Harness { state }
}

fn router(h: &Harness) -> axum::Router {
    routes::build_router(Arc::clone(&h.state))
}

fn bearer(user: &str) -> String {
    format!("Bearer {}", auth::mint_token(SECRET, user, Duration::hours(1)))
}

fn authed(method: &str, uri: &str, user: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", bearer(user))
        .body(Body::empty())
        .unwrap()
}

fn authed_json(method: &str, uri: &str, user: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", bearer(user))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn call(router: axum::Router, req: Request<Body>) -> (StatusCode, bytes::Bytes) {
    let resp = router.oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let body = resp
        .into_body()
        .collect()
        .await
        .expect("body collect failed")
        .to_bytes();
    (status, body)
}

fn parse_json(b: bytes::Bytes) -> serde_json::Value {
    serde_json::from_slice(&b).expect("body is not valid JSON")
}

async fn create_order(h: &Harness, user: &str, quantity: i64) -> String {
    let body = serde_json::json!({
        "items": [{"productId": "p1", "quantity": quantity}],
        "shippingAddress": {
            "street": "1 Main St",
            "city": "Springfield",
            "state": "IL",
            "zipCode": "62701",
            "country": "US"
        }
    });
    let (status, resp) = call(router(h), authed_json("POST", "/orders", user, &body)).await;
    assert_eq!(status, StatusCode::CREATED);
    parse_json(resp)["order"]["id"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_ok_without_auth() {
    let h = make_harness();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, resp) = call(router(&h), req).await;

    assert_eq!(status, StatusCode::OK);
    let json = parse_json(resp);
    assert_eq!(json["status"], "OK");
    assert_eq!(json["service"], "mvd-daemon");
    assert!(json["timestamp"].is_string());
}

// ---------------------------------------------------------------------------
// GET /orders — customer-scoped, newest first
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_is_customer_scoped_and_newest_first() {
    let h = make_harness();

    let first = create_order(&h, "u1", 1).await;
    tokio::time::sleep(StdDuration::from_millis(5)).await;
    let second = create_order(&h, "u1", 2).await;
    create_order(&h, "u2", 3).await;

    let (status, resp) = call(router(&h), authed("GET", "/orders", "u1")).await;
    assert_eq!(status, StatusCode::OK);

    let json = parse_json(resp);
    let orders = json.as_array().expect("list body is a bare array");
    assert_eq!(orders.len(), 2, "only u1's orders");
    assert_eq!(orders[0]["id"], second.as_str(), "newest first");
    assert_eq!(orders[1]["id"], first.as_str());
}

#[tokio::test]
async fn list_is_empty_for_customer_with_no_orders() {
    let h = make_harness();
    create_order(&h, "u1", 1).await;

    let (status, resp) = call(router(&h), authed("GET", "/orders", "u9")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse_json(resp), serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// GET /orders/:id
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_order_enforces_ownership() {
    let h = make_harness();
    let id = create_order(&h, "u1", 1).await;

    let (status, _) = call(router(&h), authed("GET", &format!("/orders/{id}"), "u1")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, resp) = call(router(&h), authed("GET", &format!("/orders/{id}"), "u2")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(parse_json(resp)["message"], "Access denied");
}

#[tokio::test]
async fn get_unknown_or_malformed_id_is_404() {
    let h = make_harness();

    let missing = Uuid::new_v4();
    let (status, resp) =
        call(router(&h), authed("GET", &format!("/orders/{missing}"), "u1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse_json(resp)["message"], "Order not found");

    // A non-uuid path segment cannot name an order either.
    let (status, resp) = call(router(&h), authed("GET", "/orders/not-a-uuid", "u1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse_json(resp)["message"], "Order not found");
}

// ---------------------------------------------------------------------------
// PUT /orders/:id/status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_update_accepts_any_known_status() {
    let h = make_harness();
    let id = create_order(&h, "u1", 1).await;

    let body = serde_json::json!({"status": "shipped"});
    let (status, resp) =
        call(router(&h), authed_json("PUT", &format!("/orders/{id}/status"), "u1", &body)).await;

    assert_eq!(status, StatusCode::OK);
    let json = parse_json(resp);
    assert_eq!(json["message"], "Order status updated successfully");
    assert_eq!(json["order"]["status"], "shipped");
}

#[tokio::test]
async fn status_update_has_no_transition_or_ownership_guard() {
    // Any authenticated user may set any known status, including moving a
    // shipped order back to pending.
    let h = make_harness();
    let id = create_order(&h, "u1", 1).await;

    let body = serde_json::json!({"status": "shipped"});
    call(router(&h), authed_json("PUT", &format!("/orders/{id}/status"), "u2", &body)).await;

    let body = serde_json::json!({"status": "pending"});
    let (status, resp) =
        call(router(&h), authed_json("PUT", &format!("/orders/{id}/status"), "u2", &body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse_json(resp)["order"]["status"], "pending");
}

#[tokio::test]
async fn unknown_status_is_400() {
    let h = make_harness();
    let id = create_order(&h, "u1", 1).await;

    let body = serde_json::json!({"status": "returned"});
    let (status, resp) =
        call(router(&h), authed_json("PUT", &format!("/orders/{id}/status"), "u1", &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse_json(resp)["message"], "Invalid status");
}

// ---------------------------------------------------------------------------
// Auth and routing edges
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_without_token_is_401() {
    let h = make_harness();

    let req = Request::builder()
        .method("GET")
        .uri("/orders")
        .body(Body::empty())
        .unwrap();
    let (status, resp) = call(router(&h), req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(parse_json(resp)["message"], "Authentication required");
}

#[tokio::test]
async fn garbage_token_is_401() {
    let h = make_harness();

    let req = Request::builder()
        .method("GET")
        .uri("/orders")
        .header("authorization", "Bearer not.a.jwt")
        .body(Body::empty())
        .unwrap();
    let (status, resp) = call(router(&h), req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(parse_json(resp)["message"], "Invalid or expired token");
}

#[tokio::test]
async fn expired_token_is_401() {
    let h = make_harness();

    let token = auth::mint_token(SECRET, "u1", Duration::hours(-2));
    let req = Request::builder()
        .method("GET")
        .uri("/orders")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = call(router(&h), req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let h = make_harness();

    let req = Request::builder()
        .method("GET")
        .uri("/not-a-route")
        .body(Body::empty())
        .unwrap();
    let (status, _) = call(router(&h), req).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
