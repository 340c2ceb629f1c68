//! Axum router and all HTTP handlers for mvd-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. Scenario tests in `tests/` compose the router directly
//! against in-memory collaborators, so no handler touches middleware state.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use mvd_orders::{NewOrderItem, OrderError, PaymentResult};
use tracing::error;
use uuid::Uuid;

use crate::{
    api_types::{
        CreateOrderRequest, ErrorBody, HealthResponse, OrderEnvelope, PaymentEnvelope,
        UpdateStatusRequest,
    },
    auth::AuthError,
    state::AppState,
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/orders", post(create_order).get(list_orders))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/payment", post(process_payment))
        .route("/orders/:id/cancel", put(cancel_order))
        .route("/orders/:id/status", put(update_order_status))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// ApiError — taxonomy → HTTP status
// ---------------------------------------------------------------------------

/// A JSON error response with its status code.
pub(crate) struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                message: message.into(),
                error: None,
            },
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        let status = match err {
            OrderError::Validation(_) | OrderError::Conflict(_) | OrderError::Dependency(_) => {
                StatusCode::BAD_REQUEST
            }
            OrderError::NotFound(_) => StatusCode::NOT_FOUND,
            OrderError::Forbidden(_) => StatusCode::FORBIDDEN,
            OrderError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(%err, "internal error");
            return ApiError::new(status, "Internal server error");
        }
        ApiError::new(status, err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::new(StatusCode::UNAUTHORIZED, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Malformed ids cannot name an existing order.
fn parse_order_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::new(StatusCode::NOT_FOUND, "Order not found"))
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "OK",
            service: st.build.service,
            timestamp: Utc::now(),
        }),
    )
}

// ---------------------------------------------------------------------------
// POST /orders
// ---------------------------------------------------------------------------

pub(crate) async fn create_order(
    State(st): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Response, ApiError> {
    let caller = st.verifier.require_user(&headers)?;

    let items: Vec<NewOrderItem> = req
        .items
        .into_iter()
        .map(|i| NewOrderItem {
            product_id: i.product_id,
            quantity: i.quantity,
        })
        .collect();

    let order = st
        .manager
        .create_order(&caller, &items, req.shipping_address)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderEnvelope {
            message: "Order created successfully".to_string(),
            order,
        }),
    )
        .into_response())
}

// ---------------------------------------------------------------------------
// GET /orders
// ---------------------------------------------------------------------------

pub(crate) async fn list_orders(
    State(st): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let caller = st.verifier.require_user(&headers)?;
    let orders = st.manager.list_orders(&caller).await?;
    Ok((StatusCode::OK, Json(orders)).into_response())
}

// ---------------------------------------------------------------------------
// GET /orders/:id
// ---------------------------------------------------------------------------

pub(crate) async fn get_order(
    State(st): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let caller = st.verifier.require_user(&headers)?;
    let order_id = parse_order_id(&id)?;
    let order = st.manager.get_order(order_id, &caller).await?;
    Ok((StatusCode::OK, Json(order)).into_response())
}

// ---------------------------------------------------------------------------
// POST /orders/:id/payment
// ---------------------------------------------------------------------------

pub(crate) async fn process_payment(
    State(st): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let caller = st.verifier.require_user(&headers)?;
    let order_id = parse_order_id(&id)?;

    match st.manager.process_payment(order_id, &caller).await? {
        PaymentResult::Approved { order, details } => Ok((
            StatusCode::OK,
            Json(PaymentEnvelope {
                message: "Payment processed successfully".to_string(),
                order,
                payment_details: details,
            }),
        )
            .into_response()),
        PaymentResult::Declined { message, .. } => Ok((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                message: "Payment failed".to_string(),
                error: Some(message),
            }),
        )
            .into_response()),
    }
}

// ---------------------------------------------------------------------------
// PUT /orders/:id/cancel
// ---------------------------------------------------------------------------

pub(crate) async fn cancel_order(
    State(st): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let caller = st.verifier.require_user(&headers)?;
    let order_id = parse_order_id(&id)?;
    let order = st.manager.cancel_order(order_id, &caller).await?;

    Ok((
        StatusCode::OK,
        Json(OrderEnvelope {
            message: "Order cancelled successfully".to_string(),
            order,
        }),
    )
        .into_response())
}

// ---------------------------------------------------------------------------
// PUT /orders/:id/status
// ---------------------------------------------------------------------------

pub(crate) async fn update_order_status(
    State(st): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Response, ApiError> {
    // Authenticated, but deliberately no ownership or role check.
    let _caller = st.verifier.require_user(&headers)?;
    let order_id = parse_order_id(&id)?;
    let order = st.manager.update_status(order_id, &req.status).await?;

    Ok((
        StatusCode::OK,
        Json(OrderEnvelope {
            message: "Order status updated successfully".to_string(),
            order,
        }),
    )
        .into_response())
}
