//! HTTP surface.
//!
//! - `POST /ready` applies a readiness event
//! - `GET /orders` lists incomplete orders
//! - `GET /orders/{id}` returns one order
//! - `POST /order` publishes a new order to the in-process queue
//! - `GET /healthz` reports liveness

use crate::clients::OrderClient;
use crate::ingestion::MemoryQueue;
use crate::model::{NewOrder, OrderId, OrderView, ReadyEvent};
use crate::order_actor::OrderError;
use crate::readiness::ReadinessHandler;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub orders: OrderClient,
    pub readiness: ReadinessHandler,
    /// Present when orders are ingested from an in-process queue.
    pub queue: Option<Arc<MemoryQueue>>,
    pub hostname: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("order {0} not found")]
    NotFound(OrderId),

    #[error("order store unavailable: {0}")]
    Store(#[from] OrderError),

    #[error("no in-process order queue is configured")]
    QueueUnavailable,

    #[error("failed to encode order: {0}")]
    Encode(String),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(OrderError::TaskFailed(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Store(_) | ApiError::QueueUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    hostname: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PublishedResponse {
    message_id: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", post(mark_ready))
        .route("/orders", get(list_orders))
        .route("/orders/{id}", get(get_order))
        .route("/order", post(publish_order))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Serves `router` on `addr` until `stop` is cancelled.
pub async fn serve(addr: SocketAddr, router: Router, stop: CancellationToken) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "HTTP server listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { stop.cancelled().await })
        .await
}

/// `POST /ready`: succeeds whether or not the order or item exists.
async fn mark_ready(
    State(state): State<AppState>,
    Json(event): Json<ReadyEvent>,
) -> Result<StatusCode, ApiError> {
    state.readiness.handle(event).await?;
    Ok(StatusCode::OK)
}

/// `GET /orders`
async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<OrderView>>, ApiError> {
    let orders = state.orders.list_incomplete().await?;
    debug!(count = orders.len(), "Listing incomplete orders");
    Ok(Json(orders.into_iter().map(OrderView::from).collect()))
}

/// `GET /orders/{id}`
async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderView>, ApiError> {
    let id = OrderId::from(id);
    match state.orders.get_order(id.clone()).await? {
        Some(order) => Ok(Json(OrderView::from(order))),
        None => Err(ApiError::NotFound(id)),
    }
}

/// `POST /order`: queues a new order the same way an external producer would.
async fn publish_order(
    State(state): State<AppState>,
    Json(order): Json<NewOrder>,
) -> Result<(StatusCode, Json<PublishedResponse>), ApiError> {
    let queue = state.queue.as_ref().ok_or(ApiError::QueueUnavailable)?;
    let body = serde_json::to_string(&order).map_err(|e| ApiError::Encode(e.to_string()))?;
    let message_id = queue.publish(body);
    info!(message_id = %message_id, "Published new order");
    Ok((StatusCode::CREATED, Json(PublishedResponse { message_id })))
}

/// `GET /healthz`
async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        hostname: state.hostname.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::IngestionSource;
    use crate::notifier::{LogNotifier, NotificationOutbox, RetryPolicy};
    use crate::order_actor;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::time::Duration;
    use tower::ServiceExt;

    fn make_state() -> AppState {
        let (actor, client) = order_actor::new();
        tokio::spawn(actor.run());
        let orders = OrderClient::new(client);
        let (outbox, _worker) = NotificationOutbox::start(
            Arc::new(LogNotifier),
            RetryPolicy::single_attempt(),
            CancellationToken::new(),
        );
        AppState {
            readiness: ReadinessHandler::new(orders.clone(), outbox),
            orders,
            queue: Some(Arc::new(MemoryQueue::new(Duration::from_secs(30)))),
            hostname: Some("kitchen-1".into()),
        }
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(resp: Response) -> serde_json::Value {
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = router(make_state());
        let req = Request::builder()
            .uri("/healthz")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = json_body(resp).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["hostname"], "kitchen-1");
    }

    #[tokio::test]
    async fn test_ready_for_unknown_order_still_succeeds() {
        let app = router(make_state());
        let resp = app
            .oneshot(post_json("/ready", r#"{"orderId": "Z9", "item": "Taco"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_ready_event_is_a_client_error() {
        let state = make_state();
        let resp = router(state.clone())
            .oneshot(post_json("/ready", r#"{"orderId": "A1"}"#))
            .await
            .unwrap();
        assert!(resp.status().is_client_error());

        let resp = router(state)
            .oneshot(post_json("/ready", "not json"))
            .await
            .unwrap();
        assert!(resp.status().is_client_error());
    }

    #[tokio::test]
    async fn test_orders_lists_only_incomplete() {
        let state = make_state();
        state
            .orders
            .create_order("A1".into(), vec!["Taco".into(), "Churro".into()], None)
            .await
            .unwrap();
        state
            .orders
            .create_order("A2".into(), vec!["Taco".into()], None)
            .await
            .unwrap();

        let resp = router(state.clone())
            .oneshot(post_json("/ready", r#"{"orderId": "A2", "item": "Taco"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let req = Request::builder()
            .uri("/orders")
            .body(Body::empty())
            .unwrap();
        let resp = router(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            json_body(resp).await,
            serde_json::json!([{
                "orderId": "A1",
                "items": [
                    {"name": "Taco", "ready": false},
                    {"name": "Churro", "ready": false}
                ]
            }])
        );
    }

    #[tokio::test]
    async fn test_get_order_by_id() {
        let state = make_state();
        state
            .orders
            .create_order("A1".into(), vec!["Taco".into()], None)
            .await
            .unwrap();

        let req = Request::builder()
            .uri("/orders/A1")
            .body(Body::empty())
            .unwrap();
        let resp = router(state.clone()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["orderId"], "A1");

        let req = Request::builder()
            .uri("/orders/missing")
            .body(Body::empty())
            .unwrap();
        let resp = router(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_publish_order_enqueues_message() {
        let state = make_state();
        let queue = state.queue.clone().unwrap();

        let resp = router(state)
            .oneshot(post_json("/order", r#"{"items": ["Taco", "Churro"]}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let message_id = json_body(resp).await["messageId"]
            .as_str()
            .unwrap()
            .to_string();

        assert_eq!(queue.visible_len(), 1);
        let batch = queue.receive(1, Duration::ZERO).await.unwrap();
        assert_eq!(batch[0].message_id, message_id);
        let order: NewOrder = serde_json::from_str(&batch[0].body).unwrap();
        assert_eq!(order.into_items(), vec!["Taco", "Churro"]);
    }

    #[tokio::test]
    async fn test_publish_without_queue_is_unavailable() {
        let state = AppState {
            queue: None,
            ..make_state()
        };
        let resp = router(state)
            .oneshot(post_json("/order", r#"{"items": []}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_store_errors_map_to_server_statuses() {
        let gone = ApiError::from(OrderError::ActorCommunicationError("closed".into()));
        assert_eq!(gone.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
        let died = ApiError::from(OrderError::TaskFailed("panicked".into()));
        assert_eq!(died.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
