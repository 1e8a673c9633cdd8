//! HTTP surface: verification handshake, signed webhook ingest, liveness,
//! and static assets.
//!
//! The webhook POST acks as soon as the batch is accepted; event processing
//! runs on a detached task, so replies never hold up the platform's
//! delivery timeout.

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use chatbridge_core::{Catalog, SharedChannel, SharedIntentResolver, SharedNotifier, WebhookBatch};
use chatbridge_session::SharedSessionStore;
use serde::Deserialize;
use tower_http::services::ServeDir;
use tracing::{debug, warn};

use crate::{
    config::GatewayConfig, reqid::with_request_id, router::process_batch,
    security::signature_valid,
};

pub struct AppState {
    pub config: GatewayConfig,
    pub catalog: Catalog,
    pub sessions: SharedSessionStore,
    pub channel: SharedChannel,
    pub nlu: SharedIntentResolver,
    pub notifier: SharedNotifier,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let public_dir = state.config.public_dir.clone();
    Router::new()
        .route("/", get(index))
        .route("/webhook", get(verify).post(receive))
        .layer(middleware::from_fn(with_request_id))
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state)
}

async fn index() -> &'static str {
    "Hello, I am a chat bot"
}

#[derive(Deserialize)]
struct VerifyQs {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
    #[serde(rename = "hub.verify_token")]
    token: Option<String>,
}

async fn verify(State(state): State<Arc<AppState>>, Query(q): Query<VerifyQs>) -> Response {
    if q.mode.as_deref() == Some("subscribe")
        && q.token.as_deref() == Some(state.config.verify_token.as_str())
    {
        (StatusCode::OK, q.challenge.unwrap_or_default()).into_response()
    } else {
        warn!("webhook verification failed; tokens do not match");
        (StatusCode::FORBIDDEN, "forbidden").into_response()
    }
}

async fn receive(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !signature_valid(&state.config.app_secret, &headers, &body) {
        warn!("invalid webhook signature");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let batch: WebhookBatch = match serde_json::from_slice(&body) {
        Ok(batch) => batch,
        Err(err) => {
            warn!("failed to decode webhook payload: {err}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    if batch.object == "page" {
        // Ack now; replies are dispatched on their own time.
        tokio::spawn(process_batch(state.clone(), batch));
    } else {
        debug!(object = %batch.object, "ignoring non-page webhook object");
    }

    (StatusCode::OK, "EVENT_RECEIVED").into_response()
}
