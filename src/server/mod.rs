use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::github::WebhookEvent;
use crate::pipeline::Pipeline;

pub const WEBHOOK_PATH: &str = "/api/github/webhooks";
const EVENT_HEADER: &str = "x-github-event";
const DELIVERY_HEADER: &str = "x-github-delivery";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Webhook server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
    /// Deliveries still being processed after their `202` went out.
    deliveries: TaskTracker,
}

impl AppState {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self {
            pipeline,
            deliveries: TaskTracker::new(),
        }
    }

    /// Stop accepting new deliveries and wait for the running ones.
    pub async fn drain(&self) {
        self.deliveries.close();
        if !self.deliveries.is_empty() {
            info!(pending = self.deliveries.len(), "waiting for in-flight deliveries");
        }
        self.deliveries.wait().await;
    }
}

/// Routes: `GET /health` and `POST /api/github/webhooks`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(WEBHOOK_PATH, post(receive_webhook))
        .with_state(state)
}

/// Listen on `addr` until Ctrl+C, then finish the deliveries already accepted.
pub async fn serve(addr: SocketAddr, pipeline: Arc<Pipeline>) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, path = WEBHOOK_PATH, "listening for GitHub webhooks");

    let state = AppState::new(pipeline);
    axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.drain().await;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for Ctrl+C");
        return;
    }
    info!("shutting down server");
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Acknowledge the delivery right away and process it on its own task.
async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let Some(event_name) = header_str(&headers, EVENT_HEADER) else {
        warn!("webhook delivery without X-GitHub-Event header");
        return StatusCode::BAD_REQUEST;
    };
    let delivery = header_str(&headers, DELIVERY_HEADER)
        .unwrap_or("-")
        .to_string();

    let event = match WebhookEvent::parse(event_name, &body) {
        Ok(Some(event)) => event,
        Ok(None) => {
            debug!(event = event_name, %delivery, "ignoring unsupported event");
            return StatusCode::NO_CONTENT;
        }
        Err(err) => {
            warn!(event = event_name, %delivery, error = %err, "malformed webhook payload");
            return StatusCode::BAD_REQUEST;
        }
    };

    let repository = event.repository();
    let span = info_span!(
        "delivery",
        id = %delivery,
        event = event.name(),
        owner = %repository.owner.login,
        repo = %repository.name
    );
    let pipeline = state.pipeline.clone();
    state.deliveries.spawn(
        async move {
            match pipeline.handle(&event).await {
                Ok(outcome) => info!(%outcome, "event processed"),
                Err(err) => error!(error = %err, "error processing event"),
            }
        }
        .instrument(span),
    );

    StatusCode::ACCEPTED
}
