//! LINE webhook handler
//!
//! Receives one delivery per HTTP request and drives the batch through
//! the dispatcher. The platform retries on non-2xx, so the handler
//! always acknowledges with a bare 200 once the batch has been walked;
//! per-event failures are logged inside the dispatcher, not surfaced.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::api::ApiState;
use crate::channels::WebhookDelivery;

/// Handle one inbound LINE webhook delivery
pub async fn handle_delivery(
    State(state): State<Arc<ApiState>>,
    Json(delivery): Json<WebhookDelivery>,
) -> StatusCode {
    tracing::debug!(events = delivery.events.len(), "received LINE delivery");

    state.dispatcher.process_delivery(&delivery).await;

    StatusCode::OK
}
