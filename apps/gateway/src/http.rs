//! Webhook endpoint: Graph subscription handshake on GET, event ingestion on
//! POST. Ingestion walks entries and events in arrival order, dispatching one
//! event at a time; per-event failures are logged and never change the
//! inbound response, which is a 202 once the envelope decoded.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use relay_core::event::{Envelope, MessageEvent};
use relay_core::responder::{ChatRequest, Responder, ResponderError, SenderInfo};
use relay_core::send::{DeliveryError, SendRequest};

use crate::delivery::ReplySender;

#[derive(Clone)]
pub struct AppState {
    pub verify_token: String,
    pub responder: Arc<dyn Responder>,
    pub sender: Arc<dyn ReplySender>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", get(verify).post(ingest))
        .route("/healthz", get(healthz))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct VerifyParams {
    #[serde(rename = "hub.verify_token", default)]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge", default)]
    challenge: Option<String>,
}

/// Subscription handshake: echoing the challenge proves endpoint ownership.
/// A mismatched token still answers 200, matching the platform-facing
/// behavior this service has always had.
async fn verify(State(state): State<AppState>, Query(params): Query<VerifyParams>) -> Response {
    if params.verify_token.as_deref() == Some(state.verify_token.as_str()) {
        (StatusCode::OK, params.challenge.unwrap_or_default()).into_response()
    } else {
        tracing::warn!("verify token mismatch");
        (StatusCode::OK, "Incorrect verify token.".to_string()).into_response()
    }
}

async fn ingest(State(state): State<AppState>, body: Bytes) -> Response {
    let envelope: Envelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::warn!(error = %err, "failed to decode webhook envelope");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    handle_envelope(&state, &envelope).await;

    (
        StatusCode::ACCEPTED,
        Json(json!({ "code": 202, "status": "Accepted" })),
    )
        .into_response()
}

async fn healthz() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

#[derive(Debug, Error)]
enum DispatchError {
    #[error("responder rejected event: {0}")]
    Responder(#[from] ResponderError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

async fn handle_envelope(state: &AppState, envelope: &Envelope) {
    for entry in &envelope.entry {
        for event in &entry.messaging {
            if let Err(err) = dispatch_event(state, event).await {
                let mid = event.message.as_ref().map(|m| m.mid.as_str()).unwrap_or("");
                tracing::warn!(
                    error = %err,
                    sender_id = event.sender.id,
                    mid = mid,
                    "event dispatch failed"
                );
            }
        }
    }
}

/// Dispatches one inbound event: classify, ask the responder, and forward a
/// reply if one is produced. Events without message content are skipped.
async fn dispatch_event(state: &AppState, event: &MessageEvent) -> Result<(), DispatchError> {
    let Some(message) = &event.message else {
        return Ok(());
    };

    let request = ChatRequest::text_message(SenderInfo { id: event.sender.id }, &message.text);
    let Some(reply) = state.responder.handle(&request)? else {
        return Ok(());
    };

    let delivery = SendRequest::reply_to(event.sender.id, reply.text);
    tracing::debug!(recipient_id = event.sender.id, "forwarding responder reply");
    state.sender.send(&delivery).await?;
    Ok(())
}
