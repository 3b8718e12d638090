//! Responder contract: classify one inbound chat event and produce an
//! optional reply.
//!
//! Requests are tagged with an [`EventKind`] alongside their payload so the
//! gateway only depends on the classify-then-reply capability. New kinds
//! (image, quick reply, postback) extend [`EventKind`] and [`RequestPayload`]
//! without touching gateway dispatch.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of event kinds a responder can be asked to classify.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    TextMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SenderInfo {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RequestPayload {
    Text { sender: SenderInfo, text: String },
}

/// One classified inbound event. The kind tag travels next to the payload;
/// responders check the tag before the payload shape, so a recognized kind
/// with a mismatched payload surfaces [`ResponderError::InvalidRequestShape`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub kind: EventKind,
    pub payload: RequestPayload,
}

impl ChatRequest {
    /// Builds a correctly paired text-message request.
    pub fn text_message(sender: SenderInfo, text: impl Into<String>) -> Self {
        Self {
            kind: EventKind::TextMessage,
            payload: RequestPayload::Text {
                sender,
                text: text.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub text: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResponderError {
    #[error("event kind is not supported")]
    InvalidEventKind,
    #[error("request payload does not match its event kind")]
    InvalidRequestShape,
}

/// Decides how to reply to a classified chat event. Stateless and
/// synchronous; `Ok(None)` means no reply is needed.
pub trait Responder: Send + Sync {
    fn handle(&self, request: &ChatRequest) -> Result<Option<ChatResponse>, ResponderError>;
}

/// Reference responder: echoes the inbound text wrapped in a fixed template.
/// Same input text always yields the same output text.
pub struct EchoResponder;

impl Responder for EchoResponder {
    fn handle(&self, request: &ChatRequest) -> Result<Option<ChatResponse>, ResponderError> {
        if request.kind != EventKind::TextMessage {
            return Err(ResponderError::InvalidEventKind);
        }
        let RequestPayload::Text { text, .. } = &request.payload;
        Ok(Some(ChatResponse {
            text: format!("response from: {text}"),
        }))
    }
}
