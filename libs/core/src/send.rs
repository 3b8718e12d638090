//! Outbound Send API wire model and reply interpretation.

use crate::event::UserRef;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessagingType {
    Response,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendText {
    pub text: String,
}

/// One outbound delivery: a responder reply addressed back to the sender of
/// the inbound event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendRequest {
    pub recipient: UserRef,
    pub messaging_type: MessagingType,
    pub message: SendText,
}

impl SendRequest {
    pub fn reply_to(recipient: i64, text: impl Into<String>) -> Self {
        Self {
            recipient: UserRef::new(recipient),
            messaging_type: MessagingType::Response,
            message: SendText { text: text.into() },
        }
    }
}

/// Send API reply envelope. `error` is present only when the call failed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SendError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

/// Structured error body returned by the Send API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendError {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub error_subcode: i64,
    #[serde(default)]
    pub fbtrace_id: String,
}

impl std::fmt::Display for SendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (type {}, code {}, subcode {})",
            self.message, self.kind, self.code, self.error_subcode
        )?;
        if !self.fbtrace_id.is_empty() {
            write!(f, " [trace {}]", self.fbtrace_id)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The Send API reply did not parse as the expected envelope.
    #[error("send api reply did not parse: {0}")]
    MalformedErrorBody(#[from] serde_json::Error),
    #[error("send api rejected the delivery: {0}")]
    UpstreamRejected(SendError),
    /// The outbound request never produced a response.
    #[error("send transport failed: {0}")]
    Transport(String),
}

/// Interprets the body of a Send API reply after a non-success status.
///
/// An envelope without an `error` field counts as success even though this
/// is only called on non-200 responses; callers rely on that contract.
pub fn check_send_response(body: &[u8]) -> Result<(), DeliveryError> {
    let reply: SendResponse = serde_json::from_slice(body)?;
    match reply.error {
        Some(error) => Err(DeliveryError::UpstreamRejected(error)),
        None => Ok(()),
    }
}
