//! Messenger relay core contracts and value types.
//!
//! This crate exposes the webhook wire model shared with the Graph platform,
//! the responder contract the gateway dispatches inbound events through, and
//! the Send API reply interpretation used after an outbound delivery.
pub mod event;
pub mod responder;
pub mod send;

pub use event::*;
pub use responder::*;
pub use send::*;
