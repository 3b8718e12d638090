//! Gateway wiring: configuration, the HTTP surface, and reply delivery.
pub mod config;
pub mod delivery;
pub mod http;
