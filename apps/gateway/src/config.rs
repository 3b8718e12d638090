use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_GRAPH_API_BASE: &str = "https://graph.facebook.com";
const DEFAULT_SEND_TIMEOUT_SECS: u64 = 10;

/// Read-only configuration, constructed once in `main` and shared by
/// reference. No ambient environment reads happen after startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind: SocketAddr,
    pub verify_token: String,
    pub access_token: String,
    pub api_base: String,
    pub send_timeout: Duration,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        let bind = std::env::var("BIND")
            .unwrap_or_else(|_| "0.0.0.0:8080".into())
            .parse()
            .context("invalid BIND address")?;
        let verify_token =
            std::env::var("VERIFY_TOKEN").context("VERIFY_TOKEN environment variable required")?;
        let access_token = std::env::var("PAGE_ACCESS_TOKEN")
            .context("PAGE_ACCESS_TOKEN environment variable required")?;
        let api_base =
            std::env::var("GRAPH_API_BASE").unwrap_or_else(|_| DEFAULT_GRAPH_API_BASE.into());
        let send_timeout = std::env::var("SEND_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_SEND_TIMEOUT_SECS));

        Ok(Self {
            bind,
            verify_token,
            access_token,
            api_base,
            send_timeout,
        })
    }
}
