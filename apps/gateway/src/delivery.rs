//! Reply delivery through the Graph Send API.

use anyhow::Result;
use async_trait::async_trait;
use relay_core::send::{DeliveryError, SendRequest, check_send_response};
use reqwest::StatusCode;

use crate::config::GatewayConfig;

const SEND_MESSAGE_PATH: &str = "/v17.0/me/messages";

/// Seam between event dispatch and the outbound HTTP call. Tests substitute
/// a recording implementation.
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn send(&self, request: &SendRequest) -> Result<(), DeliveryError>;
}

pub struct GraphSender {
    http: reqwest::Client,
    api_base: String,
    access_token: String,
}

impl GraphSender {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.send_timeout)
            .build()?;
        Ok(Self {
            http,
            api_base: config.api_base.clone(),
            access_token: config.access_token.clone(),
        })
    }

    fn send_url(&self) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), SEND_MESSAGE_PATH)
    }
}

#[async_trait]
impl ReplySender for GraphSender {
    async fn send(&self, request: &SendRequest) -> Result<(), DeliveryError> {
        let response = self
            .http
            .post(self.send_url())
            .query(&[("access_token", self.access_token.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(());
        }

        tracing::warn!(status = status.as_u16(), "send api returned non-200 status");
        let body = response
            .bytes()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;
        check_send_response(&body)
    }
}
