//! Messenger webhook relay: verifies the Graph subscription handshake,
//! dispatches inbound text events to a responder, and forwards replies
//! through the Send API.

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use relay_core::responder::EchoResponder;
use relay_gateway::config::GatewayConfig;
use relay_gateway::delivery::GraphSender;
use relay_gateway::http::{AppState, router};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = GatewayConfig::from_env()?;
    let sender = Arc::new(GraphSender::new(&config)?);
    let state = AppState {
        verify_token: config.verify_token.clone(),
        responder: Arc::new(EchoResponder),
        sender,
    };

    let app = router(state);
    tracing::info!("gateway listening on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
