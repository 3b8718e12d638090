//! Drives `GraphSender` against a local stand-in for the Send API and checks
//! how non-success replies are interpreted.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde_json::{Value, json};

use relay_core::send::{DeliveryError, SendRequest};
use relay_gateway::config::GatewayConfig;
use relay_gateway::delivery::{GraphSender, ReplySender};

type CapturedCalls = Arc<Mutex<Vec<(Option<String>, Value)>>>;

#[derive(Clone)]
struct MockState {
    captured: CapturedCalls,
    reply_status: StatusCode,
    reply_body: Value,
}

async fn capture(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state
        .captured
        .lock()
        .unwrap()
        .push((params.get("access_token").cloned(), body));
    (state.reply_status, Json(state.reply_body.clone()))
}

async fn spawn_send_api(reply_status: StatusCode, reply_body: Value) -> (SocketAddr, CapturedCalls) {
    let captured: CapturedCalls = Arc::default();
    let state = MockState {
        captured: captured.clone(),
        reply_status,
        reply_body,
    };
    let app = Router::new()
        .route("/v17.0/me/messages", post(capture))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, captured)
}

fn sender_for(addr: SocketAddr) -> GraphSender {
    let config = GatewayConfig {
        bind: SocketAddr::from(([127, 0, 0, 1], 0)),
        verify_token: "verify".into(),
        access_token: "token-123".into(),
        api_base: format!("http://{addr}"),
        send_timeout: Duration::from_secs(2),
    };
    GraphSender::new(&config).unwrap()
}

#[tokio::test]
async fn posts_json_with_access_token() {
    let (addr, captured) = spawn_send_api(StatusCode::OK, json!({ "result": "ok" })).await;
    let sender = sender_for(addr);

    sender
        .send(&SendRequest::reply_to(42, "response from: hi"))
        .await
        .unwrap();

    let calls = captured.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (token, body) = &calls[0];
    assert_eq!(token.as_deref(), Some("token-123"));
    assert_eq!(
        *body,
        json!({
            "recipient": { "id": "42" },
            "messaging_type": "RESPONSE",
            "message": { "text": "response from: hi" }
        })
    );
}

#[tokio::test]
async fn non_200_with_error_body_is_rejected() {
    let (addr, _captured) = spawn_send_api(
        StatusCode::BAD_REQUEST,
        json!({
            "error": {
                "message": "Invalid OAuth access token.",
                "type": "OAuthException",
                "code": 190,
                "error_subcode": 463,
                "fbtrace_id": "Azxyz"
            }
        }),
    )
    .await;
    let sender = sender_for(addr);

    let err = sender
        .send(&SendRequest::reply_to(42, "hello"))
        .await
        .unwrap_err();
    match err {
        DeliveryError::UpstreamRejected(error) => {
            assert_eq!(error.code, 190);
            assert_eq!(error.kind, "OAuthException");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_200_without_error_body_counts_as_success() {
    let (addr, _captured) =
        spawn_send_api(StatusCode::BAD_REQUEST, json!({ "result": "ok" })).await;
    let sender = sender_for(addr);

    sender
        .send(&SendRequest::reply_to(42, "hello"))
        .await
        .unwrap();
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    // Bind then drop a listener so the port is very likely closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let sender = sender_for(addr);
    let err = sender
        .send(&SendRequest::reply_to(42, "hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, DeliveryError::Transport(_)));
}
