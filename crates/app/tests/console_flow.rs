//! End-to-end console flows over real HTTP.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use snapdeck_application::{ConsoleSession, ReplayTarget, SendRequest};
use snapdeck_domain::{EndpointCatalog, EndpointId, FailureKind};
use snapdeck_infrastructure::{ReqwestHttpClient, SystemClock};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn session(base_url: &str) -> ConsoleSession<ReqwestHttpClient, SystemClock> {
    let sender = SendRequest::new(
        Arc::new(ReqwestHttpClient::new().expect("client")),
        Arc::new(SystemClock::new()),
    );
    ConsoleSession::new(EndpointCatalog::builtin(), base_url, "llama-7b", sender)
        .expect("session")
}

/// Answers every connection with the same response.
async fn serve(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut buffer = vec![0u8; 16 * 1024];
                let mut received = Vec::new();
                loop {
                    let Ok(n) = socket.read(&mut buffer).await else {
                        return;
                    };
                    received.extend_from_slice(&buffer[..n]);
                    if n == 0 || complete(&received) {
                        break;
                    }
                }
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    base
}

fn complete(data: &[u8]) -> bool {
    let text = String::from_utf8_lossy(data);
    let Some(end) = text.find("\r\n\r\n") else {
        return false;
    };
    let length = text[..end]
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    data.len() >= end + 4 + length
}

#[tokio::test]
async fn unreachable_server_is_recorded_as_status_zero() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut session = session(&format!("http://{addr}"));
    session.select(EndpointId::Health).unwrap();
    session.send().await.expect("transport failures are outcomes");

    let response = session.response().expect("response pane");
    assert_eq!(response.status, 0);
    assert!(!response.error.as_deref().unwrap_or_default().is_empty());
    assert_eq!(response.failure_kind(), Some(FailureKind::Transport));

    let entry = &session.history().entries()[0];
    assert_eq!(entry.status, 0);
    assert_eq!(entry.path, "/health");
}

#[tokio::test]
async fn server_errors_surface_their_message() {
    let base = serve(
        "HTTP/1.1 404 Not Found\r\nContent-Type: application/json\r\nContent-Length: 69\r\nConnection: close\r\n\r\n{\"error\":{\"message\":\"Model not found\",\"type\":\"not_found\",\"code\":404}}",
    )
    .await;

    let mut session = session(&base);
    session.select(EndpointId::ModelSwitch).unwrap();
    session.send().await.unwrap();

    let response = session.response().unwrap();
    assert_eq!(response.status, 404);
    assert_eq!(response.error.as_deref(), Some("Model not found"));
    assert_eq!(session.history().len(), 1);
}

#[tokio::test]
async fn chat_round_trip_and_replay() {
    let base = serve(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 42\r\nConnection: close\r\n\r\n{\"choices\":[{\"message\":{\"content\":\"hi\"}}]}",
    )
    .await;

    let mut session = session(&base);
    session.select(EndpointId::ChatCompletions).unwrap();
    let draft: serde_json::Value = serde_json::from_str(session.editor_text()).unwrap();
    assert_eq!(draft["model"], "llama-7b");

    session.send().await.unwrap();
    let response = session.response().unwrap();
    assert!(response.is_success());
    assert_eq!(response.json.as_ref().unwrap()["choices"][0]["message"]["content"], "hi");

    session.select(EndpointId::Health).unwrap();
    let id = session.history().entries()[0].id.clone();
    assert_eq!(
        session.replay(&id).unwrap(),
        ReplayTarget::Endpoint(EndpointId::ChatCompletions)
    );
    assert_eq!(session.active_endpoint().id, EndpointId::ChatCompletions);
}
