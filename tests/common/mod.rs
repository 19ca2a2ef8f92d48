//! Shared helpers for integration tests.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::Method;
use axum::response::Response;
use tokio::net::TcpListener;
use tower::ServiceExt;
use wish::{Server, Shutdown};

/// Directory holding the static fixture files.
#[allow(dead_code)]
pub fn server_files() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/testdata/server_files")
}

/// Sends one request through `server` without a network listener.
#[allow(dead_code)]
pub async fn send(server: &Server, method: Method, uri: &str) -> Response {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    server.clone().oneshot(req).await.unwrap()
}

#[allow(dead_code)]
pub async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Serves `server` on an ephemeral local port until `shutdown` fires.
#[allow(dead_code)]
pub async fn spawn_server(server: Server, shutdown: &Shutdown) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let signal = shutdown.signalled();

    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}
