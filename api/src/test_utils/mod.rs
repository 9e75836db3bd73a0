//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Manual mocks instead of mockall: the store mock has to hold live
//! channels and push snapshots into them on demand, which is plain code
//! here and awkward through expectations.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;

/// Serve `app` on an ephemeral local port and return its base URL
pub async fn spawn_test_server(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
