//! Integration tests for Civic Desk.
//!
//! # Running Tests
//!
//! ```bash
//! # Self-contained tests (note service, route guard)
//! cargo test -p civic-integration-tests
//!
//! # Portal flows, against a running portal and migrated database
//! cargo test -p civic-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `notes_api` - note service over real HTTP
//! - `access_control` - role derivation and the route guard across every role
//! - `portal_auth` - signup, login, guard redirects and logout on the portal

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

/// Serve `app` on an ephemeral local port and return its base URL.
///
/// The server runs until the test's runtime shuts down.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
#[allow(clippy::expect_used)]
pub async fn spawn_app(app: Router) -> String {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    format!("http://{addr}")
}
