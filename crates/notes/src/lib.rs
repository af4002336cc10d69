//! Civic Desk note service.
//!
//! A deliberately small REST service: a list of `{id, text}` notes held in
//! memory, lost on restart. Exposed as a library so the router can be
//! mounted in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod routes;
pub mod store;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use store::NoteStore;

/// Build the complete note application around `store`.
///
/// CORS is open to any origin; the service carries no credentials.
pub fn app(store: NoteStore) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health))
        .merge(routes::routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

async fn health() -> &'static str {
    "ok"
}
