//! HTTP middleware stack for the portal.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//! 4. Security headers

pub mod auth;
pub mod security_headers;
pub mod session;

pub use auth::{
    AdminOnly, AuthRejection, Authorized, CitizenOnly, CurrentSession, OfficerOnly, RequiredRole,
    Signed, clear_current_user, set_current_user,
};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
