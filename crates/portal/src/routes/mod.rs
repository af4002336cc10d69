//! HTTP route handlers for the portal.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//! GET  /health/ready                    - Readiness (database)
//!
//! # Screens (guarded ones redirect)
//! GET  /{admin,officer,citizen}/login   - Login screen descriptor
//! GET  /{admin,officer,citizen}/dashboard - Issue counts for the role
//!
//! # Auth
//! POST /auth/login                      - Login
//! POST /auth/{admin,officer,citizen}/signup - Signup for the role's domain
//! POST /auth/logout                     - Logout
//! GET  /auth/session                    - Current session
//!
//! # Citizen API
//! GET  /api/citizen/issues              - Own complaints
//! POST /api/citizen/issues              - File a complaint
//!
//! # Admin API
//! GET  /api/admin/issues                - All complaints
//! GET  /api/admin/issues/{id}           - One complaint
//! PATCH /api/admin/issues/{id}          - Change status
//! GET  /api/admin/officers              - Officer directory
//! PATCH /api/admin/officers/{id}        - Assign department
//!
//! # Officer API
//! GET  /api/officer/issues              - Department complaints
//! POST /api/officer/issues/{id}/start   - Begin work
//! POST /api/officer/issues/{id}/resolve - Close
//! POST /api/officer/issues/{id}/assign  - Assign field worker
//! GET  /api/officer/reports             - Department reports
//! POST /api/officer/reports/manual      - File an enhanced manual report
//! POST /api/officer/reports/pdf         - Upload a PDF report
//! POST /api/officer/reports/compare     - Compare department reports
//! GET  /api/officer/reports/{id}/view   - Redirect to the file
//! GET  /api/officer/reports/{id}/download - Redirect to the attachment download
//! POST /api/officer/reports/{id}/analysis - Action items / risk / performance
//!
//! # Shared API
//! GET  /api/messages                    - Message board
//! POST /api/messages                    - Post a message
//! GET  /api/profile                     - Signed-in profile
//! ```

pub mod auth;
pub mod dashboards;
pub mod issues;
pub mod messages;
pub mod officers;
pub mod profile;
pub mod reports;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
};

use civic_core::Department;

use crate::db::OfficerRepository;
use crate::error::{AppError, Result, StoreContext};
use crate::middleware::{AdminOnly, CitizenOnly, OfficerOnly};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Headroom over the PDF limit for the multipart envelope.
const UPLOAD_BODY_LIMIT: usize = reports::MAX_PDF_BYTES + 1024 * 1024;

/// Department of the signed-in officer.
///
/// # Errors
///
/// Returns a 409 banner when the officer has no department assigned.
pub(crate) async fn officer_department(
    state: &AppState,
    user: &CurrentUser,
) -> Result<Department> {
    OfficerRepository::new(state.pool())
        .department_for(&user.email)
        .await
        .context("load officer department")?
        .ok_or_else(AppError::missing_department)
}

/// Create the screen routes (login descriptors and dashboards).
pub fn screen_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/login", get(dashboards::login_screen::<AdminOnly>))
        .route("/officer/login", get(dashboards::login_screen::<OfficerOnly>))
        .route("/citizen/login", get(dashboards::login_screen::<CitizenOnly>))
        .route("/admin/dashboard", get(dashboards::admin_dashboard))
        .route("/officer/dashboard", get(dashboards::officer_dashboard))
        .route("/citizen/dashboard", get(dashboards::citizen_dashboard))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/admin/signup", post(auth::signup::<AdminOnly>))
        .route("/officer/signup", post(auth::signup::<OfficerOnly>))
        .route("/citizen/signup", post(auth::signup::<CitizenOnly>))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::current_session))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Citizen
        .route(
            "/citizen/issues",
            get(issues::list_mine).post(issues::create),
        )
        // Admin
        .route("/admin/issues", get(issues::list_all))
        .route(
            "/admin/issues/{id}",
            get(issues::show).patch(issues::update_status),
        )
        .route("/admin/officers", get(officers::list))
        .route("/admin/officers/{id}", patch(officers::assign_department))
        // Officer
        .route("/officer/issues", get(issues::list_department))
        .route("/officer/issues/{id}/start", post(issues::start))
        .route("/officer/issues/{id}/resolve", post(issues::resolve))
        .route("/officer/issues/{id}/assign", post(issues::assign))
        .route("/officer/reports", get(reports::list))
        .route("/officer/reports/manual", post(reports::create_manual))
        .route(
            "/officer/reports/pdf",
            post(reports::upload_pdf).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/officer/reports/compare", post(reports::compare))
        .route("/officer/reports/{id}/view", get(reports::view))
        .route("/officer/reports/{id}/download", get(reports::download))
        .route("/officer/reports/{id}/analysis", post(reports::analyze))
        // Shared
        .route("/messages", get(messages::list).post(messages::post))
        .route("/profile", get(profile::show))
}

/// Create all routes for the portal.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(screen_routes())
        .nest("/auth", auth_routes())
        .nest("/api", api_routes())
}
