//! Role landing pages.
//!
//! Login screens are public; dashboards sit behind the route guard and
//! redirect when it refuses.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use civic_core::{Department, Email, Role};

use crate::db::issues::{IssueScope, StatusCounts};
use crate::db::{IssueRepository, OfficerRepository};
use crate::error::{Result, StoreContext};
use crate::middleware::{AdminOnly, Authorized, CitizenOnly, OfficerOnly, RequiredRole};
use crate::state::AppState;

/// Query values a login screen echoes back.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub from: Option<String>,
    pub message: Option<String>,
}

/// Login screen descriptor.
#[derive(Debug, Serialize)]
pub struct LoginScreen {
    pub role: Role,
    pub title: String,
    pub email_domain: Option<&'static str>,
    pub login_action: &'static str,
    pub signup_path: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LoginScreen {
    fn new(role: Role, query: LoginQuery) -> Self {
        let name = match role {
            Role::Admin => "Admin",
            Role::Officer => "Officer",
            Role::Citizen | Role::Unknown => "Citizen",
        };
        Self {
            role,
            title: format!("{name} Login"),
            email_domain: role.domain(),
            login_action: "/auth/login",
            signup_path: role.signup_path(),
            from: query.from,
            message: query.message,
        }
    }
}

/// `GET /{role}/login`
pub async fn login_screen<R: RequiredRole>(Query(query): Query<LoginQuery>) -> Json<LoginScreen> {
    Json(LoginScreen::new(R::ROLE, query))
}

/// Dashboard summary.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub role: Role,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
    /// Absent for officers without a department.
    pub counts: Option<StatusCounts>,
    pub total: i64,
}

impl Dashboard {
    fn new(
        role: Role,
        email: Email,
        department: Option<Department>,
        counts: Option<StatusCounts>,
    ) -> Self {
        Self {
            role,
            email,
            department,
            total: counts.map_or(0, |c| c.total()),
            counts,
        }
    }
}

/// `GET /admin/dashboard`: every issue.
pub async fn admin_dashboard(
    Authorized(user, ..): Authorized<AdminOnly>,
    State(state): State<AppState>,
) -> Result<Json<Dashboard>> {
    let counts = IssueRepository::new(state.pool())
        .count_by_status(IssueScope::All)
        .await
        .context("load dashboard")?;
    Ok(Json(Dashboard::new(Role::Admin, user.email, None, Some(counts))))
}

/// `GET /officer/dashboard`: issues of the officer's department.
pub async fn officer_dashboard(
    Authorized(user, ..): Authorized<OfficerOnly>,
    State(state): State<AppState>,
) -> Result<Json<Dashboard>> {
    let department = OfficerRepository::new(state.pool())
        .department_for(&user.email)
        .await
        .context("load officer department")?;
    let counts = match department {
        Some(department) => Some(
            IssueRepository::new(state.pool())
                .count_by_status(IssueScope::Department(department))
                .await
                .context("load dashboard")?,
        ),
        None => None,
    };
    Ok(Json(Dashboard::new(Role::Officer, user.email, department, counts)))
}

/// `GET /citizen/dashboard`: the citizen's own complaints.
pub async fn citizen_dashboard(
    Authorized(user, ..): Authorized<CitizenOnly>,
    State(state): State<AppState>,
) -> Result<Json<Dashboard>> {
    let counts = IssueRepository::new(state.pool())
        .count_by_status(IssueScope::Reporter(&user.email))
        .await
        .context("load dashboard")?;
    Ok(Json(Dashboard::new(Role::Citizen, user.email, None, Some(counts))))
}
