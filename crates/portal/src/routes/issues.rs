//! Issue route handlers.
//!
//! Citizens file and list their own complaints, admins see and re-status
//! everything, officers work the issues of their department.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use civic_core::{IssueDraft, IssueForm, IssueId, IssueStatus};

use crate::db::{IssueRepository, RepositoryError};
use crate::error::{AppError, Result, StoreContext, add_breadcrumb};
use crate::middleware::{AdminOnly, Authorized, CitizenOnly, OfficerOnly};
use crate::models::{CurrentUser, Issue, OfficerAction};
use crate::state::AppState;

use super::officer_department;

const ISSUE_NOT_FOUND: &str = "Issue not found.";

/// Body of `PATCH /api/admin/issues/{id}`.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Body of `POST /api/officer/issues/{id}/assign`.
#[derive(Debug, Deserialize)]
pub struct AssignForm {
    #[serde(default)]
    pub worker: String,
}

fn not_found() -> AppError {
    AppError::NotFound(ISSUE_NOT_FOUND.to_owned())
}

// =============================================================================
// Citizen
// =============================================================================

/// `POST /api/citizen/issues`
#[tracing::instrument(skip_all, fields(reporter = %user.email))]
pub async fn create(
    Authorized(user, ..): Authorized<CitizenOnly>,
    State(state): State<AppState>,
    payload: std::result::Result<Json<IssueForm>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(form) = payload?;
    let draft = IssueDraft::new(&form)?;
    let issue = IssueRepository::new(state.pool())
        .create(&draft, &user.email)
        .await
        .context("submit complaint")?;

    tracing::info!(issue_id = %issue.id, department = %issue.department, "Issue filed");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Complaint submitted successfully!",
            "issue": issue,
        })),
    ))
}

/// `GET /api/citizen/issues`
pub async fn list_mine(
    Authorized(user, ..): Authorized<CitizenOnly>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Issue>>> {
    let issues = IssueRepository::new(state.pool())
        .list_by_reporter(&user.email)
        .await
        .context("load complaints")?;
    Ok(Json(issues))
}

// =============================================================================
// Admin
// =============================================================================

/// `GET /api/admin/issues`
pub async fn list_all(
    _: Authorized<AdminOnly>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Issue>>> {
    let issues = IssueRepository::new(state.pool())
        .list_all()
        .await
        .context("load complaints")?;
    Ok(Json(issues))
}

/// `GET /api/admin/issues/{id}`
pub async fn show(
    _: Authorized<AdminOnly>,
    State(state): State<AppState>,
    Path(id): Path<IssueId>,
) -> Result<Json<Issue>> {
    IssueRepository::new(state.pool())
        .get(id)
        .await
        .context("load complaint")?
        .map(Json)
        .ok_or_else(not_found)
}

/// `PATCH /api/admin/issues/{id}`
#[tracing::instrument(skip(_auth, state, payload), fields(issue_id = %id))]
pub async fn update_status(
    _auth: Authorized<AdminOnly>,
    State(state): State<AppState>,
    Path(id): Path<IssueId>,
    payload: std::result::Result<Json<StatusForm>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(form) = payload?;
    let status: IssueStatus = form
        .status
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid status: {}", form.status)))?;

    let issue = IssueRepository::new(state.pool())
        .update_status(id, status)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => not_found(),
            other => AppError::Store {
                action: "update status",
                source: other,
            },
        })?;

    let issue_id = id.to_string();
    add_breadcrumb(
        "issues",
        "Status updated",
        Some(&[("issue_id", issue_id.as_str()), ("status", status.as_str())]),
    );

    Ok(Json(serde_json::json!({
        "message": "Status updated successfully.",
        "issue": issue,
    })))
}

// =============================================================================
// Officer
// =============================================================================

/// `GET /api/officer/issues`
pub async fn list_department(
    Authorized(user, ..): Authorized<OfficerOnly>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Issue>>> {
    let department = officer_department(&state, &user).await?;
    let issues = IssueRepository::new(state.pool())
        .list_by_department(department)
        .await
        .context("load department complaints")?;
    Ok(Json(issues))
}

/// Apply an officer action to an issue of the officer's own department.
///
/// The transition is checked against the status read here and written only
/// if that status still holds.
async fn act(
    state: &AppState,
    user: &CurrentUser,
    id: IssueId,
    action: OfficerAction,
) -> Result<Json<Issue>> {
    let department = officer_department(state, user).await?;
    let issues = IssueRepository::new(state.pool());

    let issue = issues
        .get(id)
        .await
        .context("load complaint")?
        .filter(|issue| issue.department == department)
        .ok_or_else(not_found)?;

    let next = action
        .apply(issue.status)
        .map_err(|e| AppError::Conflict(e.to_string()))?;

    let updated = issues
        .transition(id, department, issue.status, next, action.worker())
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => not_found(),
            other => AppError::Store {
                action: "update complaint",
                source: other,
            },
        })?;

    tracing::info!(
        issue_id = %id,
        from = issue.status.as_str(),
        to = next.as_str(),
        officer = %user.email,
        "Issue transitioned"
    );

    Ok(Json(updated))
}

/// `POST /api/officer/issues/{id}/start`
pub async fn start(
    Authorized(user, ..): Authorized<OfficerOnly>,
    State(state): State<AppState>,
    Path(id): Path<IssueId>,
) -> Result<Json<Issue>> {
    act(&state, &user, id, OfficerAction::Start).await
}

/// `POST /api/officer/issues/{id}/resolve`
pub async fn resolve(
    Authorized(user, ..): Authorized<OfficerOnly>,
    State(state): State<AppState>,
    Path(id): Path<IssueId>,
) -> Result<Json<Issue>> {
    act(&state, &user, id, OfficerAction::Resolve).await
}

/// `POST /api/officer/issues/{id}/assign`
pub async fn assign(
    Authorized(user, ..): Authorized<OfficerOnly>,
    State(state): State<AppState>,
    Path(id): Path<IssueId>,
    payload: std::result::Result<Json<AssignForm>, JsonRejection>,
) -> Result<Json<Issue>> {
    let Json(form) = payload?;
    act(&state, &user, id, OfficerAction::AssignWorker(form.worker)).await
}
