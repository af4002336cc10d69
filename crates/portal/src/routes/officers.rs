//! Officer directory administration.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::Deserialize;

use civic_core::{Department, OfficerId};

use crate::db::{OfficerRepository, RepositoryError};
use crate::error::{AppError, Result, StoreContext, add_breadcrumb};
use crate::middleware::{AdminOnly, Authorized};
use crate::models::Officer;
use crate::state::AppState;

/// Body of `PATCH /api/admin/officers/{id}`.
#[derive(Debug, Deserialize)]
pub struct DepartmentForm {
    pub department: String,
}

/// `GET /api/admin/officers`
pub async fn list(
    _: Authorized<AdminOnly>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Officer>>> {
    let officers = OfficerRepository::new(state.pool())
        .list()
        .await
        .context("load officers")?;
    Ok(Json(officers))
}

/// `PATCH /api/admin/officers/{id}`
pub async fn assign_department(
    _: Authorized<AdminOnly>,
    State(state): State<AppState>,
    Path(id): Path<OfficerId>,
    payload: std::result::Result<Json<DepartmentForm>, JsonRejection>,
) -> Result<Json<Officer>> {
    let Json(form) = payload?;
    let department: Department = form
        .department
        .parse()
        .map_err(|e: civic_core::DepartmentParseError| AppError::BadRequest(e.to_string()))?;

    let officer = OfficerRepository::new(state.pool())
        .update_department(id, department)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Officer not found.".to_owned()),
            other => AppError::Store {
                action: "update department",
                source: other,
            },
        })?;

    add_breadcrumb(
        "officers",
        "Department assigned",
        Some(&[("officer", officer.email.as_str()), ("department", department.slug())]),
    );
    tracing::info!(officer_id = %id, department = %department, "Officer department assigned");

    Ok(Json(officer))
}
