//! Signed-in user's profile.

use axum::{Json, extract::State};
use serde::Serialize;

use civic_core::{Department, Email, Role};

use crate::db::OfficerRepository;
use crate::error::{Result, StoreContext};
use crate::middleware::Signed;
use crate::state::AppState;

/// Profile view.
#[derive(Debug, Serialize)]
pub struct Profile {
    pub email: Email,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
}

/// `GET /api/profile`
pub async fn show(Signed(user): Signed, State(state): State<AppState>) -> Result<Json<Profile>> {
    let role = user.role();
    let officer = if role == Role::Officer {
        OfficerRepository::new(state.pool())
            .get_by_email(&user.email)
            .await
            .context("load profile")?
    } else {
        None
    };

    Ok(Json(Profile {
        email: user.email,
        role,
        name: officer.as_ref().map(|o| o.name.clone()),
        department: officer.and_then(|o| o.department),
    }))
}
