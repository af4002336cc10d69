//! Authentication route handlers.
//!
//! Signup, login, logout and the current-session lookup. Roles are derived
//! from the e-mail domain; signup screens only check that the address
//! belongs to the screen's domain.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use civic_core::{Email, Role, UserId};

use crate::error::{AppError, Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::middleware::{CurrentSession, RequiredRole, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthService, SIGNUP_SUCCESS_MESSAGE, Signup};
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// Page the user was sent away from by the route guard.
    pub from: Option<String>,
}

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// User as exposed to the client, role included.
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: UserId,
    pub email: Email,
    pub role: Role,
}

impl From<&CurrentUser> for SessionUser {
    fn from(user: &CurrentUser) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role(),
        }
    }
}

/// Current session state.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

/// Where to send a user after login: the guarded page they came from,
/// otherwise their dashboard.
fn post_login_redirect(from: Option<&str>, role: Role) -> String {
    from.filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .map(str::to_owned)
        .or_else(|| role.dashboard_path().map(str::to_owned))
        .unwrap_or_else(|| "/".to_owned())
}

/// `POST /auth/login`
#[tracing::instrument(skip_all, fields(email = tracing::field::Empty))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    payload: std::result::Result<Json<LoginForm>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(form) = payload?;
    tracing::Span::current().record("email", form.email.as_str());
    let auth = AuthService::new(state.pool());
    let (user, role) = auth
        .login(&form.email, &form.password)
        .await
        .map_err(AppError::Login)?;

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    add_breadcrumb("auth", "Logged in", Some(&[("role", role.as_str())]));
    tracing::info!(user_id = %user.id, role = %role, "User logged in");

    Ok(Json(serde_json::json!({
        "user": SessionUser::from(&current),
        "redirect": post_login_redirect(form.from.as_deref(), role),
    })))
}

/// `POST /auth/{role}/signup`
#[tracing::instrument(skip_all, fields(email = tracing::field::Empty, role = %R::ROLE))]
pub async fn signup<R: RequiredRole>(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SignupForm>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(form) = payload?;
    tracing::Span::current().record("email", form.email.as_str());
    let auth = AuthService::new(state.pool());
    let user = auth
        .signup(
            Signup {
                email: &form.email,
                password: &form.password,
                confirm_password: &form.confirm_password,
            },
            Some(R::ROLE),
        )
        .await
        .map_err(AppError::Signup)?;

    tracing::info!(user_id = %user.id, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": SIGNUP_SUCCESS_MESSAGE,
            "redirect": R::ROLE.post_signup_path(),
        })),
    ))
}

/// `POST /auth/logout`
pub async fn logout(session: Session) -> Result<impl IntoResponse> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Json(serde_json::json!({ "redirect": "/" })))
}

/// `GET /auth/session`
pub async fn current_session(CurrentSession(user): CurrentSession) -> Json<SessionView> {
    Json(SessionView {
        authenticated: user.is_some(),
        user: user.as_ref().map(SessionUser::from),
    })
}
