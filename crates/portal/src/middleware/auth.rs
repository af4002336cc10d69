//! Authentication extractors.
//!
//! Every role-restricted handler takes one of these extractors instead of
//! checking the session itself. The decision is made by
//! [`civic_core::guard`], so pages and API calls agree on who may enter.

use std::marker::PhantomData;

use axum::{
    Json,
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use tower_sessions::Session;

use civic_core::{Role, RouteDecision, guard};

use crate::models::{CurrentUser, session_keys};

/// A role that can be required by [`Authorized`].
pub trait RequiredRole: Send + Sync + 'static {
    /// The role a user must hold.
    const ROLE: Role;
}

/// Marker for admin-only routes.
pub struct AdminOnly;

/// Marker for officer-only routes.
pub struct OfficerOnly;

/// Marker for citizen-only routes.
pub struct CitizenOnly;

impl RequiredRole for AdminOnly {
    const ROLE: Role = Role::Admin;
}

impl RequiredRole for OfficerOnly {
    const ROLE: Role = Role::Officer;
}

impl RequiredRole for CitizenOnly {
    const ROLE: Role = Role::Citizen;
}

/// Extractor that requires a user whose derived role is `R::ROLE`.
///
/// # Example
///
/// ```rust,ignore
/// async fn admin_handler(Authorized(user, ..): Authorized<AdminOnly>) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct Authorized<R: RequiredRole>(pub CurrentUser, pub PhantomData<R>);

impl<R: RequiredRole> Authorized<R> {
    /// The signed-in user.
    #[must_use]
    pub const fn user(&self) -> &CurrentUser {
        &self.0
    }
}

/// Extractor that requires any signed-in user.
pub struct Signed(pub CurrentUser);

/// Extractor that optionally gets the current user. Never rejects.
pub struct CurrentSession(pub Option<CurrentUser>);

/// Error returned when the route guard does not allow the request.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to the guard's target (page requests).
    Redirect(String),
    /// No session (API requests).
    Unauthorized { redirect: String },
    /// Signed in with another role (API requests).
    Forbidden { redirect: String },
}

impl AuthRejection {
    fn from_decision(decision: &RouteDecision, is_api: bool) -> Self {
        let location = decision.location().unwrap_or_else(|| "/".to_owned());
        match (decision, is_api) {
            (_, false) => Self::Redirect(location),
            (RouteDecision::RedirectToLogin { .. }, true) => Self::Forbidden { redirect: location },
            (_, true) => Self::Unauthorized { redirect: location },
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect(location) => Redirect::to(&location).into_response(),
            Self::Unauthorized { redirect } => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Please log in to continue.", "redirect": redirect })),
            )
                .into_response(),
            Self::Forbidden { redirect } => (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "You do not have access to this page.", "redirect": redirect })),
            )
                .into_response(),
        }
    }
}

/// Path as the client requested it, before any router nesting.
fn requested_path(parts: &Parts) -> String {
    parts
        .extensions
        .get::<OriginalUri>()
        .map_or_else(|| parts.uri.path().to_owned(), |uri| uri.path().to_owned())
}

async fn session_user(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Run the route guard for the request and return the user on `Allow`.
async fn authorize(parts: &Parts, required: Option<Role>) -> Result<CurrentUser, AuthRejection> {
    let path = requested_path(parts);
    let user = session_user(parts).await;

    let decision = guard(user.as_ref().map(|u| u.email.as_str()), required, &path);
    match (decision, user) {
        (RouteDecision::Allow, Some(user)) => Ok(user),
        (decision, _) => {
            tracing::debug!(path = %path, ?decision, "Route guard rejected request");
            Err(AuthRejection::from_decision(
                &decision,
                path.starts_with("/api/"),
            ))
        }
    }
}

impl<S, R> FromRequestParts<S> for Authorized<R>
where
    S: Send + Sync,
    R: RequiredRole,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authorize(parts, Some(R::ROLE)).await?;
        Ok(Self(user, PhantomData))
    }
}

impl<S> FromRequestParts<S> for Signed
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authorize(parts, None).await?;
        Ok(Self(user))
    }
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_user(parts).await))
    }
}

/// Helper to set the current user in the session.
///
/// The session id is cycled first so a login never reuses an anonymous id.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to end the session (logout).
///
/// # Errors
///
/// Returns an error if the session store cannot be updated.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    session.flush().await
}
