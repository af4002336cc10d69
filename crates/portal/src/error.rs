//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.
//! Every error body is a banner: `{"error": "<message>"}`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use civic_core::IssueDraftError;

use crate::ai::AiError;
use crate::db::RepositoryError;
use crate::media::MediaError;
use crate::services::auth::AuthError;

/// Message for officers without a department assignment.
pub const MISSING_DEPARTMENT: &str =
    "Department information not found. Please contact administrator to assign your department.";

/// Application-level error type for the portal.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Store operation failed while carrying out a user action.
    #[error("Failed to {action}: {source}")]
    Store {
        /// What the user asked for, e.g. `submit complaint`.
        action: &'static str,
        #[source]
        source: RepositoryError,
    },

    /// Signup failed.
    #[error("Failed to create account: {0}")]
    Signup(#[source] AuthError),

    /// Login failed.
    #[error("Failed to log in: {0}")]
    Login(#[source] AuthError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Complaint form failed validation.
    #[error("{0}")]
    InvalidIssue(#[from] IssueDraftError),

    /// Generative-text service failed.
    #[error("AI error: {0}")]
    Ai(#[from] AiError),

    /// Media host failed.
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Signed in, but the role has no access to this resource.
    #[error("{0}")]
    Forbidden(String),

    /// Request conflicts with current state.
    #[error("{0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Officer has no department assigned.
    #[must_use]
    pub fn missing_department() -> Self {
        Self::Conflict(MISSING_DEPARTMENT.to_owned())
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound)
            | Self::Store {
                source: RepositoryError::NotFound,
                ..
            }
            | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_))
            | Self::Store {
                source: RepositoryError::Conflict(_),
                ..
            }
            | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Store { .. } | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Signup(err) | Self::Login(err) => match err {
                AuthError::PasswordMismatch
                | AuthError::WeakPassword(_)
                | AuthError::WrongDomain(_)
                | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::InvalidDomain => StatusCode::FORBIDDEN,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::InvalidIssue(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Ai(AiError::RateLimited(_)) => StatusCode::TOO_MANY_REQUESTS,
            Self::Ai(_) | Self::Media(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Banner text shown to the user. Internal details are never exposed.
    fn message(&self) -> String {
        match self {
            Self::Database(RepositoryError::NotFound) => "Not found.".to_string(),
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
            Self::Store { action, source } => match source {
                RepositoryError::NotFound => format!("Failed to {action}: not found."),
                RepositoryError::Conflict(detail) => format!("Failed to {action}: {detail}."),
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    format!("Failed to {action}.")
                }
            },
            Self::Signup(err) => format!("Failed to create account: {}", auth_message(err)),
            Self::Login(err) => format!("Failed to log in: {}", auth_message(err)),
            Self::Ai(AiError::RateLimited(secs)) => {
                format!("The analysis service is busy. Please retry in {secs} seconds.")
            }
            Self::Ai(_) => "Failed to generate analysis. Please try again.".to_string(),
            Self::Media(MediaError::Upload(message)) => {
                format!("Failed to upload file: {message}")
            }
            Self::Media(_) => "Failed to upload file. Please try again.".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Attach the user-facing action to a repository failure.
pub trait StoreContext<T> {
    /// Turn a `RepositoryError` into a "Failed to <action>" banner.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` when `self` is an error.
    fn context(self, action: &'static str) -> Result<T>;
}

impl<T> StoreContext<T> for std::result::Result<T, RepositoryError> {
    fn context(self, action: &'static str) -> Result<T> {
        self.map_err(|source| AppError::Store { action, source })
    }
}

fn auth_message(err: &AuthError) -> String {
    match err {
        AuthError::Repository(_) | AuthError::PasswordHash => "internal error".to_string(),
        AuthError::InvalidEmail(_) => "invalid email address".to_string(),
        other => other.to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("issues", "Status updated", Some(&[("issue_id", "42")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use civic_core::IssueField;

    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_signup_banner_prefix() {
        let (status, body) = body_of(AppError::Signup(AuthError::PasswordMismatch)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Failed to create account: Passwords do not match");
    }

    #[tokio::test]
    async fn test_login_banner_prefix() {
        let (status, body) = body_of(AppError::Login(AuthError::InvalidDomain)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Failed to log in: Invalid email domain");
    }

    #[tokio::test]
    async fn test_internal_details_hidden() {
        let (status, body) =
            body_of(AppError::Login(AuthError::Repository(RepositoryError::NotFound))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to log in: internal error");

        let (_, body) = body_of(AppError::Internal("pool exhausted".to_string())).await;
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_store_failure_banner_names_action() {
        let failed: std::result::Result<(), RepositoryError> =
            Err(RepositoryError::DataCorruption("bad status".to_string()));
        let (status, body) = body_of(failed.context("submit complaint").unwrap_err()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to submit complaint.");
    }

    #[tokio::test]
    async fn test_store_conflict_keeps_detail() {
        let failed: std::result::Result<(), RepositoryError> =
            Err(RepositoryError::Conflict("officer already exists".to_string()));
        let (status, body) = body_of(failed.context("update department").unwrap_err()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Failed to update department: officer already exists.");
    }

    #[tokio::test]
    async fn test_stale_transition_is_conflict() {
        let err = AppError::Store {
            action: "update complaint",
            source: RepositoryError::Conflict(crate::db::issues::STALE_TRANSITION.to_string()),
        };
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body["error"],
            "Failed to update complaint: Issue was updated by someone else. Please reload."
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_banner() {
        use axum::extract::FromRequest;
        use axum::http::{Request, header};

        let request = Request::builder()
            .method("POST")
            .uri("/api/messages")
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from("{\"text\":"))
            .unwrap();
        let rejection = Json::<serde_json::Value>::from_request(request, &())
            .await
            .unwrap_err();

        let (status, body) = body_of(AppError::from(rejection)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_missing_department_is_conflict() {
        let (status, body) = body_of(AppError::missing_department()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], MISSING_DEPARTMENT);
    }

    #[tokio::test]
    async fn test_invalid_issue_message() {
        let (status, body) =
            body_of(AppError::InvalidIssue(IssueDraftError::Missing(IssueField::Subject))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "All fields except image are required.");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::NotFound("Issue not found.".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Database(RepositoryError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Ai(AiError::RateLimited(5)).status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::Media(MediaError::Upload("x".to_string())).status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
