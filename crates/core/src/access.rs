//! Route guard.
//!
//! Decides whether a request for a role-restricted path may proceed. The
//! decision depends only on the session user's e-mail, the role the route
//! requires and the requested path, so it can be evaluated anywhere (HTTP
//! extractor, CLI, tests) without side effects.

use serde::Serialize;

use crate::types::Role;

/// Outcome of [`guard`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RouteDecision {
    /// Render the requested route.
    Allow,
    /// No session: send the visitor to the home page.
    RedirectHome {
        /// Originally requested path, preserved for after login.
        from: String,
    },
    /// Signed in with the wrong role: send the user to their own login page.
    RedirectToLogin {
        /// Login path of the user's computed role.
        path: &'static str,
        /// Originally requested path, preserved for after login.
        from: String,
    },
}

impl RouteDecision {
    /// Returns `true` for [`RouteDecision::Allow`].
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Redirect target with the original path carried as a `from` query
    /// parameter, or `None` when the route is allowed.
    ///
    /// ```
    /// use civic_core::RouteDecision;
    ///
    /// let home = RouteDecision::RedirectHome { from: "/admin/dashboard".into() };
    /// assert_eq!(home.location().as_deref(), Some("/?from=%2Fadmin%2Fdashboard"));
    /// ```
    #[must_use]
    pub fn location(&self) -> Option<String> {
        match self {
            Self::Allow => None,
            Self::RedirectHome { from } => Some(with_from("/", from)),
            Self::RedirectToLogin { path, from } => Some(with_from(path, from)),
        }
    }
}

fn with_from(target: &str, from: &str) -> String {
    format!("{target}?from={}", urlencoding::encode(from))
}

/// Evaluate the route guard.
///
/// - no user: [`RouteDecision::RedirectHome`], whatever the required role
/// - user whose derived role differs from `required`:
///   [`RouteDecision::RedirectToLogin`] for the *user's* role
/// - otherwise: [`RouteDecision::Allow`]
#[must_use]
pub fn guard(user_email: Option<&str>, required: Option<Role>, requested: &str) -> RouteDecision {
    let Some(email) = user_email else {
        return RouteDecision::RedirectHome {
            from: requested.to_owned(),
        };
    };

    let role = Role::from_email(email);
    match required {
        Some(required) if required != role => RouteDecision::RedirectToLogin {
            path: role.login_path(),
            from: requested.to_owned(),
        },
        _ => RouteDecision::Allow,
    }
}
