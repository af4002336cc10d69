//! User roles derived from the e-mail domain.
//!
//! A user's role is never stored or chosen: it is a pure function of the
//! domain part of their e-mail address.
//!
//! | domain   | role      |
//! |----------|-----------|
//! | `ad.com` | admin     |
//! | `oi.com` | officer   |
//! | `ui.com` | citizen   |
//! | other    | unknown   |

use core::fmt;

use serde::{Deserialize, Serialize};

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Municipal administrator (`@ad.com`).
    Admin,
    /// Department officer (`@oi.com`).
    Officer,
    /// Resident filing complaints (`@ui.com`).
    Citizen,
    /// Any other domain, or an address without `@`.
    Unknown,
}

/// Error returned when parsing a [`Role`] from a string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct RoleParseError(pub String);

impl Role {
    /// Roles that can sign up and log in.
    pub const KNOWN: [Self; 3] = [Self::Admin, Self::Officer, Self::Citizen];

    /// Derive the role from an e-mail address.
    ///
    /// Only the segment between the first and second `@` is considered.
    /// Never fails: malformed input is [`Role::Unknown`].
    ///
    /// ```
    /// use civic_core::Role;
    ///
    /// assert_eq!(Role::from_email("a@ad.com"), Role::Admin);
    /// assert_eq!(Role::from_email("a@oi.com"), Role::Officer);
    /// assert_eq!(Role::from_email("a@ui.com"), Role::Citizen);
    /// assert_eq!(Role::from_email("a@x.com"), Role::Unknown);
    /// assert_eq!(Role::from_email("noat"), Role::Unknown);
    /// ```
    #[must_use]
    pub fn from_email(email: &str) -> Self {
        match email.split('@').nth(1) {
            Some("ad.com") => Self::Admin,
            Some("oi.com") => Self::Officer,
            Some("ui.com") => Self::Citizen,
            _ => Self::Unknown,
        }
    }

    /// E-mail domain that maps to this role.
    #[must_use]
    pub const fn domain(self) -> Option<&'static str> {
        match self {
            Self::Admin => Some("ad.com"),
            Self::Officer => Some("oi.com"),
            Self::Citizen => Some("ui.com"),
            Self::Unknown => None,
        }
    }

    /// Login screen for this role.
    ///
    /// Unknown users are sent to the citizen login.
    #[must_use]
    pub const fn login_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin/login",
            Self::Officer => "/officer/login",
            Self::Citizen | Self::Unknown => "/citizen/login",
        }
    }

    /// Signup screen for this role.
    #[must_use]
    pub const fn signup_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin/signup",
            Self::Officer => "/officer/signup",
            Self::Citizen | Self::Unknown => "/citizen/signup",
        }
    }

    /// Landing page after a successful login.
    #[must_use]
    pub const fn dashboard_path(self) -> Option<&'static str> {
        match self {
            Self::Admin => Some("/admin/dashboard"),
            Self::Officer => Some("/officer/dashboard"),
            Self::Citizen => Some("/citizen/dashboard"),
            Self::Unknown => None,
        }
    }

    /// Where a freshly signed-up user is sent to log in.
    #[must_use]
    pub const fn post_signup_path(self) -> &'static str {
        match self {
            Self::Unknown => "/",
            known => known.login_path(),
        }
    }

    /// Lowercase name used in paths and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Officer => "officer",
            Self::Citizen => "citizen",
            Self::Unknown => "unknown",
        }
    }

    /// Whether an address satisfies this role's signup domain.
    ///
    /// Agrees with [`Role::from_email`], so an accepted address always
    /// derives this role.
    #[must_use]
    pub fn accepts_email(self, email: &str) -> bool {
        self != Self::Unknown && Self::from_email(email) == self
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "officer" => Ok(Self::Officer),
            "citizen" => Ok(Self::Citizen),
            "unknown" => Ok(Self::Unknown),
            _ => Err(RoleParseError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_email_known_domains() {
        assert_eq!(Role::from_email("a@ad.com"), Role::Admin);
        assert_eq!(Role::from_email("a@oi.com"), Role::Officer);
        assert_eq!(Role::from_email("a@ui.com"), Role::Citizen);
    }

    #[test]
    fn test_from_email_unknown() {
        assert_eq!(Role::from_email("a@x.com"), Role::Unknown);
        assert_eq!(Role::from_email("noat"), Role::Unknown);
        assert_eq!(Role::from_email(""), Role::Unknown);
        assert_eq!(Role::from_email("a@"), Role::Unknown);
    }

    #[test]
    fn test_from_email_is_exact_match() {
        assert_eq!(Role::from_email("a@AD.COM"), Role::Unknown);
        assert_eq!(Role::from_email("a@sub.ad.com"), Role::Unknown);
        assert_eq!(Role::from_email("a@ad.com.evil"), Role::Unknown);
    }

    #[test]
    fn test_from_email_uses_second_segment() {
        assert_eq!(Role::from_email("a@ad.com@ui.com"), Role::Admin);
        assert_eq!(Role::from_email("@oi.com"), Role::Officer);
    }

    #[test]
    fn test_login_paths() {
        assert_eq!(Role::Admin.login_path(), "/admin/login");
        assert_eq!(Role::Officer.login_path(), "/officer/login");
        assert_eq!(Role::Citizen.login_path(), "/citizen/login");
        assert_eq!(Role::Unknown.login_path(), "/citizen/login");
    }

    #[test]
    fn test_dashboard_paths() {
        assert_eq!(Role::Admin.dashboard_path(), Some("/admin/dashboard"));
        assert_eq!(Role::Officer.dashboard_path(), Some("/officer/dashboard"));
        assert_eq!(Role::Citizen.dashboard_path(), Some("/citizen/dashboard"));
        assert_eq!(Role::Unknown.dashboard_path(), None);
    }

    #[test]
    fn test_post_signup_path() {
        assert_eq!(Role::Officer.post_signup_path(), "/officer/login");
        assert_eq!(Role::Unknown.post_signup_path(), "/");
    }

    #[test]
    fn test_accepts_email() {
        assert!(Role::Admin.accepts_email("boss@ad.com"));
        assert!(!Role::Admin.accepts_email("boss@ui.com"));
        assert!(!Role::Unknown.accepts_email("boss@x.com"));
        assert!(!Role::Admin.accepts_email("x@ui.com@ad.com"));
        assert!(Role::Citizen.accepts_email("x@ui.com@ad.com"));
    }

    #[test]
    fn test_roundtrip_str() {
        for role in [Role::Admin, Role::Officer, Role::Citizen, Role::Unknown] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert!("root".parse::<Role>().is_err());
    }
}
