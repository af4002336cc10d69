//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use civic_core::{Email, Role, UserId};

use super::user::User;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user. The
/// role is not stored; it is derived from the e-mail on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
}

impl CurrentUser {
    /// Role derived from the e-mail domain.
    #[must_use]
    pub fn role(&self) -> Role {
        self.email.role()
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_current_user_role() {
        let user = CurrentUser {
            id: UserId::new(1),
            email: Email::parse("ops@oi.com").unwrap(),
        };
        assert_eq!(user.role(), Role::Officer);
    }

    #[test]
    fn test_session_roundtrip_shape() {
        let user = CurrentUser {
            id: UserId::new(7),
            email: Email::parse("a@ad.com").unwrap(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 7, "email": "a@ad.com" }));
    }
}
