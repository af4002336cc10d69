//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use civic_core::{Email, Role, UserId};

/// An account in the local identity provider.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Normalized e-mail address.
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Role derived from the e-mail domain.
    #[must_use]
    pub fn role(&self) -> Role {
        self.email.role()
    }
}
