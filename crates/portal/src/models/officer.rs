//! Officer directory types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use civic_core::{Department, Email, OfficerId};

/// An officer known to the admins, with an optional department assignment.
#[derive(Debug, Clone, Serialize)]
pub struct Officer {
    pub id: OfficerId,
    pub email: Email,
    pub name: String,
    /// `None` until an admin assigns a department.
    pub department: Option<Department>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
