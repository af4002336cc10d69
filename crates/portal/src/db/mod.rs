//! Database operations for the portal `PostgreSQL` database.
//!
//! ## Tables (schema `portal`)
//!
//! - `user` / `user_password` - Local identity provider
//! - `officer` - Officer directory with department assignment
//! - `issue` - Citizen complaints
//! - `report` - Department reports (manual and PDF)
//! - `message` - Department / admin message board
//!
//! Sessions live in `tower_sessions.session`.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/portal/migrations/` and run via:
//! ```bash
//! cargo run -p civic-cli -- migrate
//! ```

pub mod issues;
pub mod messages;
pub mod officers;
pub mod reports;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use issues::IssueRepository;
pub use messages::MessageRepository;
pub use officers::OfficerRepository;
pub use reports::ReportRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map unique violations to `Conflict`, everything else to `Database`.
    pub(crate) fn from_insert(err: sqlx::Error, conflict: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict.to_owned());
        }
        Self::Database(err)
    }
}

/// Parse a stored enum column, reporting bad values as corruption.
pub(crate) fn parse_column<T>(column: &str, raw: &str) -> Result<T, RepositoryError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid {column} in database: {e}")))
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use civic_core::{Department, IssueStatus};

    use super::*;

    #[test]
    fn test_parse_column_ok() {
        let status: IssueStatus = parse_column("status", "in_progress").unwrap_or_default();
        assert_eq!(status, IssueStatus::InProgress);
    }

    #[test]
    fn test_parse_column_corruption() {
        let result = parse_column::<Department>("department", "fire");
        assert!(matches!(result, Err(RepositoryError::DataCorruption(msg)) if msg.contains("department")));
    }
}
