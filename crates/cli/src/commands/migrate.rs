//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! civic-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string for the portal
//!
//! Migration files live in `crates/portal/migrations/`, session table included.

use super::{CommandError, connect};

/// Run portal database migrations.
///
/// # Errors
///
/// Returns an error if the connection fails or a migration cannot be applied.
pub async fn portal() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running portal migrations...");
    sqlx::migrate!("../portal/migrations").run(&pool).await?;

    tracing::info!("Portal migrations complete!");
    Ok(())
}
