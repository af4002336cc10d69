//! CLI subcommand implementations.

pub mod migrate;
pub mod officer;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;

/// Errors shared by commands that talk to the portal database.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository operation failed.
    #[error("{0}")]
    Repository(#[from] civic_portal::db::RepositoryError),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Email is not an officer address.
    #[error("Officer email must end with @oi.com: {0}")]
    NotOfficer(String),

    /// Unknown department.
    #[error(transparent)]
    Department(#[from] civic_core::DepartmentParseError),

    /// No officer with that email.
    #[error("No officer found with email: {0}")]
    OfficerNotFound(String),

    /// Officer already listed.
    #[error("Officer already exists with email: {0}")]
    OfficerExists(String),
}

/// Connect to the database named by `DATABASE_URL`.
pub async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("DATABASE_URL"))?;

    tracing::info!("Connecting to portal database...");
    Ok(civic_portal::db::create_pool(&database_url).await?)
}
