//! Officer directory management commands.
//!
//! # Usage
//!
//! ```bash
//! civic-cli officer add -e roads1@oi.com -n "Sam Lee" -d public_works
//! civic-cli officer assign -e roads1@oi.com -d transport
//! civic-cli officer list
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string for the portal

use civic_core::{Department, Email, Role};
use civic_portal::db::{OfficerRepository, RepositoryError};

use super::{CommandError, connect};

/// Parse an email that must belong to the officer domain.
fn officer_email(raw: &str) -> Result<Email, CommandError> {
    let email = Email::parse(raw).map_err(|_| CommandError::InvalidEmail(raw.to_owned()))?;
    if email.role() != Role::Officer {
        return Err(CommandError::NotOfficer(raw.to_owned()));
    }
    Ok(email)
}

/// Add an officer to the directory.
///
/// # Errors
///
/// Returns an error if the email is not an officer address, the department
/// is unknown, or the officer already exists.
pub async fn add(email: &str, name: &str, department: Option<&str>) -> Result<(), CommandError> {
    let email = officer_email(email)?;
    let department = department.map(str::parse::<Department>).transpose()?;

    let pool = connect().await?;
    let officer = OfficerRepository::new(&pool)
        .create(&email, name, department)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => CommandError::OfficerExists(email.to_string()),
            other => other.into(),
        })?;

    tracing::info!(
        id = %officer.id,
        email = %officer.email,
        department = ?officer.department.map(Department::label),
        "Officer created"
    );
    Ok(())
}

/// Move an officer to `department`.
///
/// # Errors
///
/// Returns an error if the department is unknown or no officer has this email.
pub async fn assign(email: &str, department: &str) -> Result<(), CommandError> {
    let email = officer_email(email)?;
    let department: Department = department.parse()?;

    let pool = connect().await?;
    let officer = OfficerRepository::new(&pool)
        .assign_by_email(&email, department)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => CommandError::OfficerNotFound(email.to_string()),
            other => other.into(),
        })?;

    tracing::info!(email = %officer.email, department = %department, "Officer assigned");
    Ok(())
}

/// Log every officer in the directory.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list() -> Result<(), CommandError> {
    let pool = connect().await?;
    let officers = OfficerRepository::new(&pool).list().await?;

    tracing::info!("{} officer(s)", officers.len());
    for officer in officers {
        let department = officer.department.map_or("unassigned", Department::label);
        tracing::info!("  {} <{}> - {}", officer.name, officer.email, department);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_officer_email_accepts_officer_domain() {
        let email = officer_email("Roads1@OI.com").unwrap();
        assert_eq!(email.as_str(), "roads1@oi.com");
    }

    #[test]
    fn test_officer_email_rejects_other_domains() {
        assert!(matches!(
            officer_email("someone@ui.com"),
            Err(CommandError::NotOfficer(_))
        ));
        assert!(matches!(
            officer_email("not-an-email"),
            Err(CommandError::InvalidEmail(_))
        ));
    }
}
