//! Officer directory repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use civic_core::{Department, Email, OfficerId};

use super::{RepositoryError, parse_column};
use crate::models::Officer;

#[derive(sqlx::FromRow)]
struct OfficerRow {
    id: i32,
    email: String,
    name: String,
    department: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OfficerRow> for Officer {
    type Error = RepositoryError;

    fn try_from(row: OfficerRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OfficerId::new(row.id),
            email: parse_column("email", &row.email)?,
            name: row.name,
            department: row
                .department
                .as_deref()
                .map(|d| parse_column("department", d))
                .transpose()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for the officer directory.
pub struct OfficerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OfficerRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All officers, by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Officer>, RepositoryError> {
        let rows = sqlx::query_as::<_, OfficerRow>(
            r"
            SELECT id, email, name, department, created_at, updated_at
            FROM portal.officer
            ORDER BY name, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Officer::try_from).collect()
    }

    /// Look up an officer by e-mail.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Officer>, RepositoryError> {
        let row = sqlx::query_as::<_, OfficerRow>(
            r"
            SELECT id, email, name, department, created_at, updated_at
            FROM portal.officer
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(Officer::try_from).transpose()
    }

    /// Department assigned to the officer with `email`, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn department_for(&self, email: &Email) -> Result<Option<Department>, RepositoryError> {
        Ok(self
            .get_by_email(email)
            .await?
            .and_then(|officer| officer.department))
    }

    /// Add an officer to the directory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the e-mail is already listed.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        department: Option<Department>,
    ) -> Result<Officer, RepositoryError> {
        let row = sqlx::query_as::<_, OfficerRow>(
            r"
            INSERT INTO portal.officer (email, name, department)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, department, created_at, updated_at
            ",
        )
        .bind(email.as_str())
        .bind(name)
        .bind(department.map(Department::slug))
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "officer already exists"))?;

        Officer::try_from(row)
    }

    /// Change an officer's department.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no officer has this id.
    pub async fn update_department(
        &self,
        id: OfficerId,
        department: Department,
    ) -> Result<Officer, RepositoryError> {
        let row = sqlx::query_as::<_, OfficerRow>(
            r"
            UPDATE portal.officer
            SET department = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, name, department, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(department.slug())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Officer::try_from(row)
    }

    /// Change the department of the officer with `email`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no officer has this e-mail.
    pub async fn assign_by_email(
        &self,
        email: &Email,
        department: Department,
    ) -> Result<Officer, RepositoryError> {
        let row = sqlx::query_as::<_, OfficerRow>(
            r"
            UPDATE portal.officer
            SET department = $2, updated_at = NOW()
            WHERE email = $1
            RETURNING id, email, name, department, created_at, updated_at
            ",
        )
        .bind(email.as_str())
        .bind(department.slug())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Officer::try_from(row)
    }
}
