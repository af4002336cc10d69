//! Issue repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use civic_core::{Department, Email, IssueDraft, IssueId, IssueStatus};

use super::{RepositoryError, parse_column};
use crate::models::Issue;

const ISSUE_COLUMNS: &str = "id, subject, details, area, department, user_email, status, \
                             assigned_worker, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct IssueRow {
    id: i32,
    subject: String,
    details: String,
    area: String,
    department: String,
    user_email: String,
    status: String,
    assigned_worker: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<IssueRow> for Issue {
    type Error = RepositoryError;

    fn try_from(row: IssueRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: IssueId::new(row.id),
            subject: row.subject,
            details: row.details,
            area: row.area,
            department: parse_column("department", &row.department)?,
            user_email: parse_column("user_email", &row.user_email)?,
            status: parse_column("status", &row.status)?,
            assigned_worker: row.assigned_worker,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Conflict detail when another change landed between read and update.
pub const STALE_TRANSITION: &str = "Issue was updated by someone else. Please reload";

/// Issue counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct StatusCounts {
    pub pending: i64,
    pub assigned: i64,
    pub in_progress: i64,
    pub resolved: i64,
}

impl StatusCounts {
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.pending + self.assigned + self.in_progress + self.resolved
    }

    fn add(&mut self, status: IssueStatus, count: i64) {
        let slot = match status {
            IssueStatus::Pending => &mut self.pending,
            IssueStatus::Assigned => &mut self.assigned,
            IssueStatus::InProgress => &mut self.in_progress,
            IssueStatus::Resolved => &mut self.resolved,
        };
        *slot += count;
    }
}

/// Which issues a dashboard counts.
#[derive(Debug, Clone)]
pub enum IssueScope<'e> {
    All,
    Department(Department),
    Reporter(&'e Email),
}

/// Repository for citizen issues.
pub struct IssueRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> IssueRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a validated complaint as `pending`, stamped with the server time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        draft: &IssueDraft,
        reporter: &Email,
    ) -> Result<Issue, RepositoryError> {
        let row = sqlx::query_as::<_, IssueRow>(&format!(
            r"
            INSERT INTO portal.issue (subject, details, area, department, user_email, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ISSUE_COLUMNS}
            "
        ))
        .bind(&draft.subject)
        .bind(&draft.details)
        .bind(&draft.area)
        .bind(draft.department.slug())
        .bind(reporter.as_str())
        .bind(IssueStatus::Pending.as_str())
        .fetch_one(self.pool)
        .await?;

        Issue::try_from(row)
    }

    /// Every issue, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Issue>, RepositoryError> {
        let rows = sqlx::query_as::<_, IssueRow>(&format!(
            "SELECT {ISSUE_COLUMNS} FROM portal.issue ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Issue::try_from).collect()
    }

    /// Issues filed by `reporter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_reporter(&self, reporter: &Email) -> Result<Vec<Issue>, RepositoryError> {
        let rows = sqlx::query_as::<_, IssueRow>(&format!(
            "SELECT {ISSUE_COLUMNS} FROM portal.issue WHERE user_email = $1 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(reporter.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Issue::try_from).collect()
    }

    /// Issues routed to `department`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_department(
        &self,
        department: Department,
    ) -> Result<Vec<Issue>, RepositoryError> {
        let rows = sqlx::query_as::<_, IssueRow>(&format!(
            "SELECT {ISSUE_COLUMNS} FROM portal.issue WHERE department = $1 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(department.slug())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Issue::try_from).collect()
    }

    /// Get one issue.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: IssueId) -> Result<Option<Issue>, RepositoryError> {
        let row = sqlx::query_as::<_, IssueRow>(&format!(
            "SELECT {ISSUE_COLUMNS} FROM portal.issue WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Issue::try_from).transpose()
    }

    /// Overwrite the status, leaving every other field untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the issue does not exist.
    pub async fn update_status(
        &self,
        id: IssueId,
        status: IssueStatus,
    ) -> Result<Issue, RepositoryError> {
        let row = sqlx::query_as::<_, IssueRow>(&format!(
            "UPDATE portal.issue SET status = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {ISSUE_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Issue::try_from(row)
    }

    /// Move an issue of `department` from `expected` to `next`, recording
    /// `worker` when given.
    ///
    /// The status and department are checked in the same statement, so an
    /// update racing another officer's change matches no row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no issue with this id belongs to
    /// `department`, and `RepositoryError::Conflict` if its status is no
    /// longer `expected`.
    pub async fn transition(
        &self,
        id: IssueId,
        department: Department,
        expected: IssueStatus,
        next: IssueStatus,
        worker: Option<&str>,
    ) -> Result<Issue, RepositoryError> {
        let row = sqlx::query_as::<_, IssueRow>(&format!(
            "UPDATE portal.issue \
             SET status = $4, assigned_worker = COALESCE($5, assigned_worker), updated_at = NOW() \
             WHERE id = $1 AND department = $2 AND status = $3 \
             RETURNING {ISSUE_COLUMNS}"
        ))
        .bind(id)
        .bind(department.slug())
        .bind(expected.as_str())
        .bind(next.as_str())
        .bind(worker)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Issue::try_from(row),
            None => match self.get(id).await? {
                Some(issue) if issue.department == department => {
                    Err(RepositoryError::Conflict(STALE_TRANSITION.to_owned()))
                }
                _ => Err(RepositoryError::NotFound),
            },
        }
    }

    /// Count issues per status within `scope`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_status(
        &self,
        scope: IssueScope<'_>,
    ) -> Result<StatusCounts, RepositoryError> {
        let rows: Vec<(String, i64)> = match scope {
            IssueScope::All => {
                sqlx::query_as("SELECT status, COUNT(*) FROM portal.issue GROUP BY status")
                    .fetch_all(self.pool)
                    .await?
            }
            IssueScope::Department(department) => {
                sqlx::query_as(
                    "SELECT status, COUNT(*) FROM portal.issue WHERE department = $1 GROUP BY status",
                )
                .bind(department.slug())
                .fetch_all(self.pool)
                .await?
            }
            IssueScope::Reporter(email) => {
                sqlx::query_as(
                    "SELECT status, COUNT(*) FROM portal.issue WHERE user_email = $1 GROUP BY status",
                )
                .bind(email.as_str())
                .fetch_all(self.pool)
                .await?
            }
        };

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            counts.add(parse_column("status", &status)?, count);
        }
        Ok(counts)
    }
}
