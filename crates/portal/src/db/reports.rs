//! Department report repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use civic_core::{Department, ReportId, ReportKind};

use super::{RepositoryError, parse_column};
use crate::models::{MediaAsset, NewReport, Report, ReportSource};

const REPORT_COLUMNS: &str = "id, department, kind, title, content, original_text, uploaded_by, \
                              file_name, file_size, media_public_id, media_url, media_format, \
                              media_version, created_at";

#[derive(sqlx::FromRow)]
struct ReportRow {
    id: i32,
    department: String,
    kind: String,
    title: String,
    content: String,
    original_text: Option<String>,
    uploaded_by: String,
    file_name: Option<String>,
    file_size: Option<i64>,
    media_public_id: Option<String>,
    media_url: Option<String>,
    media_format: Option<String>,
    media_version: Option<i64>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReportRow> for Report {
    type Error = RepositoryError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        let kind: ReportKind = parse_column("kind", &row.kind)?;
        let source = match kind {
            ReportKind::Manual => ReportSource::Manual {
                original_text: row.original_text.unwrap_or_default(),
            },
            ReportKind::Pdf => {
                let (Some(file_name), Some(public_id), Some(secure_url)) =
                    (row.file_name, row.media_public_id, row.media_url)
                else {
                    return Err(RepositoryError::DataCorruption(format!(
                        "pdf report {} is missing media columns",
                        row.id
                    )));
                };
                ReportSource::Pdf {
                    file_name,
                    file_size: row.file_size.unwrap_or_default(),
                    media: MediaAsset {
                        public_id,
                        secure_url,
                        format: row.media_format,
                        bytes: row.file_size,
                        version: row.media_version,
                    },
                }
            }
        };

        Ok(Self {
            id: ReportId::new(row.id),
            department: parse_column("department", &row.department)?,
            title: row.title,
            content: row.content,
            uploaded_by: parse_column("uploaded_by", &row.uploaded_by)?,
            source,
            created_at: row.created_at,
        })
    }
}

/// Repository for department reports.
pub struct ReportRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a report stamped with the server time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, report: &NewReport) -> Result<Report, RepositoryError> {
        let (original_text, file_name, file_size, media) = match &report.source {
            ReportSource::Manual { original_text } => (Some(original_text.as_str()), None, None, None),
            ReportSource::Pdf {
                file_name,
                file_size,
                media,
            } => (None, Some(file_name.as_str()), Some(*file_size), Some(media)),
        };

        let row = sqlx::query_as::<_, ReportRow>(&format!(
            r"
            INSERT INTO portal.report (
                department, kind, title, content, original_text, uploaded_by,
                file_name, file_size, media_public_id, media_url, media_format, media_version
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {REPORT_COLUMNS}
            "
        ))
        .bind(report.department.slug())
        .bind(report.source.kind().as_str())
        .bind(&report.title)
        .bind(&report.content)
        .bind(original_text)
        .bind(report.uploaded_by.as_str())
        .bind(file_name)
        .bind(file_size)
        .bind(media.map(|m| m.public_id.as_str()))
        .bind(media.map(|m| m.secure_url.as_str()))
        .bind(media.and_then(|m| m.format.as_deref()))
        .bind(media.and_then(|m| m.version))
        .fetch_one(self.pool)
        .await?;

        Report::try_from(row)
    }

    /// Reports of `department`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_department(
        &self,
        department: Department,
    ) -> Result<Vec<Report>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReportRow>(&format!(
            "SELECT {REPORT_COLUMNS} FROM portal.report WHERE department = $1 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(department.slug())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Report::try_from).collect()
    }

    /// Get a report, scoped to `department`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_in_department(
        &self,
        id: ReportId,
        department: Department,
    ) -> Result<Option<Report>, RepositoryError> {
        let row = sqlx::query_as::<_, ReportRow>(&format!(
            "SELECT {REPORT_COLUMNS} FROM portal.report WHERE id = $1 AND department = $2"
        ))
        .bind(id)
        .bind(department.slug())
        .fetch_optional(self.pool)
        .await?;

        row.map(Report::try_from).transpose()
    }
}
