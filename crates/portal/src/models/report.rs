//! Department report domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use civic_core::{Department, Email, ReportId, ReportKind};

/// A file stored on the media host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    /// Full public id, folder included (`reports/sanitation/audit_1700000000000`).
    pub public_id: String,
    /// HTTPS delivery URL.
    pub secure_url: String,
    pub format: Option<String>,
    pub bytes: Option<i64>,
    pub version: Option<i64>,
}

impl MediaAsset {
    /// Folder part of the public id, empty for top-level assets.
    #[must_use]
    pub fn folder(&self) -> &str {
        self.public_id
            .rsplit_once('/')
            .map_or("", |(folder, _)| folder)
    }
}

/// How a report was produced, with the data specific to that path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportSource {
    /// Officer-written text; `content` holds the enhanced version.
    Manual { original_text: String },
    /// Uploaded PDF.
    Pdf {
        file_name: String,
        file_size: i64,
        media: MediaAsset,
    },
}

impl ReportSource {
    #[must_use]
    pub const fn kind(&self) -> ReportKind {
        match self {
            Self::Manual { .. } => ReportKind::Manual,
            Self::Pdf { .. } => ReportKind::Pdf,
        }
    }
}

/// A stored department report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub id: ReportId,
    pub department: Department,
    pub title: String,
    /// Report body; may be empty for PDFs that were not summarized.
    pub content: String,
    pub uploaded_by: Email,
    #[serde(flatten)]
    pub source: ReportSource,
    pub created_at: DateTime<Utc>,
}

impl Report {
    /// Uploaded media, for PDF reports.
    #[must_use]
    pub const fn media(&self) -> Option<&MediaAsset> {
        match &self.source {
            ReportSource::Pdf { media, .. } => Some(media),
            ReportSource::Manual { .. } => None,
        }
    }
}

/// Parameters for inserting a report.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub department: Department,
    pub title: String,
    pub content: String,
    pub uploaded_by: Email,
    pub source: ReportSource,
}

/// Title of a manual report filed on `date`.
#[must_use]
pub fn manual_report_title(date: DateTime<Utc>) -> String {
    format!("Manual Report - {}", date.format("%-m/%-d/%Y"))
}

/// Title of an uploaded PDF report.
#[must_use]
pub fn pdf_report_title(file_name: &str) -> String {
    format!("PDF Report: {file_name}")
}
