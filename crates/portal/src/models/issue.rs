//! Issue domain types and officer workflow.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use civic_core::{Department, Email, IssueId, IssueStatus};

/// A citizen complaint.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub id: IssueId,
    pub subject: String,
    pub details: String,
    pub area: String,
    pub department: Department,
    /// Citizen who filed the issue.
    pub user_email: Email,
    pub status: IssueStatus,
    /// Field worker assigned by an officer.
    pub assigned_worker: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Status change an officer can request on an issue of their department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfficerAction {
    /// Hand the issue to a named field worker.
    AssignWorker(String),
    /// Begin work.
    Start,
    /// Close the issue.
    Resolve,
}

/// Rejected officer transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Issue is already resolved.")]
    AlreadyResolved,
    #[error("Issue is already in progress.")]
    AlreadyInProgress,
    #[error("Worker name is required.")]
    MissingWorker,
}

impl OfficerAction {
    /// Status after applying this action to an issue in `current`.
    ///
    /// # Errors
    ///
    /// Resolved issues reject every action; starting work twice and assigning
    /// a blank worker name are rejected too.
    pub fn apply(&self, current: IssueStatus) -> Result<IssueStatus, TransitionError> {
        if current.is_terminal() {
            return Err(TransitionError::AlreadyResolved);
        }
        match self {
            Self::AssignWorker(worker) if worker.trim().is_empty() => {
                Err(TransitionError::MissingWorker)
            }
            Self::AssignWorker(_) => Ok(IssueStatus::Assigned),
            Self::Start if current == IssueStatus::InProgress => {
                Err(TransitionError::AlreadyInProgress)
            }
            Self::Start => Ok(IssueStatus::InProgress),
            Self::Resolve => Ok(IssueStatus::Resolved),
        }
    }

    /// Worker to record, if this action assigns one.
    #[must_use]
    pub fn worker(&self) -> Option<&str> {
        match self {
            Self::AssignWorker(worker) => Some(worker.trim()),
            Self::Start | Self::Resolve => None,
        }
    }
}
