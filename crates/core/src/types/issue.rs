//! Validated input for a new citizen issue.

use core::fmt;

use serde::Deserialize;

use super::department::Department;

/// Form field of an [`IssueDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueField {
    Subject,
    Details,
    Area,
    Department,
}

impl IssueField {
    /// Maximum length in characters, if bounded.
    #[must_use]
    pub const fn max_len(self) -> Option<usize> {
        match self {
            Self::Subject => Some(20),
            Self::Details => Some(100),
            Self::Area => Some(40),
            Self::Department => None,
        }
    }
}

impl fmt::Display for IssueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Subject => "subject",
            Self::Details => "details",
            Self::Area => "area",
            Self::Department => "department",
        })
    }
}

/// Errors from [`IssueDraft::new`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IssueDraftError {
    #[error("All fields except image are required.")]
    Missing(IssueField),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: IssueField, max: usize },
    #[error("unknown department: {0}")]
    UnknownDepartment(String),
}

/// Raw complaint form as submitted by a citizen.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IssueForm {
    pub subject: String,
    pub details: String,
    pub area: String,
    pub department: String,
}

/// A complaint that passed validation and can be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    pub subject: String,
    pub details: String,
    pub area: String,
    pub department: Department,
}

impl IssueDraft {
    /// Validate a complaint form.
    ///
    /// All fields are trimmed and required.
    ///
    /// # Errors
    ///
    /// Returns the first missing or over-long field, or an unknown department.
    pub fn new(form: &IssueForm) -> Result<Self, IssueDraftError> {
        let subject = bounded(IssueField::Subject, &form.subject)?;
        let details = bounded(IssueField::Details, &form.details)?;
        let area = bounded(IssueField::Area, &form.area)?;

        let department = form.department.trim();
        if department.is_empty() {
            return Err(IssueDraftError::Missing(IssueField::Department));
        }
        let department = department
            .parse()
            .map_err(|_| IssueDraftError::UnknownDepartment(department.to_owned()))?;

        Ok(Self {
            subject,
            details,
            area,
            department,
        })
    }
}

fn bounded(field: IssueField, value: &str) -> Result<String, IssueDraftError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(IssueDraftError::Missing(field));
    }
    if let Some(max) = field.max_len()
        && value.chars().count() > max
    {
        return Err(IssueDraftError::TooLong { field, max });
    }
    Ok(value.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> IssueForm {
        IssueForm {
            subject: "Broken light".to_owned(),
            details: "Street light out since Monday".to_owned(),
            area: "Elm Street".to_owned(),
            department: "electricity".to_owned(),
        }
    }

    #[test]
    fn test_valid_draft() {
        let draft = IssueDraft::new(&form()).unwrap();
        assert_eq!(draft.subject, "Broken light");
        assert_eq!(draft.department, Department::Electricity);
    }

    #[test]
    fn test_trims_fields() {
        let mut f = form();
        f.area = "  Elm Street  ".to_owned();
        assert_eq!(IssueDraft::new(&f).unwrap().area, "Elm Street");
    }

    #[test]
    fn test_missing_field() {
        let mut f = form();
        f.details = "   ".to_owned();
        let err = IssueDraft::new(&f).unwrap_err();
        assert_eq!(err, IssueDraftError::Missing(IssueField::Details));
        assert_eq!(err.to_string(), "All fields except image are required.");
    }

    #[test]
    fn test_subject_too_long() {
        let mut f = form();
        f.subject = "x".repeat(21);
        assert_eq!(
            IssueDraft::new(&f).unwrap_err(),
            IssueDraftError::TooLong {
                field: IssueField::Subject,
                max: 20
            }
        );
    }

    #[test]
    fn test_limits_count_chars_not_bytes() {
        let mut f = form();
        f.subject = "é".repeat(20);
        assert!(IssueDraft::new(&f).is_ok());
    }

    #[test]
    fn test_unknown_department() {
        let mut f = form();
        f.department = "Fire".to_owned();
        assert!(matches!(
            IssueDraft::new(&f),
            Err(IssueDraftError::UnknownDepartment(_))
        ));
    }
}
