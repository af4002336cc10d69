//! Core types for Civic Desk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod department;
pub mod email;
pub mod id;
pub mod issue;
pub mod note;
pub mod role;
pub mod status;

pub use department::{Channel, Department, DepartmentParseError};
pub use email::{Email, EmailError};
pub use id::*;
pub use issue::{IssueDraft, IssueDraftError, IssueField, IssueForm};
pub use note::{NewNote, Note};
pub use role::{Role, RoleParseError};
pub use status::*;
