//! Domain models for the portal.
//!
//! These are validated domain objects, separate from the database row types
//! in [`crate::db`]. All of them serialize to the JSON shapes the API returns.

pub mod issue;
pub mod message;
pub mod officer;
pub mod report;
pub mod session;
pub mod user;

pub use issue::{Issue, OfficerAction};
pub use message::Message;
pub use officer::Officer;
pub use report::{MediaAsset, NewReport, Report, ReportSource};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
