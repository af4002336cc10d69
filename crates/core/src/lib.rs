//! Civic Desk Core - Shared types library.
//!
//! This crate provides common types used across all Civic Desk components:
//! - `portal` - Issue reporting server for citizens, officers and admins
//! - `notes` - Standalone note-list service
//! - `cli` - Command-line tools for migrations, seeding and officer management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Role derivation and the route guard live here so
//! every binary makes the same access decision.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, roles, departments, statuses and drafts
//! - [`access`] - Route guard deciding allow / redirect for a requested path

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod types;

pub use access::{RouteDecision, guard};
pub use types::*;
