//! Business logic services for the portal.
//!
//! - `auth` - Password signup and login

pub mod auth;
