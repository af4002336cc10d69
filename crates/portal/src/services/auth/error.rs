//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during signup and login.
///
/// The display strings are shown to the user behind a
/// "Failed to create account: " or "Failed to log in: " prefix.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Password shorter than the minimum length.
    #[error("Password must be at least {0} characters")]
    WeakPassword(usize),

    /// Role-specific signup with an address from another domain.
    #[error("Email must end with @{0}")]
    WrongDomain(&'static str),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] civic_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Credentials are valid but the domain maps to no role.
    #[error("Invalid email domain")]
    InvalidDomain,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
