//! Authentication service.
//!
//! Password signup and login against the local identity store. A user's
//! role is never stored; it is derived from the e-mail domain on every
//! login.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use civic_core::{Email, Role};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Message shown on the login screen after a successful signup.
pub const SIGNUP_SUCCESS_MESSAGE: &str = "Account created successfully! Please log in.";

/// Signup form contents.
#[derive(Debug, Clone, Copy)]
pub struct Signup<'f> {
    pub email: &'f str,
    pub password: &'f str,
    pub confirm_password: &'f str,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new account.
    ///
    /// `required` is the role of the signup screen used; its domain is
    /// enforced. The new user is not logged in.
    ///
    /// # Errors
    ///
    /// Returns the first failing check, in order: `PasswordMismatch`,
    /// `WeakPassword`, `WrongDomain`, `InvalidEmail`, then
    /// `UserAlreadyExists` if the e-mail is taken.
    pub async fn signup(&self, form: Signup<'_>, required: Option<Role>) -> Result<User, AuthError> {
        validate_signup(form, required)?;

        let email = Email::parse(form.email)?;
        let password_hash = hash_password(form.password)?;

        let user = self
            .users
            .create_with_password(&email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// Returns the user and the role derived from their address.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::InvalidDomain` if the address maps to no role.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, Role), AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        match user.role() {
            Role::Unknown => Err(AuthError::InvalidDomain),
            role => Ok((user, role)),
        }
    }
}

/// Check the form fields that need no database access.
fn validate_signup(form: Signup<'_>, required: Option<Role>) -> Result<(), AuthError> {
    if form.password != form.confirm_password {
        return Err(AuthError::PasswordMismatch);
    }

    if form.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(MIN_PASSWORD_LENGTH));
    }

    if let Some(role) = required
        && let Some(domain) = role.domain()
        && !role.accepts_email(&form.email.trim().to_lowercase())
    {
        return Err(AuthError::WrongDomain(domain));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use civic_core::EmailError;

    use super::*;

    fn form<'f>(email: &'f str, password: &'f str, confirm: &'f str) -> Signup<'f> {
        Signup {
            email,
            password,
            confirm_password: confirm,
        }
    }

    #[test]
    fn test_signup_password_mismatch_checked_first() {
        let err = validate_signup(form("x@ui.com", "abc", "abd"), Some(Role::Citizen)).unwrap_err();
        assert!(matches!(err, AuthError::PasswordMismatch));
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn test_signup_short_password() {
        let err = validate_signup(form("x@ui.com", "abc", "abc"), Some(Role::Citizen)).unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters");
    }

    #[test]
    fn test_signup_wrong_domain() {
        let err =
            validate_signup(form("x@ui.com", "secret1", "secret1"), Some(Role::Admin)).unwrap_err();
        assert_eq!(err.to_string(), "Email must end with @ad.com");
    }

    #[test]
    fn test_signup_domain_check_ignores_case() {
        assert!(validate_signup(form("Boss@AD.com", "secret1", "secret1"), Some(Role::Admin)).is_ok());
    }

    #[test]
    fn test_signup_rejects_address_with_second_domain() {
        let nested = form("x@ui.com@ad.com", "secret1", "secret1");
        let err = validate_signup(nested, Some(Role::Admin)).unwrap_err();
        assert!(matches!(err, AuthError::WrongDomain("ad.com")));

        let err = AuthError::from(Email::parse(nested.email).unwrap_err());
        assert!(matches!(err, AuthError::InvalidEmail(EmailError::MultipleAtSymbols)));
    }

    #[test]
    fn test_signup_without_role_accepts_any_domain() {
        assert!(validate_signup(form("x@example.com", "secret1", "secret1"), None).is_ok());
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password("secret1", &hash).is_ok());
        assert!(matches!(
            verify_password("secret2", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("secret1", "not-a-hash"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
