//! Domain service for authentication and user management.
//!
//! Handles login, self-service registration, password changes and the
//! admin-only account operations.

use crate::domain::{Role, UserId};
use crate::models::User;
use crate::services::policy::{AccessDenied, Actor};
use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Old password is incorrect")]
    IncorrectPassword,

    #[error("You cannot delete your own account")]
    SelfDeletion,

    #[error("Forbidden: {0}")]
    Forbidden(#[from] AccessDenied),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns the account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if the username is unknown
    /// or the password does not match.
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UsernameTaken`] if the name is in use and
    /// [`AuthError::Validation`] for a blank name or a too short password.
    async fn register(&self, username: &str, password: &str, role: Role)
    -> Result<User, AuthError>;

    /// Registers on behalf of `actor`; any role other than the default
    /// requires an admin.
    async fn register_as(
        &self,
        actor: &Actor,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AuthError>;

    /// # Errors
    ///
    /// Returns [`AuthError::Forbidden`] for non-admins.
    async fn list_users(&self, actor: &Actor) -> Result<Vec<User>, AuthError>;

    async fn change_role(&self, actor: &Actor, user_id: UserId, role: Role)
    -> Result<(), AuthError>;

    /// # Errors
    ///
    /// Returns [`AuthError::SelfDeletion`] when `actor` targets itself.
    async fn delete_user(&self, actor: &Actor, user_id: UserId) -> Result<(), AuthError>;

    /// Changes the acting user's password after re-verifying the old one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::IncorrectPassword`] if `old_password` is wrong.
    async fn change_password(
        &self,
        actor: &Actor,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;
}
