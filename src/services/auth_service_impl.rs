//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::domain::{Role, UserId};
use crate::models::User;
use crate::services::auth_service::{AuthError, AuthService};
use crate::services::policy::{Actor, Permission};
use async_trait::async_trait;
use tracing::{info, warn};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    fn validate_password(&self, password: &str) -> Result<(), AuthError> {
        if password.chars().count() < self.security.min_password_length {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters",
                self.security.min_password_length
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let is_valid = self.store.verify_user_password(username, password).await?;

        if !is_valid {
            warn!(username, "Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        self.store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }

    async fn register(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::Validation("Username must not be empty".to_string()));
        }
        self.validate_password(password)?;

        if self.store.get_user_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameTaken(username.to_string()));
        }

        let user = self
            .store
            .create_user(username, password, role, &self.security)
            .await?;

        info!(username = %user.username, role = %user.role, "Registered user");
        Ok(user)
    }

    async fn register_as(
        &self,
        actor: &Actor,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        if role != Role::default() {
            actor.authorize(Permission::AssignRoles)?;
        }
        self.register(username, password, role).await
    }

    async fn list_users(&self, actor: &Actor) -> Result<Vec<User>, AuthError> {
        actor.authorize(Permission::ViewUsers)?;
        Ok(self.store.list_users().await?)
    }

    async fn change_role(
        &self,
        actor: &Actor,
        user_id: UserId,
        role: Role,
    ) -> Result<(), AuthError> {
        actor.authorize(Permission::ManageUsers)?;

        if !self.store.update_user_role(user_id, role).await? {
            return Err(AuthError::UserNotFound);
        }

        info!(by = %actor.username, user_id = %user_id, role = %role, "Changed user role");
        Ok(())
    }

    async fn delete_user(&self, actor: &Actor, user_id: UserId) -> Result<(), AuthError> {
        actor.authorize(Permission::ManageUsers)?;

        if user_id == actor.id {
            return Err(AuthError::SelfDeletion);
        }

        if !self.store.delete_user(user_id).await? {
            return Err(AuthError::UserNotFound);
        }

        info!(by = %actor.username, user_id = %user_id, "Deleted user");
        Ok(())
    }

    async fn change_password(
        &self,
        actor: &Actor,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let is_valid = self
            .store
            .verify_user_password(&actor.username, old_password)
            .await?;

        if !is_valid {
            return Err(AuthError::IncorrectPassword);
        }

        self.validate_password(new_password)?;

        self.store
            .update_user_password(actor.id, new_password, &self.security)
            .await?;

        info!(username = %actor.username, "Password changed");
        Ok(())
    }
}
