//! Role-based authorization.
//!
//! Every privileged operation asks the acting [`Actor`] to authorize a
//! [`Permission`] before touching storage, so role checks live here and
//! nowhere else.

use crate::domain::{Role, UserId};
use crate::models::User;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// List every account.
    ViewUsers,
    /// Change roles and delete accounts.
    ManageUsers,
    /// Register an account with a role other than the default.
    AssignRoles,
}

impl Permission {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ViewUsers => "view users",
            Self::ManageUsers => "manage users",
            Self::AssignRoles => "assign roles",
        }
    }
}

impl Role {
    #[must_use]
    pub const fn grants(&self, permission: Permission) -> bool {
        match self {
            Self::Admin => true,
            Self::User => match permission {
                Permission::ViewUsers | Permission::ManageUsers | Permission::AssignRoles => false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{username} ({role}) may not {}", permission.as_str())]
pub struct AccessDenied {
    pub username: String,
    pub role: Role,
    pub permission: Permission,
}

/// The authenticated account on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub username: String,
    pub role: Role,
}

impl Actor {
    pub fn authorize(&self, permission: Permission) -> Result<(), AccessDenied> {
        if self.role.grants(permission) {
            Ok(())
        } else {
            Err(AccessDenied {
                username: self.username.clone(),
                role: self.role,
                permission,
            })
        }
    }
}

impl From<User> for Actor {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Actor {
        Actor {
            id: UserId::new(2),
            username: "bob".to_string(),
            role,
        }
    }

    #[test]
    fn admin_holds_every_permission() {
        let admin = actor(Role::Admin);
        for permission in [
            Permission::ViewUsers,
            Permission::ManageUsers,
            Permission::AssignRoles,
        ] {
            assert!(admin.authorize(permission).is_ok());
        }
    }

    #[test]
    fn user_is_denied_account_management() {
        let err = actor(Role::User)
            .authorize(Permission::ManageUsers)
            .unwrap_err();
        assert_eq!(err.permission, Permission::ManageUsers);
        assert_eq!(err.to_string(), "bob (user) may not manage users");
    }
}
