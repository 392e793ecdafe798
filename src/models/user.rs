use crate::domain::{Role, UserId};
use crate::entities::users;
use serde::Serialize;

/// User data returned from the identity store (without the password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub must_change_password: bool,
    pub created_at: String,
}

impl User {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: UserId::new(model.id),
            username: model.username,
            // Unknown role strings are treated as the least privileged role.
            role: model.role.parse().unwrap_or_default(),
            must_change_password: model.must_change_password,
            created_at: model.created_at,
        }
    }
}
