//! Driving port for global roles.

use async_trait::async_trait;

use crate::domain::{AccessType, Error, GlobalRole, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleService: Send + Sync {
    /// Set the user's global role, replacing any previous one.
    async fn assign_global_role(
        &self,
        user_id: UserId,
        access_type: AccessType,
    ) -> Result<GlobalRole, Error>;

    /// Return the user's global role, creating the default `user` role when
    /// none exists yet.
    async fn get_or_create_global_role(&self, user_id: UserId) -> Result<GlobalRole, Error>;

    async fn list_global_roles(&self) -> Result<Vec<GlobalRole>, Error>;
}
