//! Global role assignment, implementing [`RoleService`].
//!
//! Role changes are not written to the audit trail.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{RoleRepository, RoleService, UserRepository};
use crate::domain::user_service::require_user;
use crate::domain::{AccessType, Error, GlobalRole, UserId};

#[derive(Clone)]
pub struct RoleServiceImpl<R, U> {
    roles: Arc<R>,
    users: Arc<U>,
}

impl<R, U> RoleServiceImpl<R, U> {
    pub fn new(roles: Arc<R>, users: Arc<U>) -> Self {
        Self { roles, users }
    }
}

#[async_trait]
impl<R, U> RoleService for RoleServiceImpl<R, U>
where
    R: RoleRepository,
    U: UserRepository,
{
    async fn assign_global_role(
        &self,
        user_id: UserId,
        access_type: AccessType,
    ) -> Result<GlobalRole, Error> {
        require_user(self.users.as_ref(), user_id).await?;
        let role = self.roles.upsert(user_id, access_type).await?;
        info!(%user_id, %access_type, "global role assigned");
        Ok(role)
    }

    async fn get_or_create_global_role(&self, user_id: UserId) -> Result<GlobalRole, Error> {
        require_user(self.users.as_ref(), user_id).await?;
        Ok(self
            .roles
            .get_or_create(user_id, AccessType::default())
            .await?)
    }

    async fn list_global_roles(&self) -> Result<Vec<GlobalRole>, Error> {
        Ok(self.roles.list().await?)
    }
}
