//! User management service implementing [`UserService`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{UserRepository, UserService};
use crate::domain::{AuditContext, Error, NewUser, User, UserId, UserPatch};

/// Fetch a user or fail with `not_found`.
pub(crate) async fn require_user<R>(users: &R, id: UserId) -> Result<User, Error>
where
    R: UserRepository + ?Sized,
{
    users
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found("User not found"))
}

/// Domain service coordinating user reads and audited writes.
#[derive(Clone)]
pub struct UserServiceImpl<R> {
    users: Arc<R>,
}

impl<R> UserServiceImpl<R> {
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<R> UserService for UserServiceImpl<R>
where
    R: UserRepository,
{
    async fn create_user(&self, user: NewUser, audit: AuditContext) -> Result<User, Error> {
        let created = self.users.create(&user, &audit).await?;
        info!(user_id = %created.id, caller = %audit.caller, "user created");
        Ok(created)
    }

    async fn get_user(&self, id: UserId) -> Result<User, Error> {
        require_user(self.users.as_ref(), id).await
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        Ok(self.users.list().await?)
    }

    async fn update_user(
        &self,
        id: UserId,
        patch: UserPatch,
        audit: AuditContext,
    ) -> Result<User, Error> {
        let updated = self
            .users
            .update(id, &patch, &audit)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))?;
        info!(user_id = %id, caller = %audit.caller, "user updated");
        Ok(updated)
    }
}
