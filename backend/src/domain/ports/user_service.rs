//! Driving port for user management.

use async_trait::async_trait;

use crate::domain::{AuditContext, Error, NewUser, User, UserId, UserPatch};

/// Use-cases exposed to inbound adapters for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user. Duplicate usernames or emails are a conflict.
    async fn create_user(&self, user: NewUser, audit: AuditContext) -> Result<User, Error>;

    /// Fetch one user; missing users are `not_found`.
    async fn get_user(&self, id: UserId) -> Result<User, Error>;

    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// Apply a partial update.
    async fn update_user(
        &self,
        id: UserId,
        patch: UserPatch,
        audit: AuditContext,
    ) -> Result<User, Error>;
}
