//! Port abstraction for global roles.
use async_trait::async_trait;

use crate::domain::{AccessType, GlobalRole, UserId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Insert or overwrite the user's global role.
    async fn upsert(
        &self,
        user_id: UserId,
        access_type: AccessType,
    ) -> Result<GlobalRole, RepositoryError>;

    /// Return the user's global role, inserting one with `default` when none
    /// exists. Concurrent callers observe the same row.
    async fn get_or_create(
        &self,
        user_id: UserId,
        default: AccessType,
    ) -> Result<GlobalRole, RepositoryError>;

    /// All global roles ordered by identifier.
    async fn list(&self) -> Result<Vec<GlobalRole>, RepositoryError>;
}
