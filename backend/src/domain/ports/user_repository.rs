//! Port abstraction for user persistence adapters.
use async_trait::async_trait;

use crate::domain::{AuditContext, NewUser, User, UserId, UserPatch};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and its audit entry in one transaction.
    ///
    /// A duplicate username or email yields [`RepositoryError::Conflict`].
    async fn create(&self, user: &NewUser, audit: &AuditContext) -> Result<User, RepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// All users ordered by identifier.
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    /// Apply `patch` and record the audit entry. Returns `None` when the user
    /// does not exist.
    async fn update(
        &self,
        id: UserId,
        patch: &UserPatch,
        audit: &AuditContext,
    ) -> Result<Option<User>, RepositoryError>;
}
