//! Port abstraction for the audit trail.
use async_trait::async_trait;

use crate::domain::{AuditEntry, AuditFilter, AuditId, AuditPage, NewAuditEntry};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Append an entry outside of any other mutation.
    async fn append(&self, entry: &NewAuditEntry) -> Result<AuditEntry, RepositoryError>;

    /// Entries matching `filter`, newest first (ties by id, descending),
    /// then windowed by `page`.
    async fn list(
        &self,
        filter: &AuditFilter,
        page: AuditPage,
    ) -> Result<Vec<AuditEntry>, RepositoryError>;

    async fn find_by_id(&self, id: AuditId) -> Result<Option<AuditEntry>, RepositoryError>;
}
