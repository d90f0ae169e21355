//! Driving port for reading and appending to the audit trail.

use async_trait::async_trait;

use crate::domain::{
    AuditEntry, AuditFilter, AuditId, AuditPage, Error, ManualAuditEntry, RequestOrigin,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditService: Send + Sync {
    /// Append a client-supplied entry, filling origin fields from the request.
    async fn record_entry(
        &self,
        entry: ManualAuditEntry,
        origin: RequestOrigin,
    ) -> Result<AuditEntry, Error>;

    async fn list_entries(
        &self,
        filter: AuditFilter,
        page: AuditPage,
    ) -> Result<Vec<AuditEntry>, Error>;

    async fn get_entry(&self, id: AuditId) -> Result<AuditEntry, Error>;
}
