//! Port abstraction for per-template access grants.
use async_trait::async_trait;

use crate::domain::{AuditContext, NewTemplateAccess, TemplateAccess, TemplateId, UserId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateAccessRepository: Send + Sync {
    /// Record a grant. A second grant for the same (template, user) pair
    /// yields [`RepositoryError::Conflict`].
    async fn grant(
        &self,
        grant: &NewTemplateAccess,
        audit: &AuditContext,
    ) -> Result<TemplateAccess, RepositoryError>;

    /// Grants on a template ordered by identifier.
    async fn list_for_template(
        &self,
        template_id: TemplateId,
    ) -> Result<Vec<TemplateAccess>, RepositoryError>;

    /// Remove a grant. Returns `None` when no grant existed.
    async fn revoke(
        &self,
        template_id: TemplateId,
        user_id: UserId,
        audit: &AuditContext,
    ) -> Result<Option<TemplateAccess>, RepositoryError>;
}
