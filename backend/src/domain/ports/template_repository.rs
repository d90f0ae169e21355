//! Port abstraction for template persistence adapters.
use async_trait::async_trait;

use crate::domain::{AuditContext, NewTemplate, Template, TemplateId, TemplatePatch};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Insert a template and its audit entry in one transaction.
    async fn create(
        &self,
        template: &NewTemplate,
        audit: &AuditContext,
    ) -> Result<Template, RepositoryError>;

    async fn find_by_id(&self, id: TemplateId) -> Result<Option<Template>, RepositoryError>;

    /// All templates ordered by identifier.
    async fn list(&self) -> Result<Vec<Template>, RepositoryError>;

    /// Apply `patch`, refreshing `updated_at` when any field is supplied.
    /// Returns `None` when the template does not exist.
    async fn update(
        &self,
        id: TemplateId,
        patch: &TemplatePatch,
        audit: &AuditContext,
    ) -> Result<Option<Template>, RepositoryError>;

    /// Delete the template with its question links and access grants.
    /// Returns the deleted template, or `None` when it did not exist.
    async fn delete(
        &self,
        id: TemplateId,
        audit: &AuditContext,
    ) -> Result<Option<Template>, RepositoryError>;
}
