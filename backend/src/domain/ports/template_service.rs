//! Driving port for template metadata.

use async_trait::async_trait;

use crate::domain::{
    AuditContext, Error, NewTemplate, Template, TemplateDetail, TemplateId, TemplatePatch,
};

/// Use-cases exposed to inbound adapters for templates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateService: Send + Sync {
    /// Create a template; the creator must exist.
    async fn create_template(
        &self,
        template: NewTemplate,
        audit: AuditContext,
    ) -> Result<Template, Error>;

    /// Fetch a template with its questions in presentation order.
    async fn get_template(&self, id: TemplateId) -> Result<TemplateDetail, Error>;

    async fn list_templates(&self) -> Result<Vec<Template>, Error>;

    async fn update_template(
        &self,
        id: TemplateId,
        patch: TemplatePatch,
        audit: AuditContext,
    ) -> Result<Template, Error>;

    /// Delete a template with its links and grants.
    async fn delete_template(&self, id: TemplateId, audit: AuditContext)
    -> Result<Template, Error>;
}
