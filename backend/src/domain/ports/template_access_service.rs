//! Driving port for per-template access grants.

use async_trait::async_trait;

use crate::domain::{AuditContext, Error, NewTemplateAccess, TemplateAccess, TemplateId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateAccessService: Send + Sync {
    /// Grant a user access to a template. Both must exist; a second grant for
    /// the same pair is a conflict.
    async fn grant_access(
        &self,
        grant: NewTemplateAccess,
        audit: AuditContext,
    ) -> Result<TemplateAccess, Error>;

    async fn list_access(&self, template_id: TemplateId) -> Result<Vec<TemplateAccess>, Error>;

    async fn revoke_access(
        &self,
        template_id: TemplateId,
        user_id: UserId,
        audit: AuditContext,
    ) -> Result<TemplateAccess, Error>;
}
