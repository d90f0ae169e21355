//! Template metadata service implementing [`TemplateService`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    TemplateQuestionRepository, TemplateRepository, TemplateService, UserRepository,
};
use crate::domain::user_service::require_user;
use crate::domain::{
    AuditContext, Error, NewTemplate, Template, TemplateDetail, TemplateId, TemplatePatch,
};

fn template_not_found() -> Error {
    Error::not_found("Template not found")
}

/// Fetch a template or fail with `not_found`.
pub(crate) async fn require_template<R>(templates: &R, id: TemplateId) -> Result<Template, Error>
where
    R: TemplateRepository + ?Sized,
{
    templates
        .find_by_id(id)
        .await?
        .ok_or_else(template_not_found)
}

/// Domain service for templates.
#[derive(Clone)]
pub struct TemplateServiceImpl<T, L, U> {
    templates: Arc<T>,
    links: Arc<L>,
    users: Arc<U>,
}

impl<T, L, U> TemplateServiceImpl<T, L, U> {
    pub fn new(templates: Arc<T>, links: Arc<L>, users: Arc<U>) -> Self {
        Self {
            templates,
            links,
            users,
        }
    }
}

#[async_trait]
impl<T, L, U> TemplateService for TemplateServiceImpl<T, L, U>
where
    T: TemplateRepository,
    L: TemplateQuestionRepository,
    U: UserRepository,
{
    async fn create_template(
        &self,
        template: NewTemplate,
        audit: AuditContext,
    ) -> Result<Template, Error> {
        require_user(self.users.as_ref(), template.created_by).await?;
        let created = self.templates.create(&template, &audit).await?;
        info!(template_id = %created.id, "template created");
        Ok(created)
    }

    async fn get_template(&self, id: TemplateId) -> Result<TemplateDetail, Error> {
        let template = require_template(self.templates.as_ref(), id).await?;
        let questions = self.links.ordered_questions(id).await?;
        Ok(TemplateDetail {
            template,
            questions,
        })
    }

    async fn list_templates(&self) -> Result<Vec<Template>, Error> {
        Ok(self.templates.list().await?)
    }

    async fn update_template(
        &self,
        id: TemplateId,
        patch: TemplatePatch,
        audit: AuditContext,
    ) -> Result<Template, Error> {
        let updated = self
            .templates
            .update(id, &patch, &audit)
            .await?
            .ok_or_else(template_not_found)?;
        info!(template_id = %id, "template updated");
        Ok(updated)
    }

    async fn delete_template(
        &self,
        id: TemplateId,
        audit: AuditContext,
    ) -> Result<Template, Error> {
        let deleted = self
            .templates
            .delete(id, &audit)
            .await?
            .ok_or_else(template_not_found)?;
        info!(template_id = %id, "template deleted");
        Ok(deleted)
    }
}
