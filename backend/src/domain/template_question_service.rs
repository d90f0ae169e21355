//! Ordered question lists, implementing [`TemplateQuestionService`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{TemplateQuestionRepository, TemplateQuestionService, TemplateRepository};
use crate::domain::template_service::require_template;
use crate::domain::{
    AuditContext, Error, NewTemplateQuestionLink, Question, QuestionId, TemplateId,
    TemplateQuestionLink, first_duplicate_question,
};

#[derive(Clone)]
pub struct TemplateQuestionServiceImpl<L, T> {
    links: Arc<L>,
    templates: Arc<T>,
}

impl<L, T> TemplateQuestionServiceImpl<L, T> {
    pub fn new(links: Arc<L>, templates: Arc<T>) -> Self {
        Self { links, templates }
    }
}

#[async_trait]
impl<L, T> TemplateQuestionService for TemplateQuestionServiceImpl<L, T>
where
    L: TemplateQuestionRepository,
    T: TemplateRepository,
{
    async fn replace_questions(
        &self,
        template_id: TemplateId,
        links: Vec<NewTemplateQuestionLink>,
        audit: AuditContext,
    ) -> Result<Vec<TemplateQuestionLink>, Error> {
        require_template(self.templates.as_ref(), template_id).await?;
        if let Some(duplicate) = first_duplicate_question(&links) {
            return Err(Error::conflict(format!(
                "Question with ID {duplicate} listed more than once"
            )));
        }
        let created = self.links.replace(template_id, &links, &audit).await?;
        info!(%template_id, count = created.len(), "template questions replaced");
        Ok(created)
    }

    async fn template_questions(&self, template_id: TemplateId) -> Result<Vec<Question>, Error> {
        require_template(self.templates.as_ref(), template_id).await?;
        Ok(self.links.ordered_questions(template_id).await?)
    }

    async fn remove_question(
        &self,
        template_id: TemplateId,
        question_id: QuestionId,
        audit: AuditContext,
    ) -> Result<TemplateQuestionLink, Error> {
        require_template(self.templates.as_ref(), template_id).await?;
        let removed = self
            .links
            .remove(template_id, question_id, &audit)
            .await?
            .ok_or_else(|| Error::not_found("Question not in template"))?;
        info!(%template_id, %question_id, "question removed from template");
        Ok(removed)
    }
}
