//! Driving port for the ordered question list of a template.

use async_trait::async_trait;

use crate::domain::{
    AuditContext, Error, NewTemplateQuestionLink, Question, QuestionId, TemplateId,
    TemplateQuestionLink,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateQuestionService: Send + Sync {
    /// Replace the whole question list. All-or-nothing.
    async fn replace_questions(
        &self,
        template_id: TemplateId,
        links: Vec<NewTemplateQuestionLink>,
        audit: AuditContext,
    ) -> Result<Vec<TemplateQuestionLink>, Error>;

    async fn template_questions(&self, template_id: TemplateId) -> Result<Vec<Question>, Error>;

    async fn remove_question(
        &self,
        template_id: TemplateId,
        question_id: QuestionId,
        audit: AuditContext,
    ) -> Result<TemplateQuestionLink, Error>;
}
