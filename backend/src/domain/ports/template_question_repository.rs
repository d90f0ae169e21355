//! Port abstraction for the ordered question list of a template.
use async_trait::async_trait;

use crate::domain::{
    AuditContext, NewTemplateQuestionLink, Question, QuestionId, TemplateId, TemplateQuestionLink,
};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateQuestionRepository: Send + Sync {
    /// Replace every link of a template in one transaction.
    ///
    /// The first link naming a missing question aborts the replacement with
    /// [`RepositoryError::MissingReference`] and leaves the previous links in
    /// place. Links are returned by position, ties by id.
    async fn replace(
        &self,
        template_id: TemplateId,
        links: &[NewTemplateQuestionLink],
        audit: &AuditContext,
    ) -> Result<Vec<TemplateQuestionLink>, RepositoryError>;

    /// Questions of a template ordered by link position, ties by link id.
    async fn ordered_questions(
        &self,
        template_id: TemplateId,
    ) -> Result<Vec<Question>, RepositoryError>;

    /// Remove one link. Returns `None` when the question is not linked.
    async fn remove(
        &self,
        template_id: TemplateId,
        question_id: QuestionId,
        audit: &AuditContext,
    ) -> Result<Option<TemplateQuestionLink>, RepositoryError>;
}
