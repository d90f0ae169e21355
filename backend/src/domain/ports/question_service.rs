//! Driving port for the question bank.

use async_trait::async_trait;

use crate::domain::{AuditContext, Error, NewQuestion, Question, QuestionId, QuestionPatch};

/// Use-cases exposed to inbound adapters for questions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionService: Send + Sync {
    /// Create a question; the author must exist.
    async fn create_question(
        &self,
        question: NewQuestion,
        audit: AuditContext,
    ) -> Result<Question, Error>;

    async fn get_question(&self, id: QuestionId) -> Result<Question, Error>;

    async fn list_questions(&self) -> Result<Vec<Question>, Error>;

    /// Apply a partial update; a supplied author must exist.
    async fn update_question(
        &self,
        id: QuestionId,
        patch: QuestionPatch,
        audit: AuditContext,
    ) -> Result<Question, Error>;

    /// Delete a question and unlink it from every template.
    async fn delete_question(&self, id: QuestionId, audit: AuditContext)
    -> Result<Question, Error>;
}
