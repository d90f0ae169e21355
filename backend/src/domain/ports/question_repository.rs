//! Port abstraction for question persistence adapters.
use async_trait::async_trait;

use crate::domain::{AuditContext, NewQuestion, Question, QuestionId, QuestionPatch};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Insert a question and its audit entry in one transaction.
    async fn create(
        &self,
        question: &NewQuestion,
        audit: &AuditContext,
    ) -> Result<Question, RepositoryError>;

    async fn find_by_id(&self, id: QuestionId) -> Result<Option<Question>, RepositoryError>;

    /// All questions ordered by identifier.
    async fn list(&self) -> Result<Vec<Question>, RepositoryError>;

    /// Apply `patch` and record the audit entry. Returns `None` when the
    /// question does not exist.
    async fn update(
        &self,
        id: QuestionId,
        patch: &QuestionPatch,
        audit: &AuditContext,
    ) -> Result<Option<Question>, RepositoryError>;

    /// Delete the question together with every template link that references
    /// it. Returns the deleted question, or `None` when it did not exist.
    async fn delete(
        &self,
        id: QuestionId,
        audit: &AuditContext,
    ) -> Result<Option<Question>, RepositoryError>;
}
