//! Question bank service implementing [`QuestionService`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{QuestionRepository, QuestionService, UserRepository};
use crate::domain::user_service::require_user;
use crate::domain::{AuditContext, Error, NewQuestion, Question, QuestionId, QuestionPatch};

fn question_not_found() -> Error {
    Error::not_found("Question not found")
}

/// Domain service for questions. Authors are checked against the user
/// repository before any write.
#[derive(Clone)]
pub struct QuestionServiceImpl<Q, U> {
    questions: Arc<Q>,
    users: Arc<U>,
}

impl<Q, U> QuestionServiceImpl<Q, U> {
    pub fn new(questions: Arc<Q>, users: Arc<U>) -> Self {
        Self { questions, users }
    }
}

#[async_trait]
impl<Q, U> QuestionService for QuestionServiceImpl<Q, U>
where
    Q: QuestionRepository,
    U: UserRepository,
{
    async fn create_question(
        &self,
        question: NewQuestion,
        audit: AuditContext,
    ) -> Result<Question, Error> {
        require_user(self.users.as_ref(), question.created_by).await?;
        let created = self.questions.create(&question, &audit).await?;
        info!(question_id = %created.id, author = %created.created_by, "question created");
        Ok(created)
    }

    async fn get_question(&self, id: QuestionId) -> Result<Question, Error> {
        self.questions
            .find_by_id(id)
            .await?
            .ok_or_else(question_not_found)
    }

    async fn list_questions(&self) -> Result<Vec<Question>, Error> {
        Ok(self.questions.list().await?)
    }

    async fn update_question(
        &self,
        id: QuestionId,
        patch: QuestionPatch,
        audit: AuditContext,
    ) -> Result<Question, Error> {
        self.get_question(id).await?;
        if let Some(author) = patch.created_by {
            require_user(self.users.as_ref(), author).await?;
        }
        let updated = self
            .questions
            .update(id, &patch, &audit)
            .await?
            .ok_or_else(question_not_found)?;
        info!(question_id = %id, "question updated");
        Ok(updated)
    }

    async fn delete_question(
        &self,
        id: QuestionId,
        audit: AuditContext,
    ) -> Result<Question, Error> {
        let deleted = self
            .questions
            .delete(id, &audit)
            .await?
            .ok_or_else(question_not_found)?;
        info!(question_id = %id, "question deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockQuestionRepository, MockUserRepository};
    use crate::domain::{ErrorCode, RequestOrigin, User, UserId};
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn audit() -> AuditContext {
        AuditContext::new(UserId::new(1), RequestOrigin::default())
    }

    fn draft(author: i32) -> NewQuestion {
        NewQuestion {
            context: "Kick-off".into(),
            question: "Who are the stakeholders?".into(),
            phase: "discovery".into(),
            section: "people".into(),
            answer_type: "text".into(),
            created_by: UserId::new(author),
        }
    }

    fn user(id: i32) -> User {
        User {
            id: UserId::new(id),
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            password_hash: "hash".into(),
        }
    }

    fn service(
        questions: MockQuestionRepository,
        users: MockUserRepository,
    ) -> QuestionServiceImpl<MockQuestionRepository, MockUserRepository> {
        QuestionServiceImpl::new(Arc::new(questions), Arc::new(users))
    }

    #[rstest]
    #[tokio::test]
    async fn create_rejects_unknown_author(audit: AuditContext) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(UserId::new(9)))
            .return_once(|_| Ok(None));
        let mut questions = MockQuestionRepository::new();
        questions.expect_create().never();

        let err = service(questions, users)
            .create_question(draft(9), audit)
            .await
            .expect_err("unknown author");

        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "User not found");
    }

    #[rstest]
    #[tokio::test]
    async fn create_persists_with_author(audit: AuditContext) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(Some(user(2))));
        let mut questions = MockQuestionRepository::new();
        questions
            .expect_create()
            .withf(|question, _| question.created_by == UserId::new(2))
            .return_once(|question, _| Ok(question.clone().into_question(QuestionId::new(5))));

        let created = service(questions, users)
            .create_question(draft(2), audit)
            .await
            .expect("created");

        assert_eq!(created.id, QuestionId::new(5));
        assert_eq!(created.question, "Who are the stakeholders?");
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_missing_question_checks_existence_first(audit: AuditContext) {
        let mut questions = MockQuestionRepository::new();
        questions.expect_find_by_id().return_once(|_| Ok(None));
        questions.expect_update().never();
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().never();
        let patch = QuestionPatch {
            created_by: Some(UserId::new(7)),
            ..QuestionPatch::default()
        };

        let err = service(questions, users)
            .update_question(QuestionId::new(1), patch, audit)
            .await
            .expect_err("missing question");

        assert_eq!(err.message(), "Question not found");
    }

    #[rstest]
    #[tokio::test]
    async fn update_rejects_unknown_new_author(audit: AuditContext) {
        let mut questions = MockQuestionRepository::new();
        questions
            .expect_find_by_id()
            .return_once(|_| Ok(Some(draft(1).into_question(QuestionId::new(1)))));
        questions.expect_update().never();
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));
        let patch = QuestionPatch {
            created_by: Some(UserId::new(7)),
            ..QuestionPatch::default()
        };

        let err = service(questions, users)
            .update_question(QuestionId::new(1), patch, audit)
            .await
            .expect_err("unknown author");

        assert_eq!(err.message(), "User not found");
    }

    #[rstest]
    #[tokio::test]
    async fn delete_of_missing_question_is_not_found(audit: AuditContext) {
        let mut questions = MockQuestionRepository::new();
        questions.expect_delete().return_once(|_, _| Ok(None));

        let err = service(questions, MockUserRepository::new())
            .delete_question(QuestionId::new(3), audit)
            .await
            .expect_err("missing");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
