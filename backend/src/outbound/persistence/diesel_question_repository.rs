//! PostgreSQL-backed `QuestionRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::audit;
use crate::domain::ports::{QuestionRepository, RepositoryError};
use crate::domain::{AuditContext, NewQuestion, Question, QuestionId, QuestionPatch};

use super::diesel_audit_repository::insert_audit_entry;
use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewQuestionRow, QuestionChangeset, QuestionRow};
use super::pool::DbPool;
use super::schema::{questions, template_questions};

#[derive(Clone)]
pub struct DieselQuestionRepository {
    pool: DbPool,
}

impl DieselQuestionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionRepository for DieselQuestionRepository {
    async fn create(
        &self,
        question: &NewQuestion,
        ctx: &AuditContext,
    ) -> Result<Question, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewQuestionRow::from(question);

        conn.transaction(|conn| {
            async move {
                let created = Question::from(
                    diesel::insert_into(questions::table)
                        .values(&row)
                        .returning(QuestionRow::as_returning())
                        .get_result::<QuestionRow>(conn)
                        .await?,
                );
                insert_audit_entry(conn, &audit::question_created(ctx, &created)).await?;
                Ok(created)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: QuestionId) -> Result<Option<Question>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<QuestionRow> = questions::table
            .find(id.get())
            .select(QuestionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Question::from))
    }

    async fn list(&self) -> Result<Vec<Question>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<QuestionRow> = questions::table
            .select(QuestionRow::as_select())
            .order(questions::question_id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Question::from).collect())
    }

    async fn update(
        &self,
        id: QuestionId,
        patch: &QuestionPatch,
        ctx: &AuditContext,
    ) -> Result<Option<Question>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = QuestionChangeset::from(patch);

        conn.transaction(|conn| {
            async move {
                let Some(before) = questions::table
                    .find(id.get())
                    .select(QuestionRow::as_select())
                    .for_update()
                    .first::<QuestionRow>(conn)
                    .await
                    .optional()?
                    .map(Question::from)
                else {
                    return Ok(None);
                };
                if patch.is_empty() {
                    return Ok(Some(before));
                }

                let after = Question::from(
                    diesel::update(questions::table.find(id.get()))
                        .set(&changeset)
                        .returning(QuestionRow::as_returning())
                        .get_result::<QuestionRow>(conn)
                        .await?,
                );
                insert_audit_entry(
                    conn,
                    &audit::question_updated(ctx, &before, &after, patch),
                )
                .await?;
                Ok(Some(after))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn delete(
        &self,
        id: QuestionId,
        ctx: &AuditContext,
    ) -> Result<Option<Question>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let Some(question) = questions::table
                    .find(id.get())
                    .select(QuestionRow::as_select())
                    .for_update()
                    .first::<QuestionRow>(conn)
                    .await
                    .optional()?
                    .map(Question::from)
                else {
                    return Ok(None);
                };

                diesel::delete(
                    template_questions::table.filter(template_questions::question_id.eq(id.get())),
                )
                .execute(conn)
                .await?;
                diesel::delete(questions::table.find(id.get()))
                    .execute(conn)
                    .await?;
                insert_audit_entry(conn, &audit::question_deleted(ctx, &question)).await?;
                Ok(Some(question))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
