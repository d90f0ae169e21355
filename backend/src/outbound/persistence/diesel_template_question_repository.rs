//! PostgreSQL-backed `TemplateQuestionRepository`.
//!
//! `replace` swaps a template's whole link set in one transaction. A missing
//! question aborts it, leaving the previous links untouched.

use std::collections::HashSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::audit;
use crate::domain::ports::{RepositoryError, TemplateQuestionRepository};
use crate::domain::{
    AuditContext, NewTemplateQuestionLink, Question, QuestionId, TemplateId,
    TemplateQuestionLink, sort_links,
};

use super::diesel_audit_repository::insert_audit_entry;
use super::error_mapping::{TxError, map_diesel_error, map_pool_error};
use super::models::{NewTemplateQuestionRow, QuestionRow, TemplateQuestionRow};
use super::pool::DbPool;
use super::schema::{questions, template_questions};

#[derive(Clone)]
pub struct DieselTemplateQuestionRepository {
    pool: DbPool,
}

impl DieselTemplateQuestionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn load_links(
    conn: &mut AsyncPgConnection,
    template_id: TemplateId,
) -> QueryResult<Vec<TemplateQuestionLink>> {
    let rows: Vec<TemplateQuestionRow> = template_questions::table
        .filter(template_questions::template_id.eq(template_id.get()))
        .select(TemplateQuestionRow::as_select())
        .order((template_questions::position.asc(), template_questions::id.asc()))
        .load(conn)
        .await?;
    Ok(rows.into_iter().map(TemplateQuestionLink::from).collect())
}

/// First requested question with no row, in request order.
async fn first_missing_question(
    conn: &mut AsyncPgConnection,
    links: &[NewTemplateQuestionLink],
) -> QueryResult<Option<QuestionId>> {
    let requested: Vec<i32> = links.iter().map(|link| link.question_id.get()).collect();
    let existing: HashSet<i32> = questions::table
        .filter(questions::question_id.eq_any(&requested))
        .select(questions::question_id)
        .load::<i32>(conn)
        .await?
        .into_iter()
        .collect();
    Ok(links
        .iter()
        .map(|link| link.question_id)
        .find(|id| !existing.contains(&id.get())))
}

#[async_trait]
impl TemplateQuestionRepository for DieselTemplateQuestionRepository {
    async fn replace(
        &self,
        template_id: TemplateId,
        links: &[NewTemplateQuestionLink],
        ctx: &AuditContext,
    ) -> Result<Vec<TemplateQuestionLink>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NewTemplateQuestionRow> = links
            .iter()
            .map(|link| NewTemplateQuestionRow {
                template_id: template_id.get(),
                question_id: link.question_id.get(),
                position: link.order,
            })
            .collect();

        let replaced = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    if let Some(missing) = first_missing_question(conn, links).await? {
                        return Err(TxError::Rejected(RepositoryError::missing_reference(
                            format!("Question with ID {missing} not found"),
                        )));
                    }

                    let previous = load_links(conn, template_id).await?;
                    diesel::delete(
                        template_questions::table
                            .filter(template_questions::template_id.eq(template_id.get())),
                    )
                    .execute(conn)
                    .await?;

                    let mut current: Vec<TemplateQuestionLink> = if rows.is_empty() {
                        Vec::new()
                    } else {
                        diesel::insert_into(template_questions::table)
                            .values(&rows)
                            .returning(TemplateQuestionRow::as_returning())
                            .get_results::<TemplateQuestionRow>(conn)
                            .await?
                            .into_iter()
                            .map(TemplateQuestionLink::from)
                            .collect()
                    };
                    sort_links(&mut current);

                    insert_audit_entry(
                        conn,
                        &audit::links_replaced(ctx, template_id, &previous, &current),
                    )
                    .await?;
                    Ok(current)
                }
                .scope_boxed()
            })
            .await?;
        Ok(replaced)
    }

    async fn ordered_questions(
        &self,
        template_id: TemplateId,
    ) -> Result<Vec<Question>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<QuestionRow> = template_questions::table
            .inner_join(questions::table)
            .filter(template_questions::template_id.eq(template_id.get()))
            .order((template_questions::position.asc(), template_questions::id.asc()))
            .select(QuestionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Question::from).collect())
    }

    async fn remove(
        &self,
        template_id: TemplateId,
        question_id: QuestionId,
        ctx: &AuditContext,
    ) -> Result<Option<TemplateQuestionLink>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let Some(link) = template_questions::table
                    .filter(template_questions::template_id.eq(template_id.get()))
                    .filter(template_questions::question_id.eq(question_id.get()))
                    .select(TemplateQuestionRow::as_select())
                    .for_update()
                    .first::<TemplateQuestionRow>(conn)
                    .await
                    .optional()?
                    .map(TemplateQuestionLink::from)
                else {
                    return Ok(None);
                };

                diesel::delete(template_questions::table.find(link.id))
                    .execute(conn)
                    .await?;
                insert_audit_entry(conn, &audit::link_removed(ctx, &link)).await?;
                Ok(Some(link))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
