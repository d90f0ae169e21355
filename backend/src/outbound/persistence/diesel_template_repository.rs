//! PostgreSQL-backed `TemplateRepository`.
//!
//! Deleting a template removes its question links and access grants in the
//! same transaction; questions themselves are left alone.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::audit;
use crate::domain::ports::{RepositoryError, TemplateRepository};
use crate::domain::{AuditContext, NewTemplate, Template, TemplateId, TemplatePatch};

use super::diesel_audit_repository::insert_audit_entry;
use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewTemplateRow, TemplateChangeset, TemplateRow};
use super::pool::DbPool;
use super::schema::{template_access, template_questions, templates};

#[derive(Clone)]
pub struct DieselTemplateRepository {
    pool: DbPool,
}

impl DieselTemplateRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateRepository for DieselTemplateRepository {
    async fn create(
        &self,
        template: &NewTemplate,
        ctx: &AuditContext,
    ) -> Result<Template, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewTemplateRow::from(template);

        conn.transaction(|conn| {
            async move {
                let created = Template::from(
                    diesel::insert_into(templates::table)
                        .values(&row)
                        .returning(TemplateRow::as_returning())
                        .get_result::<TemplateRow>(conn)
                        .await?,
                );
                insert_audit_entry(conn, &audit::template_created(ctx, &created)).await?;
                Ok(created)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: TemplateId) -> Result<Option<Template>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TemplateRow> = templates::table
            .find(id.get())
            .select(TemplateRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Template::from))
    }

    async fn list(&self) -> Result<Vec<Template>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TemplateRow> = templates::table
            .select(TemplateRow::as_select())
            .order(templates::template_id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Template::from).collect())
    }

    async fn update(
        &self,
        id: TemplateId,
        patch: &TemplatePatch,
        ctx: &AuditContext,
    ) -> Result<Option<Template>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = TemplateChangeset::new(patch, Utc::now());

        conn.transaction(|conn| {
            async move {
                let Some(before) = templates::table
                    .find(id.get())
                    .select(TemplateRow::as_select())
                    .for_update()
                    .first::<TemplateRow>(conn)
                    .await
                    .optional()?
                    .map(Template::from)
                else {
                    return Ok(None);
                };
                if patch.is_empty() {
                    return Ok(Some(before));
                }

                let after = Template::from(
                    diesel::update(templates::table.find(id.get()))
                        .set(&changeset)
                        .returning(TemplateRow::as_returning())
                        .get_result::<TemplateRow>(conn)
                        .await?,
                );
                insert_audit_entry(conn, &audit::template_updated(ctx, &before, patch)).await?;
                Ok(Some(after))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn delete(
        &self,
        id: TemplateId,
        ctx: &AuditContext,
    ) -> Result<Option<Template>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let Some(template) = templates::table
                    .find(id.get())
                    .select(TemplateRow::as_select())
                    .for_update()
                    .first::<TemplateRow>(conn)
                    .await
                    .optional()?
                    .map(Template::from)
                else {
                    return Ok(None);
                };

                diesel::delete(
                    template_questions::table.filter(template_questions::template_id.eq(id.get())),
                )
                .execute(conn)
                .await?;
                diesel::delete(
                    template_access::table.filter(template_access::template_id.eq(id.get())),
                )
                .execute(conn)
                .await?;
                diesel::delete(templates::table.find(id.get()))
                    .execute(conn)
                    .await?;
                insert_audit_entry(conn, &audit::template_deleted(ctx, &template)).await?;
                Ok(Some(template))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
