//! PostgreSQL-backed `TemplateAccessRepository`.
//!
//! Duplicate grants surface as a conflict through the
//! `template_access_template_user_key` constraint.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::audit;
use crate::domain::ports::{RepositoryError, TemplateAccessRepository};
use crate::domain::{AuditContext, NewTemplateAccess, TemplateAccess, TemplateId, UserId};

use super::diesel_audit_repository::insert_audit_entry;
use super::error_mapping::{TxError, map_diesel_error, map_pool_error};
use super::models::{NewTemplateAccessRow, TemplateAccessRow};
use super::pool::DbPool;
use super::schema::template_access;

#[derive(Clone)]
pub struct DieselTemplateAccessRepository {
    pool: DbPool,
}

impl DieselTemplateAccessRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateAccessRepository for DieselTemplateAccessRepository {
    async fn grant(
        &self,
        grant: &NewTemplateAccess,
        ctx: &AuditContext,
    ) -> Result<TemplateAccess, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewTemplateAccessRow {
            template_id: grant.template_id.get(),
            user_id: grant.user_id.get(),
            access_type: grant.access_type.as_str(),
        };

        let granted = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    let granted = TemplateAccess::try_from(
                        diesel::insert_into(template_access::table)
                            .values(&row)
                            .returning(TemplateAccessRow::as_returning())
                            .get_result::<TemplateAccessRow>(conn)
                            .await?,
                    )
                    .map_err(TxError::Rejected)?;
                    insert_audit_entry(conn, &audit::access_granted(ctx, &granted)).await?;
                    Ok(granted)
                }
                .scope_boxed()
            })
            .await?;
        Ok(granted)
    }

    async fn list_for_template(
        &self,
        template_id: TemplateId,
    ) -> Result<Vec<TemplateAccess>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TemplateAccessRow> = template_access::table
            .filter(template_access::template_id.eq(template_id.get()))
            .select(TemplateAccessRow::as_select())
            .order(template_access::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(TemplateAccess::try_from).collect()
    }

    async fn revoke(
        &self,
        template_id: TemplateId,
        user_id: UserId,
        ctx: &AuditContext,
    ) -> Result<Option<TemplateAccess>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let revoked = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    let Some(row) = template_access::table
                        .filter(template_access::template_id.eq(template_id.get()))
                        .filter(template_access::user_id.eq(user_id.get()))
                        .select(TemplateAccessRow::as_select())
                        .for_update()
                        .first::<TemplateAccessRow>(conn)
                        .await
                        .optional()?
                    else {
                        return Ok(None);
                    };
                    let grant = TemplateAccess::try_from(row).map_err(TxError::Rejected)?;

                    diesel::delete(template_access::table.find(grant.id))
                        .execute(conn)
                        .await?;
                    insert_audit_entry(conn, &audit::access_revoked(ctx, &grant)).await?;
                    Ok(Some(grant))
                }
                .scope_boxed()
            })
            .await?;
        Ok(revoked)
    }
}
