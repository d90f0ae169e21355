//! PostgreSQL-backed `AuditRepository`.
//!
//! Also exports [`insert_audit_entry`], which every mutating adapter calls on
//! its own transaction so the change and its audit row commit together.

use async_trait::async_trait;
use diesel::QueryResult;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{AuditRepository, RepositoryError};
use crate::domain::{AuditEntry, AuditFilter, AuditId, AuditPage, NewAuditEntry};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{AuditRow, NewAuditRow};
use super::pool::DbPool;
use super::schema::audit_entries;

pub(crate) async fn insert_audit_entry(
    conn: &mut AsyncPgConnection,
    entry: &NewAuditEntry,
) -> QueryResult<AuditRow> {
    diesel::insert_into(audit_entries::table)
        .values(NewAuditRow::from(entry))
        .returning(AuditRow::as_returning())
        .get_result(conn)
        .await
}

#[derive(Clone)]
pub struct DieselAuditRepository {
    pool: DbPool,
}

impl DieselAuditRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for DieselAuditRepository {
    async fn append(&self, entry: &NewAuditEntry) -> Result<AuditEntry, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = insert_audit_entry(&mut conn, entry)
            .await
            .map_err(map_diesel_error)?;
        AuditEntry::try_from(row)
    }

    async fn list(
        &self,
        filter: &AuditFilter,
        page: AuditPage,
    ) -> Result<Vec<AuditEntry>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = audit_entries::table
            .select(AuditRow::as_select())
            .into_boxed();
        if let Some(user_id) = filter.user_id {
            query = query.filter(audit_entries::user_id.eq(user_id.get()));
        }
        if let Some(entity_type) = filter.entity_type {
            query = query.filter(audit_entries::entity_type.eq(entity_type.as_str()));
        }
        if let Some(entity_id) = filter.entity_id {
            query = query.filter(audit_entries::entity_id.eq(entity_id));
        }
        if let Some(action_type) = filter.action_type {
            query = query.filter(audit_entries::action_type.eq(action_type.as_str()));
        }

        let rows: Vec<AuditRow> = query
            .order((
                audit_entries::created_at.desc(),
                audit_entries::audit_id.desc(),
            ))
            .offset(i64::from(page.skip))
            .limit(i64::from(page.limit))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(AuditEntry::try_from).collect()
    }

    async fn find_by_id(&self, id: AuditId) -> Result<Option<AuditEntry>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AuditRow> = audit_entries::table
            .find(id.get())
            .select(AuditRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(AuditEntry::try_from).transpose()
    }
}
