//! PostgreSQL-backed `RoleRepository` over `user_roles`.
//!
//! Both writes lean on the `user_roles_user_key` constraint, so concurrent
//! callers converge on a single row per user.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RepositoryError, RoleRepository};
use crate::domain::{AccessType, GlobalRole, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserRoleRow, UserRoleRow};
use super::pool::DbPool;
use super::schema::user_roles;

#[derive(Clone)]
pub struct DieselRoleRepository {
    pool: DbPool,
}

impl DieselRoleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for DieselRoleRepository {
    async fn upsert(
        &self,
        user_id: UserId,
        access_type: AccessType,
    ) -> Result<GlobalRole, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: UserRoleRow = diesel::insert_into(user_roles::table)
            .values(NewUserRoleRow {
                user_id: user_id.get(),
                access_type: access_type.as_str(),
            })
            .on_conflict(user_roles::user_id)
            .do_update()
            .set(user_roles::access_type.eq(excluded(user_roles::access_type)))
            .returning(UserRoleRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        GlobalRole::try_from(row)
    }

    async fn get_or_create(
        &self,
        user_id: UserId,
        default: AccessType,
    ) -> Result<GlobalRole, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(user_roles::table)
            .values(NewUserRoleRow {
                user_id: user_id.get(),
                access_type: default.as_str(),
            })
            .on_conflict(user_roles::user_id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let row: UserRoleRow = user_roles::table
            .filter(user_roles::user_id.eq(user_id.get()))
            .select(UserRoleRow::as_select())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        GlobalRole::try_from(row)
    }

    async fn list(&self) -> Result<Vec<GlobalRole>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRoleRow> = user_roles::table
            .select(UserRoleRow::as_select())
            .order(user_roles::user_id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(GlobalRole::try_from).collect()
    }
}
