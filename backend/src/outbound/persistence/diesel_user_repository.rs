//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::audit;
use crate::domain::ports::{RepositoryError, UserRepository};
use crate::domain::{AuditContext, NewUser, User, UserId, UserPatch};

use super::diesel_audit_repository::insert_audit_entry;
use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::DbPool;
use super::schema::users;

#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser, ctx: &AuditContext) -> Result<User, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow::from(user);

        conn.transaction(|conn| {
            async move {
                let created = User::from(
                    diesel::insert_into(users::table)
                        .values(&row)
                        .returning(UserRow::as_returning())
                        .get_result::<UserRow>(conn)
                        .await?,
                );
                insert_audit_entry(conn, &audit::user_created(ctx, &created)).await?;
                Ok(created)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(User::from))
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order(users::user_id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn update(
        &self,
        id: UserId,
        patch: &UserPatch,
        ctx: &AuditContext,
    ) -> Result<Option<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = UserChangeset::from(patch);

        conn.transaction(|conn| {
            async move {
                let Some(before) = users::table
                    .find(id.get())
                    .select(UserRow::as_select())
                    .for_update()
                    .first::<UserRow>(conn)
                    .await
                    .optional()?
                    .map(User::from)
                else {
                    return Ok(None);
                };
                if patch.is_empty() {
                    return Ok(Some(before));
                }

                let after = User::from(
                    diesel::update(users::table.find(id.get()))
                        .set(&changeset)
                        .returning(UserRow::as_returning())
                        .get_result::<UserRow>(conn)
                        .await?,
                );
                insert_audit_entry(conn, &audit::user_updated(ctx, &before, patch)).await?;
                Ok(Some(after))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
