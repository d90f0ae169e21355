//! Audit trail queries and manual entries, implementing [`AuditService`].
//!
//! Manual entries must name an existing user; entries written by the
//! persistence adapters are not checked.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{AuditRepository, AuditService, UserRepository};
use crate::domain::user_service::require_user;
use crate::domain::{
    AuditEntry, AuditFilter, AuditId, AuditPage, Error, ManualAuditEntry, RequestOrigin,
};

#[derive(Clone)]
pub struct AuditServiceImpl<A, U> {
    entries: Arc<A>,
    users: Arc<U>,
}

impl<A, U> AuditServiceImpl<A, U> {
    pub fn new(entries: Arc<A>, users: Arc<U>) -> Self {
        Self { entries, users }
    }
}

#[async_trait]
impl<A, U> AuditService for AuditServiceImpl<A, U>
where
    A: AuditRepository,
    U: UserRepository,
{
    async fn record_entry(
        &self,
        entry: ManualAuditEntry,
        origin: RequestOrigin,
    ) -> Result<AuditEntry, Error> {
        require_user(self.users.as_ref(), entry.user_id).await?;
        let entry = entry.into_new_entry(&origin);
        Ok(self.entries.append(&entry).await?)
    }

    async fn list_entries(
        &self,
        filter: AuditFilter,
        page: AuditPage,
    ) -> Result<Vec<AuditEntry>, Error> {
        Ok(self.entries.list(&filter, page).await?)
    }

    async fn get_entry(&self, id: AuditId) -> Result<AuditEntry, Error> {
        self.entries
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("Audit log not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockAuditRepository, MockUserRepository};
    use crate::domain::{ActionType, EntityType, ErrorCode, User, UserId};
    use chrono::Utc;
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    fn manual_entry(user_id: i32) -> ManualAuditEntry {
        ManualAuditEntry {
            user_id: UserId::new(user_id),
            action_type: ActionType::Delete,
            entity_type: EntityType::User,
            entity_id: 4,
            old_values: None,
            new_values: None,
            ip_address: None,
            user_agent: None,
        }
    }

    #[fixture]
    fn known_users() -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|id| {
            Ok(Some(User {
                id,
                username: "auditor".into(),
                email: "auditor@example.com".into(),
                password_hash: "hash".into(),
            }))
        });
        users
    }

    #[rstest]
    #[tokio::test]
    async fn record_fills_origin_before_appending(known_users: MockUserRepository) {
        let mut repo = MockAuditRepository::new();
        repo.expect_append()
            .withf(|entry| {
                entry.ip_address.as_deref() == Some("192.0.2.1")
                    && entry.user_agent.as_deref() == Some("browser")
            })
            .return_once(|entry| Ok(entry.clone().into_entry(AuditId::new(1), Utc::now())));
        let service = AuditServiceImpl::new(Arc::new(repo), Arc::new(known_users));

        let entry = service
            .record_entry(
                manual_entry(1),
                RequestOrigin::new(Some("192.0.2.1".into()), Some("browser".into())),
            )
            .await
            .expect("recorded");

        assert_eq!(entry.id, AuditId::new(1));
    }

    #[rstest]
    #[tokio::test]
    async fn record_for_unknown_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(UserId::new(999_999)))
            .return_once(|_| Ok(None));
        let mut repo = MockAuditRepository::new();
        repo.expect_append().never();
        let service = AuditServiceImpl::new(Arc::new(repo), Arc::new(users));

        let err = service
            .record_entry(manual_entry(999_999), RequestOrigin::default())
            .await
            .expect_err("unknown user");

        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "User not found");
    }

    #[rstest]
    #[tokio::test]
    async fn list_passes_filter_and_page_through() {
        let filter = AuditFilter {
            entity_type: Some(EntityType::Question),
            entity_id: Some(3),
            ..AuditFilter::default()
        };
        let page = AuditPage { skip: 5, limit: 2 };
        let mut repo = MockAuditRepository::new();
        repo.expect_list()
            .with(eq(filter), eq(page))
            .times(1)
            .return_once(|_, _| Ok(Vec::new()));
        let service = AuditServiceImpl::new(Arc::new(repo), Arc::new(MockUserRepository::new()));

        let entries = service.list_entries(filter, page).await.expect("listed");

        assert!(entries.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_entry_is_not_found() {
        let mut repo = MockAuditRepository::new();
        repo.expect_find_by_id().return_once(|_| Ok(None));
        let service = AuditServiceImpl::new(Arc::new(repo), Arc::new(MockUserRepository::new()));

        let err = service.get_entry(AuditId::new(77)).await.expect_err("missing");

        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "Audit log not found");
    }
}
