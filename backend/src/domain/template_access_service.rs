//! Per-template access grants, implementing [`TemplateAccessService`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    TemplateAccessRepository, TemplateAccessService, TemplateRepository, UserRepository,
};
use crate::domain::template_service::require_template;
use crate::domain::user_service::require_user;
use crate::domain::{AuditContext, Error, NewTemplateAccess, TemplateAccess, TemplateId, UserId};

#[derive(Clone)]
pub struct TemplateAccessServiceImpl<A, T, U> {
    grants: Arc<A>,
    templates: Arc<T>,
    users: Arc<U>,
}

impl<A, T, U> TemplateAccessServiceImpl<A, T, U> {
    pub fn new(grants: Arc<A>, templates: Arc<T>, users: Arc<U>) -> Self {
        Self {
            grants,
            templates,
            users,
        }
    }
}

#[async_trait]
impl<A, T, U> TemplateAccessService for TemplateAccessServiceImpl<A, T, U>
where
    A: TemplateAccessRepository,
    T: TemplateRepository,
    U: UserRepository,
{
    async fn grant_access(
        &self,
        grant: NewTemplateAccess,
        audit: AuditContext,
    ) -> Result<TemplateAccess, Error> {
        require_template(self.templates.as_ref(), grant.template_id).await?;
        require_user(self.users.as_ref(), grant.user_id).await?;
        let created = self.grants.grant(&grant, &audit).await?;
        info!(
            template_id = %grant.template_id,
            user_id = %grant.user_id,
            access_type = %grant.access_type,
            "template access granted"
        );
        Ok(created)
    }

    async fn list_access(&self, template_id: TemplateId) -> Result<Vec<TemplateAccess>, Error> {
        require_template(self.templates.as_ref(), template_id).await?;
        Ok(self.grants.list_for_template(template_id).await?)
    }

    async fn revoke_access(
        &self,
        template_id: TemplateId,
        user_id: UserId,
        audit: AuditContext,
    ) -> Result<TemplateAccess, Error> {
        require_template(self.templates.as_ref(), template_id).await?;
        let revoked = self
            .grants
            .revoke(template_id, user_id, &audit)
            .await?
            .ok_or_else(|| Error::not_found("Access record not found"))?;
        info!(%template_id, %user_id, "template access revoked");
        Ok(revoked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockTemplateAccessRepository, MockTemplateRepository, MockUserRepository, RepositoryError,
    };
    use crate::domain::{AccessType, ErrorCode, RequestOrigin, Template, User};
    use chrono::Utc;
    use rstest::{fixture, rstest};

    #[fixture]
    fn audit() -> AuditContext {
        AuditContext::new(UserId::new(1), RequestOrigin::default())
    }

    fn templates_with(found: bool) -> MockTemplateRepository {
        let mut templates = MockTemplateRepository::new();
        templates.expect_find_by_id().returning(move |id| {
            let now = Utc::now();
            Ok(found.then(|| Template {
                id,
                name: "Audit".into(),
                purpose: None,
                template_type: "checklist".into(),
                created_by: UserId::new(1),
                created_at: now,
                updated_at: now,
            }))
        });
        templates
    }

    fn users_with(found: bool) -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(move |id| {
            Ok(found.then(|| User {
                id,
                username: "dave".into(),
                email: "dave@example.com".into(),
                password_hash: "h".into(),
            }))
        });
        users
    }

    fn grant() -> NewTemplateAccess {
        NewTemplateAccess {
            template_id: TemplateId::new(2),
            user_id: UserId::new(3),
            access_type: AccessType::Editor,
        }
    }

    #[rstest]
    #[case(false, true, "Template not found")]
    #[case(true, false, "User not found")]
    #[tokio::test]
    async fn grant_checks_template_then_user(
        audit: AuditContext,
        #[case] template_exists: bool,
        #[case] user_exists: bool,
        #[case] message: &str,
    ) {
        let mut grants = MockTemplateAccessRepository::new();
        grants.expect_grant().never();
        let service = TemplateAccessServiceImpl::new(
            Arc::new(grants),
            Arc::new(templates_with(template_exists)),
            Arc::new(users_with(user_exists)),
        );

        let err = service
            .grant_access(grant(), audit)
            .await
            .expect_err("rejected");

        assert_eq!(err.message(), message);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_grant_is_conflict(audit: AuditContext) {
        let mut grants = MockTemplateAccessRepository::new();
        grants.expect_grant().return_once(|_, _| {
            Err(RepositoryError::conflict(
                "User already has access to this template",
            ))
        });
        let service = TemplateAccessServiceImpl::new(
            Arc::new(grants),
            Arc::new(templates_with(true)),
            Arc::new(users_with(true)),
        );

        let err = service
            .grant_access(grant(), audit)
            .await
            .expect_err("duplicate");

        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn revoke_without_grant_is_not_found(audit: AuditContext) {
        let mut grants = MockTemplateAccessRepository::new();
        grants.expect_revoke().return_once(|_, _, _| Ok(None));
        let service = TemplateAccessServiceImpl::new(
            Arc::new(grants),
            Arc::new(templates_with(true)),
            Arc::new(users_with(true)),
        );

        let err = service
            .revoke_access(TemplateId::new(2), UserId::new(3), audit)
            .await
            .expect_err("missing grant");

        assert_eq!(err.message(), "Access record not found");
    }
}
