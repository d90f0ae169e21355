//! Wire Diesel repositories into the domain services behind [`HttpState`].

use std::sync::Arc;

use questionnaire_backend::domain::{
    AuditServiceImpl, QuestionServiceImpl, RoleServiceImpl, TemplateAccessServiceImpl,
    TemplateQuestionServiceImpl, TemplateServiceImpl, UserId, UserServiceImpl,
};
use questionnaire_backend::inbound::http::state::{HttpState, HttpStatePorts};
use questionnaire_backend::outbound::persistence::{
    DbPool, DieselAuditRepository, DieselQuestionRepository, DieselRoleRepository,
    DieselTemplateAccessRepository, DieselTemplateQuestionRepository, DieselTemplateRepository,
    DieselUserRepository,
};

/// One repository per port, all sharing the pool.
struct Repositories {
    users: Arc<DieselUserRepository>,
    questions: Arc<DieselQuestionRepository>,
    templates: Arc<DieselTemplateRepository>,
    grants: Arc<DieselTemplateAccessRepository>,
    links: Arc<DieselTemplateQuestionRepository>,
    audit: Arc<DieselAuditRepository>,
    roles: Arc<DieselRoleRepository>,
}

impl Repositories {
    fn new(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            questions: Arc::new(DieselQuestionRepository::new(pool.clone())),
            templates: Arc::new(DieselTemplateRepository::new(pool.clone())),
            grants: Arc::new(DieselTemplateAccessRepository::new(pool.clone())),
            links: Arc::new(DieselTemplateQuestionRepository::new(pool.clone())),
            audit: Arc::new(DieselAuditRepository::new(pool.clone())),
            roles: Arc::new(DieselRoleRepository::new(pool.clone())),
        }
    }
}

pub(super) fn build_http_state(pool: &DbPool, caller: UserId) -> HttpState {
    let Repositories {
        users,
        questions,
        templates,
        grants,
        links,
        audit,
        roles,
    } = Repositories::new(pool);

    let ports = HttpStatePorts {
        users: Arc::new(UserServiceImpl::new(users.clone())),
        questions: Arc::new(QuestionServiceImpl::new(questions, users.clone())),
        templates: Arc::new(TemplateServiceImpl::new(
            templates.clone(),
            links.clone(),
            users.clone(),
        )),
        template_access: Arc::new(TemplateAccessServiceImpl::new(
            grants,
            templates.clone(),
            users.clone(),
        )),
        template_questions: Arc::new(TemplateQuestionServiceImpl::new(links, templates)),
        audit: Arc::new(AuditServiceImpl::new(audit, users.clone())),
        roles: Arc::new(RoleServiceImpl::new(roles, users)),
    };
    HttpState::new(ports, caller)
}
