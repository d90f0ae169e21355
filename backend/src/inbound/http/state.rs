//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data<HttpState>` and only ever talk to
//! driving ports, so tests can swap in mocks or the in-memory store.

use std::sync::Arc;

use crate::domain::UserId;
use crate::domain::ports::{
    AuditService, QuestionService, RoleService, TemplateAccessService, TemplateQuestionService,
    TemplateService, UserService,
};

/// Parameter object bundling every driving port.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserService>,
    pub questions: Arc<dyn QuestionService>,
    pub templates: Arc<dyn TemplateService>,
    pub template_access: Arc<dyn TemplateAccessService>,
    pub template_questions: Arc<dyn TemplateQuestionService>,
    pub audit: Arc<dyn AuditService>,
    pub roles: Arc<dyn RoleService>,
}

#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserService>,
    pub questions: Arc<dyn QuestionService>,
    pub templates: Arc<dyn TemplateService>,
    pub template_access: Arc<dyn TemplateAccessService>,
    pub template_questions: Arc<dyn TemplateQuestionService>,
    pub audit: Arc<dyn AuditService>,
    pub roles: Arc<dyn RoleService>,
    /// Identity recorded as the actor of every audited mutation.
    pub caller: UserId,
}

impl HttpState {
    pub fn new(ports: HttpStatePorts, caller: UserId) -> Self {
        let HttpStatePorts {
            users,
            questions,
            templates,
            template_access,
            template_questions,
            audit,
            roles,
        } = ports;
        Self {
            users,
            questions,
            templates,
            template_access,
            template_questions,
            audit,
            roles,
            caller,
        }
    }
}
