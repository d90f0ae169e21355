//! Test helpers for HTTP handler modules.
//!
//! [`MockPorts`] holds one mockall double per driving port; tests set
//! expectations on the ones they exercise and leave the rest untouched.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::{App, test, web};

use crate::domain::UserId;
use crate::domain::ports::{
    MockAuditService, MockQuestionService, MockRoleService, MockTemplateAccessService,
    MockTemplateQuestionService, MockTemplateService, MockUserService,
};
use crate::inbound::http::configure;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Caller identity used by handler tests.
pub(crate) const TEST_CALLER: UserId = UserId::new(1);

#[derive(Default)]
pub(crate) struct MockPorts {
    pub users: MockUserService,
    pub questions: MockQuestionService,
    pub templates: MockTemplateService,
    pub template_access: MockTemplateAccessService,
    pub template_questions: MockTemplateQuestionService,
    pub audit: MockAuditService,
    pub roles: MockRoleService,
}

impl MockPorts {
    pub(crate) fn into_state(self) -> HttpState {
        HttpState::new(
            HttpStatePorts {
                users: Arc::new(self.users),
                questions: Arc::new(self.questions),
                templates: Arc::new(self.templates),
                template_access: Arc::new(self.template_access),
                template_questions: Arc::new(self.template_questions),
                audit: Arc::new(self.audit),
                roles: Arc::new(self.roles),
            },
            TEST_CALLER,
        )
    }
}

/// Initialise the full route table over mocked ports.
pub(crate) async fn init_app(
    ports: MockPorts,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(ports.into_state()))
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .configure(configure),
    )
    .await
}
