//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by the persistence adapters;
//! driving ports (`*Service`) are implemented by the domain services and
//! consumed by the HTTP adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod audit_repository;
mod audit_service;
mod question_repository;
mod question_service;
mod repository_error;
mod role_repository;
mod role_service;
mod template_access_repository;
mod template_access_service;
mod template_question_repository;
mod template_question_service;
mod template_repository;
mod template_service;
mod user_repository;
mod user_service;

pub use audit_repository::AuditRepository;
#[cfg(test)]
pub use audit_repository::MockAuditRepository;
#[cfg(test)]
pub use audit_service::MockAuditService;
pub use audit_service::AuditService;
#[cfg(test)]
pub use question_repository::MockQuestionRepository;
pub use question_repository::QuestionRepository;
#[cfg(test)]
pub use question_service::MockQuestionService;
pub use question_service::QuestionService;
pub use repository_error::RepositoryError;
#[cfg(test)]
pub use role_repository::MockRoleRepository;
pub use role_repository::RoleRepository;
#[cfg(test)]
pub use role_service::MockRoleService;
pub use role_service::RoleService;
#[cfg(test)]
pub use template_access_repository::MockTemplateAccessRepository;
pub use template_access_repository::TemplateAccessRepository;
#[cfg(test)]
pub use template_access_service::MockTemplateAccessService;
pub use template_access_service::TemplateAccessService;
#[cfg(test)]
pub use template_question_repository::MockTemplateQuestionRepository;
pub use template_question_repository::TemplateQuestionRepository;
#[cfg(test)]
pub use template_question_service::MockTemplateQuestionService;
pub use template_question_service::TemplateQuestionService;
#[cfg(test)]
pub use template_repository::MockTemplateRepository;
pub use template_repository::TemplateRepository;
#[cfg(test)]
pub use template_service::MockTemplateService;
pub use template_service::TemplateService;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
#[cfg(test)]
pub use user_service::MockUserService;
pub use user_service::UserService;
