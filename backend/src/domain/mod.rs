//! Domain primitives, aggregates and services.
//!
//! Purpose: define the questionnaire authoring model (users, questions,
//! templates, access grants, global roles and the audit trail) free of
//! transport and storage concerns. Inbound adapters call the driving ports in
//! [`ports`]; outbound adapters implement the repository ports.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Entities and patches: User, Question, Template, TemplateAccess, GlobalRole.
//! - Audit builders in [`audit`] shared by every persistence adapter.
//! - `*ServiceImpl`: domain services implementing the driving ports.

pub mod access;
pub mod audit;
mod audit_service;
pub mod error;
mod ids;
pub mod ports;
pub mod question;
mod question_service;
mod role_service;
pub mod template;
mod template_access_service;
mod template_question_service;
mod template_service;
pub mod trace_id;
pub mod user;
mod user_service;

pub use self::access::{
    AccessType, GlobalRole, NewTemplateAccess, ParseAccessTypeError, TemplateAccess,
};
pub use self::audit::{
    ActionType, AuditContext, AuditEntry, AuditFilter, AuditPage, DEFAULT_AUDIT_LIMIT, EntityType,
    ManualAuditEntry, NewAuditEntry, ParseAuditKindError, RequestOrigin,
};
pub use self::audit_service::AuditServiceImpl;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::ids::{AuditId, QuestionId, TemplateId, UserId};
pub use self::question::{NewQuestion, Question, QuestionPatch};
pub use self::question_service::QuestionServiceImpl;
pub use self::role_service::RoleServiceImpl;
pub use self::template::{
    NewTemplate, NewTemplateQuestionLink, Template, TemplateDetail, TemplatePatch,
    TemplateQuestionLink, first_duplicate_question, sort_links,
};
pub use self::template_access_service::TemplateAccessServiceImpl;
pub use self::template_question_service::TemplateQuestionServiceImpl;
pub use self::template_service::TemplateServiceImpl;
pub use self::trace_id::TraceId;
pub use self::user::{NewUser, User, UserPatch};
pub use self::user_service::UserServiceImpl;
