//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each repository implements one domain port over a shared [`DbPool`].
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module; callers only see domain types and
//! [`RepositoryError`](crate::domain::ports::RepositoryError).
//!
//! Every mutation writes its audit row on the same transaction as the change.
//!
//! ```ignore
//! use questionnaire_backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/questionnaire")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_audit_repository;
mod diesel_question_repository;
mod diesel_role_repository;
mod diesel_template_access_repository;
mod diesel_template_question_repository;
mod diesel_template_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_audit_repository::DieselAuditRepository;
pub use diesel_question_repository::DieselQuestionRepository;
pub use diesel_role_repository::DieselRoleRepository;
pub use diesel_template_access_repository::DieselTemplateAccessRepository;
pub use diesel_template_question_repository::DieselTemplateQuestionRepository;
pub use diesel_template_repository::DieselTemplateRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
