//! Translation of pool and Diesel failures into [`RepositoryError`].
//!
//! Constraint violations carry client-facing messages chosen by constraint
//! name, so the HTTP layer can surface them verbatim as 409 or 404 bodies.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, warn};

use crate::domain::ports::RepositoryError;

use super::pool::PoolError;

pub(crate) fn map_pool_error(error: PoolError) -> RepositoryError {
    RepositoryError::connection(error.message())
}

fn unique_violation_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_username_key") => "username already exists",
        Some("users_email_key") => "email already exists",
        Some("template_access_template_user_key") => "User already has access to this template",
        Some("template_questions_template_question_key") => {
            "Question already linked to this template"
        }
        Some("user_roles_user_key") => "User already has a global role",
        other => {
            warn!(constraint = ?other, "unrecognised unique violation");
            "record already exists"
        }
    }
}

fn foreign_key_violation_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(
            "questions_created_by_fkey"
            | "templates_created_by_fkey"
            | "template_access_user_id_fkey"
            | "user_roles_user_id_fkey",
        ) => "User not found",
        Some("template_questions_template_id_fkey" | "template_access_template_id_fkey") => {
            "Template not found"
        }
        Some("template_questions_question_id_fkey") => "Question not found",
        other => {
            warn!(constraint = ?other, "unrecognised foreign key violation");
            "referenced record not found"
        }
    }
}

pub(crate) fn map_diesel_error(error: DieselError) -> RepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            RepositoryError::conflict(unique_violation_message(info.constraint_name()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            RepositoryError::missing_reference(foreign_key_violation_message(
                info.constraint_name(),
            ))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RepositoryError::connection("database connection error")
        }
        DieselError::NotFound => RepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => RepositoryError::query("database query error"),
        _ => RepositoryError::query("database error"),
    }
}

/// Error type for transactions that may abort on a domain rule as well as a
/// database failure. Either variant rolls the transaction back.
#[derive(Debug)]
pub(crate) enum TxError {
    Diesel(DieselError),
    Rejected(RepositoryError),
}

impl From<DieselError> for TxError {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}

impl From<TxError> for RepositoryError {
    fn from(error: TxError) -> Self {
        match error {
            TxError::Diesel(error) => map_diesel_error(error),
            TxError::Rejected(error) => error,
        }
    }
}
