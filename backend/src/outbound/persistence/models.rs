//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and never
//! leave it. Conversions into domain types live alongside the rows.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::warn;

use crate::domain::ports::RepositoryError;
use crate::domain::{
    AccessType, AuditEntry, AuditId, GlobalRole, NewAuditEntry, NewQuestion, NewTemplate, NewUser,
    Question, QuestionId, QuestionPatch, Template, TemplateAccess, TemplateId, TemplatePatch,
    TemplateQuestionLink, User, UserId, UserPatch,
};

use super::schema::{
    audit_entries, questions, template_access, template_questions, templates, user_roles, users,
};

fn unrecognised(column: &'static str, value: &str) -> RepositoryError {
    warn!(column, value, "unrecognised stored value");
    RepositoryError::query(format!("unrecognised {column} value: {value}"))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.user_id),
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            username: &user.username,
            email: &user.email,
            password_hash: &user.password_hash,
        }
    }
}

/// `None` fields are left out of the generated `UPDATE`.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub username: Option<&'a str>,
    pub email: Option<&'a str>,
}

impl<'a> From<&'a UserPatch> for UserChangeset<'a> {
    fn from(patch: &'a UserPatch) -> Self {
        Self {
            username: patch.username.as_deref(),
            email: patch.email.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = questions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct QuestionRow {
    pub question_id: i32,
    pub context: String,
    pub question: String,
    pub phase: String,
    pub section: String,
    pub answer_type: String,
    pub created_by: i32,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Self {
            id: QuestionId::new(row.question_id),
            context: row.context,
            question: row.question,
            phase: row.phase,
            section: row.section,
            answer_type: row.answer_type,
            created_by: UserId::new(row.created_by),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = questions)]
pub(crate) struct NewQuestionRow<'a> {
    pub context: &'a str,
    pub question: &'a str,
    pub phase: &'a str,
    pub section: &'a str,
    pub answer_type: &'a str,
    pub created_by: i32,
}

impl<'a> From<&'a NewQuestion> for NewQuestionRow<'a> {
    fn from(question: &'a NewQuestion) -> Self {
        Self {
            context: &question.context,
            question: &question.question,
            phase: &question.phase,
            section: &question.section,
            answer_type: &question.answer_type,
            created_by: question.created_by.get(),
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = questions)]
pub(crate) struct QuestionChangeset<'a> {
    pub context: Option<&'a str>,
    pub question: Option<&'a str>,
    pub phase: Option<&'a str>,
    pub section: Option<&'a str>,
    pub answer_type: Option<&'a str>,
    pub created_by: Option<i32>,
}

impl<'a> From<&'a QuestionPatch> for QuestionChangeset<'a> {
    fn from(patch: &'a QuestionPatch) -> Self {
        Self {
            context: patch.context.as_deref(),
            question: patch.question.as_deref(),
            phase: patch.phase.as_deref(),
            section: patch.section.as_deref(),
            answer_type: patch.answer_type.as_deref(),
            created_by: patch.created_by.map(UserId::get),
        }
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TemplateRow {
    pub template_id: i32,
    pub name: String,
    pub purpose: Option<String>,
    pub template_type: String,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TemplateRow> for Template {
    fn from(row: TemplateRow) -> Self {
        Self {
            id: TemplateId::new(row.template_id),
            name: row.name,
            purpose: row.purpose,
            template_type: row.template_type,
            created_by: UserId::new(row.created_by),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = templates)]
pub(crate) struct NewTemplateRow<'a> {
    pub name: &'a str,
    pub purpose: Option<&'a str>,
    pub template_type: &'a str,
    pub created_by: i32,
}

impl<'a> From<&'a NewTemplate> for NewTemplateRow<'a> {
    fn from(template: &'a NewTemplate) -> Self {
        Self {
            name: &template.name,
            purpose: template.purpose.as_deref(),
            template_type: &template.template_type,
            created_by: template.created_by.get(),
        }
    }
}

/// `purpose: Some(None)` writes `NULL`; `None` leaves the column untouched.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = templates)]
pub(crate) struct TemplateChangeset<'a> {
    pub name: Option<&'a str>,
    pub purpose: Option<Option<&'a str>>,
    pub template_type: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> TemplateChangeset<'a> {
    pub fn new(patch: &'a TemplatePatch, updated_at: DateTime<Utc>) -> Self {
        Self {
            name: patch.name.as_deref(),
            purpose: patch.purpose.as_ref().map(Option::as_deref),
            template_type: patch.template_type.as_deref(),
            updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Template question links
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = template_questions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TemplateQuestionRow {
    pub id: i32,
    pub template_id: i32,
    pub question_id: i32,
    pub position: i32,
}

impl From<TemplateQuestionRow> for TemplateQuestionLink {
    fn from(row: TemplateQuestionRow) -> Self {
        Self {
            id: row.id,
            template_id: TemplateId::new(row.template_id),
            question_id: QuestionId::new(row.question_id),
            order: row.position,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = template_questions)]
pub(crate) struct NewTemplateQuestionRow {
    pub template_id: i32,
    pub question_id: i32,
    pub position: i32,
}

// ---------------------------------------------------------------------------
// Access grants and global roles
// ---------------------------------------------------------------------------

fn parse_access_type(value: &str) -> Result<AccessType, RepositoryError> {
    value
        .parse()
        .map_err(|_| unrecognised("access_type", value))
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = template_access)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TemplateAccessRow {
    pub id: i32,
    pub template_id: i32,
    pub user_id: i32,
    pub access_type: String,
}

impl TryFrom<TemplateAccessRow> for TemplateAccess {
    type Error = RepositoryError;

    fn try_from(row: TemplateAccessRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            template_id: TemplateId::new(row.template_id),
            user_id: UserId::new(row.user_id),
            access_type: parse_access_type(&row.access_type)?,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = template_access)]
pub(crate) struct NewTemplateAccessRow {
    pub template_id: i32,
    pub user_id: i32,
    pub access_type: &'static str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRoleRow {
    pub id: i32,
    pub user_id: i32,
    pub access_type: String,
}

impl TryFrom<UserRoleRow> for GlobalRole {
    type Error = RepositoryError;

    fn try_from(row: UserRoleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: UserId::new(row.user_id),
            access_type: parse_access_type(&row.access_type)?,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user_roles)]
pub(crate) struct NewUserRoleRow {
    pub user_id: i32,
    pub access_type: &'static str,
}

// ---------------------------------------------------------------------------
// Audit trail
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = audit_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AuditRow {
    pub audit_id: i32,
    pub user_id: i32,
    pub action_type: String,
    pub entity_type: String,
    pub entity_id: i32,
    pub old_values: Option<String>,
    pub new_values: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AuditRow> for AuditEntry {
    type Error = RepositoryError;

    fn try_from(row: AuditRow) -> Result<Self, Self::Error> {
        let action_type = row
            .action_type
            .parse()
            .map_err(|_| unrecognised("action_type", &row.action_type))?;
        let entity_type = row
            .entity_type
            .parse()
            .map_err(|_| unrecognised("entity_type", &row.entity_type))?;
        Ok(Self {
            id: AuditId::new(row.audit_id),
            user_id: UserId::new(row.user_id),
            action_type,
            entity_type,
            entity_id: row.entity_id,
            old_values: row.old_values,
            new_values: row.new_values,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = audit_entries)]
pub(crate) struct NewAuditRow<'a> {
    pub user_id: i32,
    pub action_type: &'static str,
    pub entity_type: &'static str,
    pub entity_id: i32,
    pub old_values: Option<&'a str>,
    pub new_values: Option<&'a str>,
    pub ip_address: Option<&'a str>,
    pub user_agent: Option<&'a str>,
}

impl<'a> From<&'a NewAuditEntry> for NewAuditRow<'a> {
    fn from(entry: &'a NewAuditEntry) -> Self {
        Self {
            user_id: entry.user_id.get(),
            action_type: entry.action_type.as_str(),
            entity_type: entry.entity_type.as_str(),
            entity_id: entry.entity_id,
            old_values: entry.old_values.as_deref(),
            new_values: entry.new_values.as_deref(),
            ip_address: entry.ip_address.as_deref(),
            user_agent: entry.user_agent.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActionType, EntityType};

    fn audit_row(action_type: &str) -> AuditRow {
        AuditRow {
            audit_id: 1,
            user_id: 2,
            action_type: action_type.to_owned(),
            entity_type: "TEMPLATE".to_owned(),
            entity_id: 3,
            old_values: None,
            new_values: Some("{}".to_owned()),
            ip_address: None,
            user_agent: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn audit_row_decodes_known_kinds() {
        let entry = AuditEntry::try_from(audit_row("DELETE")).expect("decodes");
        assert_eq!(entry.action_type, ActionType::Delete);
        assert_eq!(entry.entity_type, EntityType::Template);
    }

    #[test]
    fn audit_row_rejects_unknown_action() {
        let err = AuditEntry::try_from(audit_row("ARCHIVE")).expect_err("unknown action");
        assert!(matches!(err, RepositoryError::Query { .. }));
    }

    #[test]
    fn template_changeset_distinguishes_clear_from_skip() {
        let now = Utc::now();
        let clear = TemplatePatch {
            purpose: Some(None),
            ..TemplatePatch::default()
        };
        let skip = TemplatePatch::default();

        assert_eq!(TemplateChangeset::new(&clear, now).purpose, Some(None));
        assert_eq!(TemplateChangeset::new(&skip, now).purpose, None);
    }
}
