//! Audit trail entries and the builders describing each mutation.
//!
//! Every mutating operation produces exactly one [`NewAuditEntry`] through the
//! functions in this module. Persistence adapters call them inside the
//! transaction that performs the mutation, so the snapshot rules live in one
//! place regardless of the storage backend.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};

use super::{
    AuditId, Question, QuestionPatch, Template, TemplateAccess, TemplateId, TemplatePatch,
    TemplateQuestionLink, User, UserId, UserPatch,
};

/// Longest stored IP address (IPv6 text form).
pub const IP_ADDRESS_MAX_CHARS: usize = 45;
/// Longest stored user agent.
pub const USER_AGENT_MAX_CHARS: usize = 255;
/// Page size used when a listing does not ask for one.
pub const DEFAULT_AUDIT_LIMIT: u32 = 100;

/// Kind of mutation recorded by an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    Create,
    Update,
    Delete,
}

impl ActionType {
    /// Stored and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

/// Kind of entity an entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Question,
    Template,
    User,
}

impl EntityType {
    /// Stored and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Question => "QUESTION",
            Self::Template => "TEMPLATE",
            Self::User => "USER",
        }
    }
}

/// Raised when stored or supplied text names no known action or entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseAuditKindError {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for ActionType {
    type Err = ParseAuditKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "CREATE" => Ok(Self::Create),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            other => Err(ParseAuditKindError {
                kind: "action_type",
                value: other.to_owned(),
            }),
        }
    }
}

impl FromStr for EntityType {
    type Err = ParseAuditKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "QUESTION" => Ok(Self::Question),
            "TEMPLATE" => Ok(Self::Template),
            "USER" => Ok(Self::User),
            other => Err(ParseAuditKindError {
                kind: "entity_type",
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn truncate_chars(mut value: String, max: usize) -> String {
    if let Some((index, _)) = value.char_indices().nth(max) {
        value.truncate(index);
    }
    value
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

/// Network origin of the request that caused a mutation.
///
/// Values are truncated to the stored column widths on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOrigin {
    ip_address: Option<String>,
    user_agent: Option<String>,
}

impl RequestOrigin {
    pub fn new(ip_address: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            ip_address: non_empty(ip_address)
                .map(|ip| truncate_chars(ip, IP_ADDRESS_MAX_CHARS)),
            user_agent: non_empty(user_agent)
                .map(|agent| truncate_chars(agent, USER_AGENT_MAX_CHARS)),
        }
    }

    pub fn ip_address(&self) -> Option<&str> {
        self.ip_address.as_deref()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}

/// Who performed a mutation and from where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditContext {
    pub caller: UserId,
    pub origin: RequestOrigin,
}

impl AuditContext {
    pub fn new(caller: UserId, origin: RequestOrigin) -> Self {
        Self { caller, origin }
    }
}

/// A persisted audit entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub id: AuditId,
    pub user_id: UserId,
    pub action_type: ActionType,
    pub entity_type: EntityType,
    pub entity_id: i32,
    pub old_values: Option<String>,
    pub new_values: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An audit entry awaiting insertion.
///
/// `old_values` and `new_values` hold JSON text; an absent or empty
/// snapshot is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub user_id: UserId,
    pub action_type: ActionType,
    pub entity_type: EntityType,
    pub entity_id: i32,
    pub old_values: Option<String>,
    pub new_values: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl NewAuditEntry {
    fn describe(
        actor: UserId,
        action_type: ActionType,
        entity_type: EntityType,
        entity_id: i32,
        snapshots: (Option<Value>, Option<Value>),
        origin: &RequestOrigin,
    ) -> Self {
        let (old_values, new_values) = snapshots;
        Self {
            user_id: actor,
            action_type,
            entity_type,
            entity_id,
            old_values: old_values.and_then(encode_snapshot),
            new_values: new_values.and_then(encode_snapshot),
            ip_address: origin.ip_address.clone(),
            user_agent: origin.user_agent.clone(),
        }
    }

    /// Attach the identifier and timestamp assigned on insert.
    pub fn into_entry(self, id: AuditId, created_at: DateTime<Utc>) -> AuditEntry {
        AuditEntry {
            id,
            user_id: self.user_id,
            action_type: self.action_type,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            old_values: self.old_values,
            new_values: self.new_values,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            created_at,
        }
    }
}

fn encode_snapshot(value: Value) -> Option<String> {
    match &value {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        _ => Some(value.to_string()),
    }
}

/// Entry supplied directly by a client through the audit endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualAuditEntry {
    pub user_id: UserId,
    pub action_type: ActionType,
    pub entity_type: EntityType,
    pub entity_id: i32,
    pub old_values: Option<String>,
    pub new_values: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ManualAuditEntry {
    /// Fill a missing or empty IP address and user agent from `origin`.
    pub fn into_new_entry(self, origin: &RequestOrigin) -> NewAuditEntry {
        let supplied = RequestOrigin::new(self.ip_address, self.user_agent);
        NewAuditEntry {
            user_id: self.user_id,
            action_type: self.action_type,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            old_values: non_empty(self.old_values),
            new_values: non_empty(self.new_values),
            ip_address: supplied.ip_address.or_else(|| origin.ip_address.clone()),
            user_agent: supplied.user_agent.or_else(|| origin.user_agent.clone()),
        }
    }
}

/// Conjunctive filter over audit entries. `None` fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditFilter {
    pub user_id: Option<UserId>,
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<i32>,
    pub action_type: Option<ActionType>,
}

impl AuditFilter {
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        self.user_id.is_none_or(|id| id == entry.user_id)
            && self.entity_type.is_none_or(|kind| kind == entry.entity_type)
            && self.entity_id.is_none_or(|id| id == entry.entity_id)
            && self.action_type.is_none_or(|kind| kind == entry.action_type)
    }
}

/// Offset pagination for audit listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditPage {
    pub skip: u32,
    pub limit: u32,
}

impl Default for AuditPage {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_AUDIT_LIMIT,
        }
    }
}

fn user_snapshot(user: &User) -> Value {
    json!({ "username": user.username, "email": user.email })
}

fn user_patch_snapshot(patch: &UserPatch) -> Value {
    let mut map = Map::new();
    if let Some(username) = &patch.username {
        map.insert("username".into(), json!(username));
    }
    if let Some(email) = &patch.email {
        map.insert("email".into(), json!(email));
    }
    Value::Object(map)
}

fn question_snapshot(question: &Question) -> Value {
    json!({
        "context": question.context,
        "question": question.question,
        "phase": question.phase,
        "section": question.section,
        "answer_type": question.answer_type,
        "created_by": question.created_by.get(),
    })
}

fn question_patch_snapshot(patch: &QuestionPatch) -> Value {
    let mut map = Map::new();
    let text_fields = [
        ("context", &patch.context),
        ("question", &patch.question),
        ("phase", &patch.phase),
        ("section", &patch.section),
        ("answer_type", &patch.answer_type),
    ];
    for (key, value) in text_fields {
        if let Some(value) = value {
            map.insert(key.into(), json!(value));
        }
    }
    if let Some(created_by) = patch.created_by {
        map.insert("created_by".into(), json!(created_by.get()));
    }
    Value::Object(map)
}

fn template_snapshot(template: &Template) -> Value {
    json!({
        "name": template.name,
        "purpose": template.purpose,
        "type": template.template_type,
    })
}

fn template_full_snapshot(template: &Template) -> Value {
    let mut snapshot = template_snapshot(template);
    if let Value::Object(map) = &mut snapshot {
        map.insert("created_by".into(), json!(template.created_by.get()));
    }
    snapshot
}

fn template_patch_snapshot(patch: &TemplatePatch) -> Value {
    let mut map = Map::new();
    if let Some(name) = &patch.name {
        map.insert("name".into(), json!(name));
    }
    if let Some(purpose) = &patch.purpose {
        map.insert("purpose".into(), json!(purpose));
    }
    if let Some(template_type) = &patch.template_type {
        map.insert("type".into(), json!(template_type));
    }
    Value::Object(map)
}

fn grant_snapshot(grant: &TemplateAccess) -> Value {
    json!({ "user_id": grant.user_id.get(), "access_type": grant.access_type.as_str() })
}

fn links_snapshot(links: &[TemplateQuestionLink]) -> Value {
    let questions: Vec<Value> = links
        .iter()
        .map(|link| json!({ "question_id": link.question_id.get(), "order": link.order }))
        .collect();
    json!({ "questions": questions })
}

pub fn user_created(ctx: &AuditContext, user: &User) -> NewAuditEntry {
    NewAuditEntry::describe(
        ctx.caller,
        ActionType::Create,
        EntityType::User,
        user.id.get(),
        (None, Some(user_snapshot(user))),
        &ctx.origin,
    )
}

pub fn user_updated(ctx: &AuditContext, before: &User, patch: &UserPatch) -> NewAuditEntry {
    NewAuditEntry::describe(
        ctx.caller,
        ActionType::Update,
        EntityType::User,
        before.id.get(),
        (Some(user_snapshot(before)), Some(user_patch_snapshot(patch))),
        &ctx.origin,
    )
}

/// Questions are attributed to their author rather than the caller.
pub fn question_created(ctx: &AuditContext, question: &Question) -> NewAuditEntry {
    NewAuditEntry::describe(
        question.created_by,
        ActionType::Create,
        EntityType::Question,
        question.id.get(),
        (None, Some(question_snapshot(question))),
        &ctx.origin,
    )
}

/// Attributed to the author after the update; `new_values` holds only the
/// supplied fields.
pub fn question_updated(
    ctx: &AuditContext,
    before: &Question,
    after: &Question,
    patch: &QuestionPatch,
) -> NewAuditEntry {
    NewAuditEntry::describe(
        after.created_by,
        ActionType::Update,
        EntityType::Question,
        before.id.get(),
        (
            Some(question_snapshot(before)),
            Some(question_patch_snapshot(patch)),
        ),
        &ctx.origin,
    )
}

pub fn question_deleted(ctx: &AuditContext, question: &Question) -> NewAuditEntry {
    NewAuditEntry::describe(
        question.created_by,
        ActionType::Delete,
        EntityType::Question,
        question.id.get(),
        (Some(question_snapshot(question)), None),
        &ctx.origin,
    )
}

pub fn template_created(ctx: &AuditContext, template: &Template) -> NewAuditEntry {
    NewAuditEntry::describe(
        template.created_by,
        ActionType::Create,
        EntityType::Template,
        template.id.get(),
        (None, Some(template_full_snapshot(template))),
        &ctx.origin,
    )
}

pub fn template_updated(
    ctx: &AuditContext,
    before: &Template,
    patch: &TemplatePatch,
) -> NewAuditEntry {
    NewAuditEntry::describe(
        before.created_by,
        ActionType::Update,
        EntityType::Template,
        before.id.get(),
        (
            Some(template_snapshot(before)),
            Some(template_patch_snapshot(patch)),
        ),
        &ctx.origin,
    )
}

pub fn template_deleted(ctx: &AuditContext, template: &Template) -> NewAuditEntry {
    NewAuditEntry::describe(
        template.created_by,
        ActionType::Delete,
        EntityType::Template,
        template.id.get(),
        (Some(template_full_snapshot(template)), None),
        &ctx.origin,
    )
}

pub fn access_granted(ctx: &AuditContext, grant: &TemplateAccess) -> NewAuditEntry {
    NewAuditEntry::describe(
        ctx.caller,
        ActionType::Update,
        EntityType::Template,
        grant.template_id.get(),
        (None, Some(json!({ "access_granted": grant_snapshot(grant) }))),
        &ctx.origin,
    )
}

pub fn access_revoked(ctx: &AuditContext, grant: &TemplateAccess) -> NewAuditEntry {
    NewAuditEntry::describe(
        ctx.caller,
        ActionType::Update,
        EntityType::Template,
        grant.template_id.get(),
        (Some(json!({ "access_revoked": grant_snapshot(grant) })), None),
        &ctx.origin,
    )
}

pub fn links_replaced(
    ctx: &AuditContext,
    template_id: TemplateId,
    old: &[TemplateQuestionLink],
    new: &[TemplateQuestionLink],
) -> NewAuditEntry {
    NewAuditEntry::describe(
        ctx.caller,
        ActionType::Update,
        EntityType::Template,
        template_id.get(),
        (Some(links_snapshot(old)), Some(links_snapshot(new))),
        &ctx.origin,
    )
}

pub fn link_removed(ctx: &AuditContext, link: &TemplateQuestionLink) -> NewAuditEntry {
    let removed = json!({
        "question_removed": {
            "question_id": link.question_id.get(),
            "order": link.order,
        }
    });
    NewAuditEntry::describe(
        ctx.caller,
        ActionType::Update,
        EntityType::Template,
        link.template_id.get(),
        (Some(removed), None),
        &ctx.origin,
    )
}
