//! In-memory repositories for tests.
//!
//! [`InMemoryStore`] implements every repository port over one mutex-guarded
//! state, emulating the database constraints the Diesel adapters rely on:
//! unique keys become `Conflict`, dangling references become
//! `MissingReference`, and multi-row mutations either fully apply or leave
//! the state untouched. Audit entries are produced with the same builders the
//! Diesel adapters use.
//!
//! Compiled for unit tests and behind the `test-support` feature for
//! integration tests.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    AuditRepository, QuestionRepository, RepositoryError, RoleRepository,
    TemplateAccessRepository, TemplateQuestionRepository, TemplateRepository, UserRepository,
};
use crate::domain::{
    AccessType, AuditContext, AuditEntry, AuditFilter, AuditId, AuditPage, AuditServiceImpl,
    GlobalRole, NewAuditEntry, NewQuestion, NewTemplate, NewTemplateAccess,
    NewTemplateQuestionLink, NewUser, Question, QuestionId, QuestionPatch, QuestionServiceImpl,
    RoleServiceImpl, Template, TemplateAccess, TemplateAccessServiceImpl, TemplateId,
    TemplatePatch, TemplateQuestionLink, TemplateQuestionServiceImpl, TemplateServiceImpl, User,
    UserId, UserPatch, UserServiceImpl, audit, sort_links,
};
use crate::inbound::http::state::HttpStatePorts;

#[derive(Debug, Default)]
struct State {
    next_id: i32,
    users: Vec<User>,
    questions: Vec<Question>,
    templates: Vec<Template>,
    links: Vec<TemplateQuestionLink>,
    grants: Vec<TemplateAccess>,
    roles: Vec<GlobalRole>,
    audit: Vec<AuditEntry>,
}

impl State {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn record(&mut self, entry: NewAuditEntry) {
        let id = AuditId::new(self.allocate_id());
        self.audit.push(entry.into_entry(id, Utc::now()));
    }

    fn user_exists(&self, id: UserId) -> bool {
        self.users.iter().any(|user| user.id == id)
    }

    fn template_exists(&self, id: TemplateId) -> bool {
        self.templates.iter().any(|template| template.id == id)
    }

    fn require_user_reference(&self, id: UserId) -> Result<(), RepositoryError> {
        if self.user_exists(id) {
            Ok(())
        } else {
            Err(RepositoryError::missing_reference("User not found"))
        }
    }

    fn check_user_unique(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        except: Option<UserId>,
    ) -> Result<(), RepositoryError> {
        let others = || self.users.iter().filter(|user| Some(user.id) != except);
        if let Some(username) = username
            && others().any(|user| user.username == username)
        {
            return Err(RepositoryError::conflict("username already exists"));
        }
        if let Some(email) = email
            && others().any(|user| user.email == email)
        {
            return Err(RepositoryError::conflict("email already exists"));
        }
        Ok(())
    }

    fn template_links(&self, template_id: TemplateId) -> Vec<TemplateQuestionLink> {
        let mut links: Vec<_> = self
            .links
            .iter()
            .filter(|link| link.template_id == template_id)
            .cloned()
            .collect();
        sort_links(&mut links);
        links
    }
}

/// Shared in-memory backing store for every repository port.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::query("in-memory store lock poisoned"))
    }

    /// Insert a user without writing an audit entry, for test fixtures.
    pub fn seed_user(&self, username: &str, email: &str) -> Result<User, RepositoryError> {
        let mut state = self.state()?;
        state.check_user_unique(Some(username), Some(email), None)?;
        let user = User {
            id: UserId::new(state.allocate_id()),
            username: username.to_owned(),
            email: email.to_owned(),
            password_hash: "seeded".to_owned(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    /// Number of audit entries recorded so far.
    pub fn audit_len(&self) -> Result<usize, RepositoryError> {
        Ok(self.state()?.audit.len())
    }

    /// Wire the real domain services over this store.
    pub fn ports(self: &Arc<Self>) -> HttpStatePorts {
        HttpStatePorts {
            users: Arc::new(UserServiceImpl::new(Arc::clone(self))),
            questions: Arc::new(QuestionServiceImpl::new(Arc::clone(self), Arc::clone(self))),
            templates: Arc::new(TemplateServiceImpl::new(
                Arc::clone(self),
                Arc::clone(self),
                Arc::clone(self),
            )),
            template_access: Arc::new(TemplateAccessServiceImpl::new(
                Arc::clone(self),
                Arc::clone(self),
                Arc::clone(self),
            )),
            template_questions: Arc::new(TemplateQuestionServiceImpl::new(
                Arc::clone(self),
                Arc::clone(self),
            )),
            audit: Arc::new(AuditServiceImpl::new(Arc::clone(self), Arc::clone(self))),
            roles: Arc::new(RoleServiceImpl::new(Arc::clone(self), Arc::clone(self))),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &NewUser, ctx: &AuditContext) -> Result<User, RepositoryError> {
        let mut state = self.state()?;
        state.check_user_unique(Some(&user.username), Some(&user.email), None)?;
        let created = User {
            id: UserId::new(state.allocate_id()),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
        };
        state.users.push(created.clone());
        state.record(audit::user_created(ctx, &created));
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.state()?.users.iter().find(|user| user.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.state()?.users.clone())
    }

    async fn update(
        &self,
        id: UserId,
        patch: &UserPatch,
        ctx: &AuditContext,
    ) -> Result<Option<User>, RepositoryError> {
        let mut state = self.state()?;
        let Some(index) = state.users.iter().position(|user| user.id == id) else {
            return Ok(None);
        };
        let before = state.users[index].clone();
        if patch.is_empty() {
            return Ok(Some(before));
        }
        state.check_user_unique(patch.username.as_deref(), patch.email.as_deref(), Some(id))?;
        let mut after = before.clone();
        patch.apply_to(&mut after);
        state.users[index] = after.clone();
        state.record(audit::user_updated(ctx, &before, patch));
        Ok(Some(after))
    }
}

#[async_trait]
impl QuestionRepository for InMemoryStore {
    async fn create(
        &self,
        question: &NewQuestion,
        ctx: &AuditContext,
    ) -> Result<Question, RepositoryError> {
        let mut state = self.state()?;
        state.require_user_reference(question.created_by)?;
        let created = question
            .clone()
            .into_question(QuestionId::new(state.allocate_id()));
        state.questions.push(created.clone());
        state.record(audit::question_created(ctx, &created));
        Ok(created)
    }

    async fn find_by_id(&self, id: QuestionId) -> Result<Option<Question>, RepositoryError> {
        Ok(self
            .state()?
            .questions
            .iter()
            .find(|question| question.id == id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Question>, RepositoryError> {
        Ok(self.state()?.questions.clone())
    }

    async fn update(
        &self,
        id: QuestionId,
        patch: &QuestionPatch,
        ctx: &AuditContext,
    ) -> Result<Option<Question>, RepositoryError> {
        let mut state = self.state()?;
        let Some(index) = state.questions.iter().position(|question| question.id == id) else {
            return Ok(None);
        };
        let before = state.questions[index].clone();
        if patch.is_empty() {
            return Ok(Some(before));
        }
        if let Some(author) = patch.created_by {
            state.require_user_reference(author)?;
        }
        let mut after = before.clone();
        patch.apply_to(&mut after);
        state.questions[index] = after.clone();
        state.record(audit::question_updated(ctx, &before, &after, patch));
        Ok(Some(after))
    }

    async fn delete(
        &self,
        id: QuestionId,
        ctx: &AuditContext,
    ) -> Result<Option<Question>, RepositoryError> {
        let mut state = self.state()?;
        let Some(index) = state.questions.iter().position(|question| question.id == id) else {
            return Ok(None);
        };
        state.links.retain(|link| link.question_id != id);
        let removed = state.questions.remove(index);
        state.record(audit::question_deleted(ctx, &removed));
        Ok(Some(removed))
    }
}

#[async_trait]
impl TemplateRepository for InMemoryStore {
    async fn create(
        &self,
        template: &NewTemplate,
        ctx: &AuditContext,
    ) -> Result<Template, RepositoryError> {
        let mut state = self.state()?;
        state.require_user_reference(template.created_by)?;
        let now = Utc::now();
        let created = Template {
            id: TemplateId::new(state.allocate_id()),
            name: template.name.clone(),
            purpose: template.purpose.clone(),
            template_type: template.template_type.clone(),
            created_by: template.created_by,
            created_at: now,
            updated_at: now,
        };
        state.templates.push(created.clone());
        state.record(audit::template_created(ctx, &created));
        Ok(created)
    }

    async fn find_by_id(&self, id: TemplateId) -> Result<Option<Template>, RepositoryError> {
        Ok(self
            .state()?
            .templates
            .iter()
            .find(|template| template.id == id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Template>, RepositoryError> {
        Ok(self.state()?.templates.clone())
    }

    async fn update(
        &self,
        id: TemplateId,
        patch: &TemplatePatch,
        ctx: &AuditContext,
    ) -> Result<Option<Template>, RepositoryError> {
        let mut state = self.state()?;
        let Some(index) = state.templates.iter().position(|template| template.id == id) else {
            return Ok(None);
        };
        let before = state.templates[index].clone();
        if patch.is_empty() {
            return Ok(Some(before));
        }
        let mut after = before.clone();
        patch.apply_to(&mut after, Utc::now());
        state.templates[index] = after.clone();
        state.record(audit::template_updated(ctx, &before, patch));
        Ok(Some(after))
    }

    async fn delete(
        &self,
        id: TemplateId,
        ctx: &AuditContext,
    ) -> Result<Option<Template>, RepositoryError> {
        let mut state = self.state()?;
        let Some(index) = state.templates.iter().position(|template| template.id == id) else {
            return Ok(None);
        };
        state.links.retain(|link| link.template_id != id);
        state.grants.retain(|grant| grant.template_id != id);
        let removed = state.templates.remove(index);
        state.record(audit::template_deleted(ctx, &removed));
        Ok(Some(removed))
    }
}

#[async_trait]
impl TemplateAccessRepository for InMemoryStore {
    async fn grant(
        &self,
        grant: &NewTemplateAccess,
        ctx: &AuditContext,
    ) -> Result<TemplateAccess, RepositoryError> {
        let mut state = self.state()?;
        if !state.template_exists(grant.template_id) {
            return Err(RepositoryError::missing_reference("Template not found"));
        }
        state.require_user_reference(grant.user_id)?;
        if state
            .grants
            .iter()
            .any(|g| g.template_id == grant.template_id && g.user_id == grant.user_id)
        {
            return Err(RepositoryError::conflict(
                "User already has access to this template",
            ));
        }
        let created = TemplateAccess {
            id: state.allocate_id(),
            template_id: grant.template_id,
            user_id: grant.user_id,
            access_type: grant.access_type,
        };
        state.grants.push(created.clone());
        state.record(audit::access_granted(ctx, &created));
        Ok(created)
    }

    async fn list_for_template(
        &self,
        template_id: TemplateId,
    ) -> Result<Vec<TemplateAccess>, RepositoryError> {
        Ok(self
            .state()?
            .grants
            .iter()
            .filter(|grant| grant.template_id == template_id)
            .cloned()
            .collect())
    }

    async fn revoke(
        &self,
        template_id: TemplateId,
        user_id: UserId,
        ctx: &AuditContext,
    ) -> Result<Option<TemplateAccess>, RepositoryError> {
        let mut state = self.state()?;
        let Some(index) = state
            .grants
            .iter()
            .position(|g| g.template_id == template_id && g.user_id == user_id)
        else {
            return Ok(None);
        };
        let removed = state.grants.remove(index);
        state.record(audit::access_revoked(ctx, &removed));
        Ok(Some(removed))
    }
}

#[async_trait]
impl TemplateQuestionRepository for InMemoryStore {
    async fn replace(
        &self,
        template_id: TemplateId,
        links: &[NewTemplateQuestionLink],
        ctx: &AuditContext,
    ) -> Result<Vec<TemplateQuestionLink>, RepositoryError> {
        let mut state = self.state()?;
        if let Some(missing) = links
            .iter()
            .map(|link| link.question_id)
            .find(|id| !state.questions.iter().any(|question| question.id == *id))
        {
            return Err(RepositoryError::missing_reference(format!(
                "Question with ID {missing} not found"
            )));
        }
        if crate::domain::first_duplicate_question(links).is_some() {
            return Err(RepositoryError::conflict(
                "Question already linked to this template",
            ));
        }

        let previous = state.template_links(template_id);
        state.links.retain(|link| link.template_id != template_id);
        let mut current = Vec::with_capacity(links.len());
        for link in links {
            let stored = TemplateQuestionLink {
                id: state.allocate_id(),
                template_id,
                question_id: link.question_id,
                order: link.order,
            };
            state.links.push(stored.clone());
            current.push(stored);
        }
        sort_links(&mut current);
        state.record(audit::links_replaced(ctx, template_id, &previous, &current));
        Ok(current)
    }

    async fn ordered_questions(
        &self,
        template_id: TemplateId,
    ) -> Result<Vec<Question>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .template_links(template_id)
            .iter()
            .filter_map(|link| {
                state
                    .questions
                    .iter()
                    .find(|question| question.id == link.question_id)
                    .cloned()
            })
            .collect())
    }

    async fn remove(
        &self,
        template_id: TemplateId,
        question_id: QuestionId,
        ctx: &AuditContext,
    ) -> Result<Option<TemplateQuestionLink>, RepositoryError> {
        let mut state = self.state()?;
        let Some(index) = state
            .links
            .iter()
            .position(|link| link.template_id == template_id && link.question_id == question_id)
        else {
            return Ok(None);
        };
        let removed = state.links.remove(index);
        state.record(audit::link_removed(ctx, &removed));
        Ok(Some(removed))
    }
}

#[async_trait]
impl AuditRepository for InMemoryStore {
    async fn append(&self, entry: &NewAuditEntry) -> Result<AuditEntry, RepositoryError> {
        let mut state = self.state()?;
        let id = AuditId::new(state.allocate_id());
        let stored = entry.clone().into_entry(id, Utc::now());
        state.audit.push(stored.clone());
        Ok(stored)
    }

    async fn list(
        &self,
        filter: &AuditFilter,
        page: AuditPage,
    ) -> Result<Vec<AuditEntry>, RepositoryError> {
        let state = self.state()?;
        let mut matching: Vec<_> = state
            .audit
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(matching
            .into_iter()
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn find_by_id(&self, id: AuditId) -> Result<Option<AuditEntry>, RepositoryError> {
        Ok(self
            .state()?
            .audit
            .iter()
            .find(|entry| entry.id == id)
            .cloned())
    }
}

#[async_trait]
impl RoleRepository for InMemoryStore {
    async fn upsert(
        &self,
        user_id: UserId,
        access_type: AccessType,
    ) -> Result<GlobalRole, RepositoryError> {
        let mut state = self.state()?;
        state.require_user_reference(user_id)?;
        if let Some(role) = state.roles.iter_mut().find(|role| role.user_id == user_id) {
            role.access_type = access_type;
            return Ok(role.clone());
        }
        let role = GlobalRole {
            id: state.allocate_id(),
            user_id,
            access_type,
        };
        state.roles.push(role.clone());
        Ok(role)
    }

    async fn get_or_create(
        &self,
        user_id: UserId,
        default: AccessType,
    ) -> Result<GlobalRole, RepositoryError> {
        let mut state = self.state()?;
        if let Some(role) = state.roles.iter().find(|role| role.user_id == user_id) {
            return Ok(role.clone());
        }
        state.require_user_reference(user_id)?;
        let role = GlobalRole {
            id: state.allocate_id(),
            user_id,
            access_type: default,
        };
        state.roles.push(role.clone());
        Ok(role)
    }

    async fn list(&self) -> Result<Vec<GlobalRole>, RepositoryError> {
        Ok(self.state()?.roles.clone())
    }
}
