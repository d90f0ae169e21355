//! Templates and their ordered question links.

use chrono::{DateTime, Utc};

use super::{Question, QuestionId, TemplateId, UserId};

/// A stored template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub purpose: Option<String>,
    pub template_type: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTemplate {
    pub name: String,
    pub purpose: Option<String>,
    pub template_type: String,
    pub created_by: UserId,
}

/// Partial update for a template.
///
/// `purpose` is doubly optional: `Some(None)` clears the stored value while
/// `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub purpose: Option<Option<String>>,
    pub template_type: Option<String>,
}

impl TemplatePatch {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.purpose.is_none() && self.template_type.is_none()
    }

    /// Apply the supplied fields to `template`, stamping `updated_at` with
    /// `now` when anything was supplied.
    pub fn apply_to(&self, template: &mut Template, now: DateTime<Utc>) {
        if self.is_empty() {
            return;
        }
        if let Some(name) = &self.name {
            template.name.clone_from(name);
        }
        if let Some(purpose) = &self.purpose {
            template.purpose.clone_from(purpose);
        }
        if let Some(template_type) = &self.template_type {
            template.template_type.clone_from(template_type);
        }
        template.updated_at = now;
    }
}

/// A template together with its questions in presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDetail {
    pub template: Template,
    pub questions: Vec<Question>,
}

/// Placement of a question inside a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateQuestionLink {
    pub id: i32,
    pub template_id: TemplateId,
    pub question_id: QuestionId,
    pub order: i32,
}

/// Requested placement when replacing a template's question list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTemplateQuestionLink {
    pub question_id: QuestionId,
    pub order: i32,
}

/// First question id that appears more than once in `links`.
pub fn first_duplicate_question(links: &[NewTemplateQuestionLink]) -> Option<QuestionId> {
    let mut seen = std::collections::HashSet::with_capacity(links.len());
    links
        .iter()
        .map(|link| link.question_id)
        .find(|id| !seen.insert(*id))
}

/// Order links by position, breaking ties by link id.
pub fn sort_links(links: &mut [TemplateQuestionLink]) {
    links.sort_by_key(|link| (link.order, link.id));
}
