//! Reusable questions.

use super::{QuestionId, UserId};

/// A stored question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub context: String,
    pub question: String,
    pub phase: String,
    pub section: String,
    pub answer_type: String,
    pub created_by: UserId,
}

/// Fields required to create a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub context: String,
    pub question: String,
    pub phase: String,
    pub section: String,
    pub answer_type: String,
    pub created_by: UserId,
}

impl NewQuestion {
    /// Attach the identifier assigned on insert.
    pub fn into_question(self, id: QuestionId) -> Question {
        Question {
            id,
            context: self.context,
            question: self.question,
            phase: self.phase,
            section: self.section,
            answer_type: self.answer_type,
            created_by: self.created_by,
        }
    }
}

/// Partial update for a question. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionPatch {
    pub context: Option<String>,
    pub question: Option<String>,
    pub phase: Option<String>,
    pub section: Option<String>,
    pub answer_type: Option<String>,
    pub created_by: Option<UserId>,
}

impl QuestionPatch {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.context.is_none()
            && self.question.is_none()
            && self.phase.is_none()
            && self.section.is_none()
            && self.answer_type.is_none()
            && self.created_by.is_none()
    }

    /// Apply the supplied fields to `question`.
    pub fn apply_to(&self, question: &mut Question) {
        let text_fields = [
            (&self.context, &mut question.context),
            (&self.question, &mut question.question),
            (&self.phase, &mut question.phase),
            (&self.section, &mut question.section),
            (&self.answer_type, &mut question.answer_type),
        ];
        for (update, target) in text_fields {
            if let Some(value) = update {
                target.clone_from(value);
            }
        }
        if let Some(created_by) = self.created_by {
            question.created_by = created_by;
        }
    }
}
