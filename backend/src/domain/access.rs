//! Access levels, per-template grants and global roles.

use std::fmt;
use std::str::FromStr;

use super::{TemplateId, UserId};

/// Access level granted to a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AccessType {
    Administrator,
    Editor,
    #[default]
    User,
}

impl AccessType {
    /// Stored and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::Editor => "editor",
            Self::User => "user",
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when text does not name a known access level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown access type: {0}")]
pub struct ParseAccessTypeError(pub String);

impl FromStr for AccessType {
    type Err = ParseAccessTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "administrator" => Ok(Self::Administrator),
            "editor" => Ok(Self::Editor),
            "user" => Ok(Self::User),
            other => Err(ParseAccessTypeError(other.to_owned())),
        }
    }
}

/// A user's access grant on one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateAccess {
    pub id: i32,
    pub template_id: TemplateId,
    pub user_id: UserId,
    pub access_type: AccessType,
}

/// Grant request for a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTemplateAccess {
    pub template_id: TemplateId,
    pub user_id: UserId,
    pub access_type: AccessType,
}

/// A user's system-wide role. At most one exists per user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalRole {
    pub id: i32,
    pub user_id: UserId,
    pub access_type: AccessType,
}
