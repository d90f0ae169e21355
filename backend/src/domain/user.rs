//! User accounts.

use super::UserId;

/// A stored user account.
///
/// `password_hash` is opaque to the service: it is stored as supplied and
/// never returned by the HTTP adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Fields required to create a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial update for a user. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UserPatch {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none()
    }

    /// Apply the supplied fields to `user`.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username.clone_from(username);
        }
        if let Some(email) = &self.email {
            user.email.clone_from(email);
        }
    }
}
