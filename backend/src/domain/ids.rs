//! Integer identifiers for the persisted aggregates.
//!
//! Each identifier wraps the `SERIAL` key assigned by the database so the
//! compiler keeps a question id from being passed where a template id is
//! expected.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw database key.
            #[must_use]
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            /// Raw database key.
            #[must_use]
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a [`crate::domain::User`].
    UserId
);
define_id!(
    /// Identifier of a [`crate::domain::Question`].
    QuestionId
);
define_id!(
    /// Identifier of a [`crate::domain::Template`].
    TemplateId
);
define_id!(
    /// Identifier of an [`crate::domain::AuditEntry`].
    AuditId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_as_bare_integer() {
        let value = serde_json::to_value(TemplateId::new(7)).expect("serialise");
        assert_eq!(value, serde_json::json!(7));
    }

    #[test]
    fn converts_to_and_from_raw_keys() {
        let id = QuestionId::from(12);
        assert_eq!(i32::from(id), 12);
        assert_eq!(id.to_string(), "12");
    }
}
