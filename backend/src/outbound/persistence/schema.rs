//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered users. `username` and `email` are unique.
    users (user_id) {
        user_id -> Int4,
        #[max_length = 50]
        username -> Varchar,
        #[max_length = 100]
        email -> Varchar,
        #[max_length = 255]
        password_hash -> Varchar,
    }
}

diesel::table! {
    /// Reusable questions authored by a user.
    questions (question_id) {
        question_id -> Int4,
        context -> Text,
        question -> Text,
        #[max_length = 50]
        phase -> Varchar,
        #[max_length = 50]
        section -> Varchar,
        #[max_length = 50]
        answer_type -> Varchar,
        created_by -> Int4,
    }
}

diesel::table! {
    /// Template metadata. `template_type` carries the API's `type` field.
    templates (template_id) {
        template_id -> Int4,
        #[max_length = 100]
        name -> Varchar,
        purpose -> Nullable<Text>,
        #[max_length = 50]
        template_type -> Varchar,
        created_by -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ordered question links. `position` carries the API's `order` field.
    template_questions (id) {
        id -> Int4,
        template_id -> Int4,
        question_id -> Int4,
        position -> Int4,
    }
}

diesel::table! {
    /// Per-template access grants, unique per (template_id, user_id).
    template_access (id) {
        id -> Int4,
        template_id -> Int4,
        user_id -> Int4,
        #[max_length = 20]
        access_type -> Varchar,
    }
}

diesel::table! {
    /// Global roles, at most one per user.
    user_roles (id) {
        id -> Int4,
        user_id -> Int4,
        #[max_length = 20]
        access_type -> Varchar,
    }
}

diesel::table! {
    /// Append-only audit trail.
    audit_entries (audit_id) {
        audit_id -> Int4,
        user_id -> Int4,
        #[max_length = 50]
        action_type -> Varchar,
        #[max_length = 50]
        entity_type -> Varchar,
        entity_id -> Int4,
        old_values -> Nullable<Text>,
        new_values -> Nullable<Text>,
        #[max_length = 45]
        ip_address -> Nullable<Varchar>,
        #[max_length = 255]
        user_agent -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(questions -> users (created_by));
diesel::joinable!(templates -> users (created_by));
diesel::joinable!(template_questions -> templates (template_id));
diesel::joinable!(template_questions -> questions (question_id));
diesel::joinable!(template_access -> templates (template_id));
diesel::joinable!(template_access -> users (user_id));
diesel::joinable!(user_roles -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    questions,
    templates,
    template_questions,
    template_access,
    user_roles,
    audit_entries,
);
