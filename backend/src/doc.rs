//! OpenAPI document for the JSON API.
//!
//! Served by Swagger UI in debug builds and printed by
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Questionnaire backend API",
        description = "Users, questions, templates, access grants and the audit trail."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::questions::create_question,
        crate::inbound::http::questions::add_question,
        crate::inbound::http::questions::list_questions,
        crate::inbound::http::questions::get_question,
        crate::inbound::http::questions::update_question,
        crate::inbound::http::questions::delete_question,
        crate::inbound::http::templates::create_template,
        crate::inbound::http::templates::list_templates,
        crate::inbound::http::templates::get_template,
        crate::inbound::http::templates::update_template,
        crate::inbound::http::templates::delete_template,
        crate::inbound::http::template_access::grant_access,
        crate::inbound::http::template_access::list_access,
        crate::inbound::http::template_access::revoke_access,
        crate::inbound::http::template_questions::replace_questions,
        crate::inbound::http::template_questions::list_questions,
        crate::inbound::http::template_questions::remove_question,
        crate::inbound::http::audit::create_entry,
        crate::inbound::http::audit::list_entries,
        crate::inbound::http::audit::get_entry,
        crate::inbound::http::roles::assign_role,
        crate::inbound::http::roles::get_role,
        crate::inbound::http::roles::list_roles,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "users", description = "Authoring users"),
        (name = "questions", description = "Reusable questions"),
        (name = "templates", description = "Templates and their metadata"),
        (name = "template-access", description = "Per-template access grants"),
        (name = "template-questions", description = "Ordered question list of a template"),
        (name = "audit", description = "Append-only audit trail"),
        (name = "roles", description = "Global roles"),
        (name = "health", description = "Liveness and readiness checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    #[test]
    fn error_schema_carries_envelope_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let RefOr::T(Schema::Object(error)) = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema")
        else {
            panic!("expected object schema");
        };
        for field in ["code", "message", "trace_id", "details"] {
            assert!(error.properties.contains_key(field), "missing {field}");
        }
    }

    #[rstest]
    #[case("/users/{user_id}")]
    #[case("/questions/add")]
    #[case("/templates/{template_id}/questions/{question_id}")]
    #[case("/templates/{template_id}/access/{user_id}")]
    #[case("/audit")]
    #[case("/user-roles/{user_id}")]
    #[case("/health/ready")]
    fn document_lists_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn template_delete_and_get_share_one_path_item() {
        let doc = ApiDoc::openapi();
        let item = doc
            .paths
            .paths
            .get("/templates/{template_id}")
            .expect("template path");
        assert!(item.get.is_some());
        assert!(item.put.is_some());
        assert!(item.delete.is_some());
    }
}
