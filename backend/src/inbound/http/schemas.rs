//! OpenAPI schemas for domain error types.
//!
//! The domain error stays free of `ToSchema`; these mirrors are registered
//! under the domain names so generated clients see one error shape.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Malformed body, path or query, or a field failed validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The addressed or referenced record does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A unique constraint rejected the write.
    #[schema(rename = "conflict")]
    Conflict,
    /// The database could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    #[schema(example = "Template not found")]
    message: String,
    /// Request correlation id, echoed in the `trace-id` response header.
    #[schema(example = "6f1c1f1e-3d5b-4c8e-9a55-3f0b7c1c2a10")]
    trace_id: Option<String>,
    /// Validation context such as `{"field": "name", "code": "blank_field"}`.
    details: Option<serde_json::Value>,
}
