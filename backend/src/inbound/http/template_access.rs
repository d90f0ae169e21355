//! Per-template access grants.
//!
//! The template in the path is authoritative; a `template_id` in the grant
//! body is accepted for compatibility and ignored.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AccessType, NewTemplateAccess, RequestOrigin, TemplateAccess, TemplateId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::message::MessageResponse;
use crate::inbound::http::origin::Caller;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_enum};

pub(crate) const ACCESS_TYPE: FieldName = FieldName::new("access_type");
pub(crate) const ACCESS_TYPES: &str = "administrator, editor, user";

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct GrantAccessRequest {
    pub template_id: Option<i32>,
    pub user_id: i32,
    #[schema(example = "editor")]
    pub access_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct AccessResponse {
    pub id: i32,
    pub template_id: i32,
    pub user_id: i32,
    #[schema(example = "editor")]
    pub access_type: String,
}

impl From<TemplateAccess> for AccessResponse {
    fn from(grant: TemplateAccess) -> Self {
        Self {
            id: grant.id,
            template_id: grant.template_id.get(),
            user_id: grant.user_id.get(),
            access_type: grant.access_type.as_str().to_owned(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/templates/{template_id}/access",
    params(("template_id" = i32, Path, description = "Template identifier")),
    request_body = GrantAccessRequest,
    responses(
        (status = 201, description = "Access granted", body = AccessResponse),
        (status = 400, description = "Unknown access type", body = ErrorSchema),
        (status = 404, description = "Template or user not found", body = ErrorSchema),
        (status = 409, description = "User already has access", body = ErrorSchema)
    ),
    tags = ["template-access"],
    operation_id = "grantTemplateAccess"
)]
#[post("/templates/{template_id}/access")]
pub async fn grant_access(
    state: web::Data<HttpState>,
    caller: Caller,
    origin: RequestOrigin,
    path: web::Path<i32>,
    payload: web::Json<GrantAccessRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let access_type: AccessType = parse_enum(&request.access_type, ACCESS_TYPE, ACCESS_TYPES)?;
    let grant = NewTemplateAccess {
        template_id: TemplateId::new(path.into_inner()),
        user_id: UserId::new(request.user_id),
        access_type,
    };
    let created = state
        .template_access
        .grant_access(grant, caller.audit(origin))
        .await?;
    Ok(HttpResponse::Created().json(AccessResponse::from(created)))
}

#[utoipa::path(
    get,
    path = "/templates/{template_id}/access",
    params(("template_id" = i32, Path, description = "Template identifier")),
    responses(
        (status = 200, description = "Grants on the template", body = [AccessResponse]),
        (status = 404, description = "Template not found", body = ErrorSchema)
    ),
    tags = ["template-access"],
    operation_id = "listTemplateAccess"
)]
#[get("/templates/{template_id}/access")]
pub async fn list_access(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Vec<AccessResponse>>> {
    let grants = state
        .template_access
        .list_access(TemplateId::new(path.into_inner()))
        .await?;
    Ok(web::Json(grants.into_iter().map(AccessResponse::from).collect()))
}

#[utoipa::path(
    delete,
    path = "/templates/{template_id}/access/{user_id}",
    params(
        ("template_id" = i32, Path, description = "Template identifier"),
        ("user_id" = i32, Path, description = "User whose grant is removed")
    ),
    responses(
        (status = 200, description = "Access removed", body = MessageResponse),
        (status = 404, description = "Template or grant not found", body = ErrorSchema)
    ),
    tags = ["template-access"],
    operation_id = "revokeTemplateAccess"
)]
#[delete("/templates/{template_id}/access/{user_id}")]
pub async fn revoke_access(
    state: web::Data<HttpState>,
    caller: Caller,
    origin: RequestOrigin,
    path: web::Path<(i32, i32)>,
) -> ApiResult<web::Json<MessageResponse>> {
    let (template_id, user_id) = path.into_inner();
    state
        .template_access
        .revoke_access(
            TemplateId::new(template_id),
            UserId::new(user_id),
            caller.audit(origin),
        )
        .await?;
    Ok(web::Json(MessageResponse::new("Access removed successfully")))
}
