//! Global role endpoints.
//!
//! `GET /user-roles/{user_id}` creates the default `user` role when the user
//! has none yet, so it is not a pure read.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AccessType, GlobalRole, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::template_access::{ACCESS_TYPE, ACCESS_TYPES};
use crate::inbound::http::validation::parse_enum;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AssignRoleRequest {
    pub user_id: i32,
    #[schema(example = "administrator")]
    pub access_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct RoleResponse {
    pub id: i32,
    pub user_id: i32,
    pub access_type: String,
    /// Always null: global roles apply across every template.
    pub template_id: Option<i32>,
}

impl From<GlobalRole> for RoleResponse {
    fn from(role: GlobalRole) -> Self {
        Self {
            id: role.id,
            user_id: role.user_id.get(),
            access_type: role.access_type.as_str().to_owned(),
            template_id: None,
        }
    }
}

#[utoipa::path(
    post,
    path = "/user-roles",
    request_body = AssignRoleRequest,
    responses(
        (status = 201, description = "Role assigned or replaced", body = RoleResponse),
        (status = 400, description = "Unknown access type", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["roles"],
    operation_id = "assignGlobalRole"
)]
#[post("/user-roles")]
pub async fn assign_role(
    state: web::Data<HttpState>,
    payload: web::Json<AssignRoleRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let access_type: AccessType = parse_enum(&request.access_type, ACCESS_TYPE, ACCESS_TYPES)?;
    let role = state
        .roles
        .assign_global_role(UserId::new(request.user_id), access_type)
        .await?;
    Ok(HttpResponse::Created().json(RoleResponse::from(role)))
}

#[utoipa::path(
    get,
    path = "/user-roles/{user_id}",
    params(("user_id" = i32, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Global role, created as `user` if absent", body = RoleResponse),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["roles"],
    operation_id = "getOrCreateGlobalRole"
)]
#[get("/user-roles/{user_id}")]
pub async fn get_role(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<RoleResponse>> {
    let role = state
        .roles
        .get_or_create_global_role(UserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(RoleResponse::from(role)))
}

#[utoipa::path(
    get,
    path = "/user-roles",
    responses((status = 200, description = "Every global role", body = [RoleResponse])),
    tags = ["roles"],
    operation_id = "listGlobalRoles"
)]
#[get("/user-roles")]
pub async fn list_roles(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<RoleResponse>>> {
    let roles = state.roles.list_global_roles().await?;
    Ok(web::Json(roles.into_iter().map(RoleResponse::from).collect()))
}
