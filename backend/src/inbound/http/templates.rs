//! Template handlers.
//!
//! `GET /templates/{template_id}` nests the template's questions in
//! presentation order. `PUT` applies only supplied fields; an explicit
//! `"purpose": null` clears the purpose.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, NewTemplate, RequestOrigin, Template, TemplateDetail, TemplateId, TemplatePatch,
    UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::message::MessageResponse;
use crate::inbound::http::origin::Caller;
use crate::inbound::http::questions::QuestionResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{TextField, optional_text, text};

const NAME: TextField = TextField::bounded("name", 100);
const TEMPLATE_TYPE: TextField = TextField::bounded("type", 50);

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateTemplateRequest {
    #[schema(example = "Customer onboarding")]
    pub name: String,
    pub purpose: Option<String>,
    #[serde(rename = "type")]
    #[schema(example = "survey")]
    pub template_type: String,
    pub created_by: i32,
}

impl TryFrom<CreateTemplateRequest> for NewTemplate {
    type Error = Error;

    fn try_from(value: CreateTemplateRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: text(value.name, NAME)?,
            purpose: value.purpose,
            template_type: text(value.template_type, TEMPLATE_TYPE)?,
            created_by: UserId::new(value.created_by),
        })
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent key
/// (`None`, through `#[serde(default)]`).
fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<String>)]
    pub purpose: Option<Option<String>>,
    #[serde(rename = "type")]
    pub template_type: Option<String>,
}

impl TryFrom<UpdateTemplateRequest> for TemplatePatch {
    type Error = Error;

    fn try_from(value: UpdateTemplateRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: optional_text(value.name, NAME)?,
            purpose: value.purpose,
            template_type: optional_text(value.template_type, TEMPLATE_TYPE)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct TemplateResponse {
    pub template_id: i32,
    pub name: String,
    pub purpose: Option<String>,
    #[serde(rename = "type")]
    pub template_type: String,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Template> for TemplateResponse {
    fn from(template: Template) -> Self {
        Self {
            template_id: template.id.get(),
            name: template.name,
            purpose: template.purpose,
            template_type: template.template_type,
            created_by: template.created_by.get(),
            created_at: template.created_at,
            updated_at: template.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct TemplateDetailResponse {
    #[serde(flatten)]
    pub template: TemplateResponse,
    pub questions: Vec<QuestionResponse>,
}

impl From<TemplateDetail> for TemplateDetailResponse {
    fn from(detail: TemplateDetail) -> Self {
        Self {
            template: detail.template.into(),
            questions: detail.questions.into_iter().map(Into::into).collect(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/templates",
    request_body = CreateTemplateRequest,
    responses(
        (status = 201, description = "Template created", body = TemplateResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Creator not found", body = ErrorSchema)
    ),
    tags = ["templates"],
    operation_id = "createTemplate"
)]
#[post("/templates")]
pub async fn create_template(
    state: web::Data<HttpState>,
    caller: Caller,
    origin: RequestOrigin,
    payload: web::Json<CreateTemplateRequest>,
) -> ApiResult<HttpResponse> {
    let template = NewTemplate::try_from(payload.into_inner())?;
    let created = state
        .templates
        .create_template(template, caller.audit(origin))
        .await?;
    Ok(HttpResponse::Created().json(TemplateResponse::from(created)))
}

#[utoipa::path(
    get,
    path = "/templates",
    responses((status = 200, description = "All templates", body = [TemplateResponse])),
    tags = ["templates"],
    operation_id = "listTemplates"
)]
#[get("/templates")]
pub async fn list_templates(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<TemplateResponse>>> {
    let templates = state.templates.list_templates().await?;
    Ok(web::Json(
        templates.into_iter().map(TemplateResponse::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/templates/{template_id}",
    params(("template_id" = i32, Path, description = "Template identifier")),
    responses(
        (status = 200, description = "Template with ordered questions", body = TemplateDetailResponse),
        (status = 404, description = "Template not found", body = ErrorSchema)
    ),
    tags = ["templates"],
    operation_id = "getTemplate"
)]
#[get("/templates/{template_id}")]
pub async fn get_template(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<TemplateDetailResponse>> {
    let detail = state
        .templates
        .get_template(TemplateId::new(path.into_inner()))
        .await?;
    Ok(web::Json(TemplateDetailResponse::from(detail)))
}

#[utoipa::path(
    put,
    path = "/templates/{template_id}",
    params(("template_id" = i32, Path, description = "Template identifier")),
    request_body = UpdateTemplateRequest,
    responses(
        (status = 200, description = "Updated template", body = TemplateResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Template not found", body = ErrorSchema)
    ),
    tags = ["templates"],
    operation_id = "updateTemplate"
)]
#[put("/templates/{template_id}")]
pub async fn update_template(
    state: web::Data<HttpState>,
    caller: Caller,
    origin: RequestOrigin,
    path: web::Path<i32>,
    payload: web::Json<UpdateTemplateRequest>,
) -> ApiResult<web::Json<TemplateResponse>> {
    let patch = TemplatePatch::try_from(payload.into_inner())?;
    let template = state
        .templates
        .update_template(TemplateId::new(path.into_inner()), patch, caller.audit(origin))
        .await?;
    Ok(web::Json(TemplateResponse::from(template)))
}

#[utoipa::path(
    delete,
    path = "/templates/{template_id}",
    params(("template_id" = i32, Path, description = "Template identifier")),
    responses(
        (status = 200, description = "Template, links and grants deleted", body = MessageResponse),
        (status = 404, description = "Template not found", body = ErrorSchema)
    ),
    tags = ["templates"],
    operation_id = "deleteTemplate"
)]
#[delete("/templates/{template_id}")]
pub async fn delete_template(
    state: web::Data<HttpState>,
    caller: Caller,
    origin: RequestOrigin,
    path: web::Path<i32>,
) -> ApiResult<web::Json<MessageResponse>> {
    state
        .templates
        .delete_template(TemplateId::new(path.into_inner()), caller.audit(origin))
        .await?;
    Ok(web::Json(MessageResponse::new("Template deleted successfully")))
}
