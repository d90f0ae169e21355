//! Ordered question list of a template.
//!
//! `POST` replaces the whole list with the JSON array in the body; the
//! replacement is all-or-nothing.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    NewTemplateQuestionLink, QuestionId, RequestOrigin, TemplateId, TemplateQuestionLink,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::message::MessageResponse;
use crate::inbound::http::origin::Caller;
use crate::inbound::http::questions::QuestionResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
pub struct LinkRequest {
    pub question_id: i32,
    pub order: i32,
}

impl From<LinkRequest> for NewTemplateQuestionLink {
    fn from(value: LinkRequest) -> Self {
        Self {
            question_id: QuestionId::new(value.question_id),
            order: value.order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct LinkResponse {
    pub id: i32,
    pub template_id: i32,
    pub question_id: i32,
    pub order: i32,
}

impl From<TemplateQuestionLink> for LinkResponse {
    fn from(link: TemplateQuestionLink) -> Self {
        Self {
            id: link.id,
            template_id: link.template_id.get(),
            question_id: link.question_id.get(),
            order: link.order,
        }
    }
}

#[utoipa::path(
    post,
    path = "/templates/{template_id}/questions",
    params(("template_id" = i32, Path, description = "Template identifier")),
    request_body = Vec<LinkRequest>,
    responses(
        (status = 201, description = "Question list replaced", body = [LinkResponse]),
        (status = 404, description = "Template or question not found", body = ErrorSchema),
        (status = 409, description = "Question listed more than once", body = ErrorSchema)
    ),
    tags = ["template-questions"],
    operation_id = "replaceTemplateQuestions"
)]
#[post("/templates/{template_id}/questions")]
pub async fn replace_questions(
    state: web::Data<HttpState>,
    caller: Caller,
    origin: RequestOrigin,
    path: web::Path<i32>,
    payload: web::Json<Vec<LinkRequest>>,
) -> ApiResult<HttpResponse> {
    let links = payload.into_inner().into_iter().map(Into::into).collect();
    let stored = state
        .template_questions
        .replace_questions(TemplateId::new(path.into_inner()), links, caller.audit(origin))
        .await?;
    let body: Vec<LinkResponse> = stored.into_iter().map(LinkResponse::from).collect();
    Ok(HttpResponse::Created().json(body))
}

#[utoipa::path(
    get,
    path = "/templates/{template_id}/questions",
    params(("template_id" = i32, Path, description = "Template identifier")),
    responses(
        (status = 200, description = "Questions in presentation order", body = [QuestionResponse]),
        (status = 404, description = "Template not found", body = ErrorSchema)
    ),
    tags = ["template-questions"],
    operation_id = "listTemplateQuestions"
)]
#[get("/templates/{template_id}/questions")]
pub async fn list_questions(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Vec<QuestionResponse>>> {
    let questions = state
        .template_questions
        .template_questions(TemplateId::new(path.into_inner()))
        .await?;
    Ok(web::Json(
        questions.into_iter().map(QuestionResponse::from).collect(),
    ))
}

#[utoipa::path(
    delete,
    path = "/templates/{template_id}/questions/{question_id}",
    params(
        ("template_id" = i32, Path, description = "Template identifier"),
        ("question_id" = i32, Path, description = "Question to unlink")
    ),
    responses(
        (status = 200, description = "Question unlinked", body = MessageResponse),
        (status = 404, description = "Template not found or question not in template", body = ErrorSchema)
    ),
    tags = ["template-questions"],
    operation_id = "removeTemplateQuestion"
)]
#[delete("/templates/{template_id}/questions/{question_id}")]
pub async fn remove_question(
    state: web::Data<HttpState>,
    caller: Caller,
    origin: RequestOrigin,
    path: web::Path<(i32, i32)>,
) -> ApiResult<web::Json<MessageResponse>> {
    let (template_id, question_id) = path.into_inner();
    state
        .template_questions
        .remove_question(
            TemplateId::new(template_id),
            QuestionId::new(question_id),
            caller.audit(origin),
        )
        .await?;
    Ok(web::Json(MessageResponse::new(
        "Question removed from template successfully",
    )))
}
