//! Question handlers.
//!
//! ```text
//! POST   /questions        all fields required by the JSON shape
//! POST   /questions/add    fields optional in shape, validated as required
//! GET    /questions
//! GET    /questions/{question_id}
//! PUT    /questions/{question_id}
//! DELETE /questions/{question_id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, NewQuestion, Question, QuestionId, QuestionPatch, RequestOrigin, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::message::MessageResponse;
use crate::inbound::http::origin::Caller;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, TextField, optional_text, required, required_text, text,
};

const CONTEXT: TextField = TextField::unbounded("context");
const QUESTION: TextField = TextField::unbounded("question");
const PHASE: TextField = TextField::bounded("phase", 50);
const SECTION: TextField = TextField::bounded("section", 50);
const ANSWER_TYPE: TextField = TextField::bounded("answer_type", 50);
const CREATED_BY: FieldName = FieldName::new("created_by");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateQuestionRequest {
    #[schema(example = "Onboarding")]
    pub context: String,
    #[schema(example = "How did you hear about us?")]
    pub question: String,
    #[schema(example = "discovery")]
    pub phase: String,
    #[schema(example = "intro")]
    pub section: String,
    #[schema(example = "free_text")]
    pub answer_type: String,
    pub created_by: i32,
}

impl TryFrom<CreateQuestionRequest> for NewQuestion {
    type Error = Error;

    fn try_from(value: CreateQuestionRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            context: text(value.context, CONTEXT)?,
            question: text(value.question, QUESTION)?,
            phase: text(value.phase, PHASE)?,
            section: text(value.section, SECTION)?,
            answer_type: text(value.answer_type, ANSWER_TYPE)?,
            created_by: UserId::new(value.created_by),
        })
    }
}

/// Question fields, each optional in shape.
///
/// Used both by `/questions/add`, which then requires every field, and by
/// `PUT /questions/{question_id}`, which applies only the supplied ones.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct QuestionFields {
    pub context: Option<String>,
    pub question: Option<String>,
    pub phase: Option<String>,
    pub section: Option<String>,
    pub answer_type: Option<String>,
    pub created_by: Option<i32>,
}

impl QuestionFields {
    fn into_new_question(self) -> Result<NewQuestion, Error> {
        Ok(NewQuestion {
            context: required_text(self.context, CONTEXT)?,
            question: required_text(self.question, QUESTION)?,
            phase: required_text(self.phase, PHASE)?,
            section: required_text(self.section, SECTION)?,
            answer_type: required_text(self.answer_type, ANSWER_TYPE)?,
            created_by: UserId::new(required(self.created_by, CREATED_BY)?),
        })
    }

    fn into_patch(self) -> Result<QuestionPatch, Error> {
        Ok(QuestionPatch {
            context: optional_text(self.context, CONTEXT)?,
            question: optional_text(self.question, QUESTION)?,
            phase: optional_text(self.phase, PHASE)?,
            section: optional_text(self.section, SECTION)?,
            answer_type: optional_text(self.answer_type, ANSWER_TYPE)?,
            created_by: self.created_by.map(UserId::new),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct QuestionResponse {
    pub question_id: i32,
    pub context: String,
    pub question: String,
    pub phase: String,
    pub section: String,
    pub answer_type: String,
    pub created_by: i32,
}

impl From<Question> for QuestionResponse {
    fn from(question: Question) -> Self {
        Self {
            question_id: question.id.get(),
            context: question.context,
            question: question.question,
            phase: question.phase,
            section: question.section,
            answer_type: question.answer_type,
            created_by: question.created_by.get(),
        }
    }
}

async fn create(
    state: &HttpState,
    question: NewQuestion,
    caller: Caller,
    origin: RequestOrigin,
) -> ApiResult<HttpResponse> {
    let created = state
        .questions
        .create_question(question, caller.audit(origin))
        .await?;
    Ok(HttpResponse::Created().json(QuestionResponse::from(created)))
}

#[utoipa::path(
    post,
    path = "/questions",
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, description = "Question created", body = QuestionResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Author not found", body = ErrorSchema)
    ),
    tags = ["questions"],
    operation_id = "createQuestion"
)]
#[post("/questions")]
pub async fn create_question(
    state: web::Data<HttpState>,
    caller: Caller,
    origin: RequestOrigin,
    payload: web::Json<CreateQuestionRequest>,
) -> ApiResult<HttpResponse> {
    let question = NewQuestion::try_from(payload.into_inner())?;
    create(&state, question, caller, origin).await
}

#[utoipa::path(
    post,
    path = "/questions/add",
    request_body = QuestionFields,
    responses(
        (status = 201, description = "Question created", body = QuestionResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorSchema),
        (status = 404, description = "Author not found", body = ErrorSchema)
    ),
    tags = ["questions"],
    operation_id = "addQuestion"
)]
#[post("/questions/add")]
pub async fn add_question(
    state: web::Data<HttpState>,
    caller: Caller,
    origin: RequestOrigin,
    payload: web::Json<QuestionFields>,
) -> ApiResult<HttpResponse> {
    let question = payload.into_inner().into_new_question()?;
    create(&state, question, caller, origin).await
}

#[utoipa::path(
    get,
    path = "/questions",
    responses((status = 200, description = "All questions", body = [QuestionResponse])),
    tags = ["questions"],
    operation_id = "listQuestions"
)]
#[get("/questions")]
pub async fn list_questions(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<QuestionResponse>>> {
    let questions = state.questions.list_questions().await?;
    Ok(web::Json(
        questions.into_iter().map(QuestionResponse::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/questions/{question_id}",
    params(("question_id" = i32, Path, description = "Question identifier")),
    responses(
        (status = 200, description = "Question", body = QuestionResponse),
        (status = 404, description = "Question not found", body = ErrorSchema)
    ),
    tags = ["questions"],
    operation_id = "getQuestion"
)]
#[get("/questions/{question_id}")]
pub async fn get_question(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<QuestionResponse>> {
    let question = state
        .questions
        .get_question(QuestionId::new(path.into_inner()))
        .await?;
    Ok(web::Json(QuestionResponse::from(question)))
}

#[utoipa::path(
    put,
    path = "/questions/{question_id}",
    params(("question_id" = i32, Path, description = "Question identifier")),
    request_body = QuestionFields,
    responses(
        (status = 200, description = "Updated question", body = QuestionResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Question or author not found", body = ErrorSchema)
    ),
    tags = ["questions"],
    operation_id = "updateQuestion"
)]
#[put("/questions/{question_id}")]
pub async fn update_question(
    state: web::Data<HttpState>,
    caller: Caller,
    origin: RequestOrigin,
    path: web::Path<i32>,
    payload: web::Json<QuestionFields>,
) -> ApiResult<web::Json<QuestionResponse>> {
    let patch = payload.into_inner().into_patch()?;
    let question = state
        .questions
        .update_question(QuestionId::new(path.into_inner()), patch, caller.audit(origin))
        .await?;
    Ok(web::Json(QuestionResponse::from(question)))
}

#[utoipa::path(
    delete,
    path = "/questions/{question_id}",
    params(("question_id" = i32, Path, description = "Question identifier")),
    responses(
        (status = 200, description = "Question deleted", body = MessageResponse),
        (status = 404, description = "Question not found", body = ErrorSchema)
    ),
    tags = ["questions"],
    operation_id = "deleteQuestion"
)]
#[delete("/questions/{question_id}")]
pub async fn delete_question(
    state: web::Data<HttpState>,
    caller: Caller,
    origin: RequestOrigin,
    path: web::Path<i32>,
) -> ApiResult<web::Json<MessageResponse>> {
    state
        .questions
        .delete_question(QuestionId::new(path.into_inner()), caller.audit(origin))
        .await?;
    Ok(web::Json(MessageResponse::new("Question deleted successfully")))
}
