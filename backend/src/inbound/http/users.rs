//! User handlers.
//!
//! ```text
//! POST /users            {"username":"ada","email":"ada@example.com","password_hash":"..."}
//! GET  /users
//! GET  /users/{user_id}
//! PUT  /users/{user_id}  {"email":"ada@example.org"}
//! ```
//!
//! Responses never include `password_hash`.

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{NewUser, RequestOrigin, User, UserId, UserPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::origin::Caller;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{TextField, optional_text, text};

const USERNAME: TextField = TextField::bounded("username", 50);
const EMAIL: TextField = TextField::bounded("email", 100);
const PASSWORD_HASH: TextField = TextField::bounded("password_hash", 255);

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password_hash: String,
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = crate::domain::Error;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            username: text(value.username, USERNAME)?,
            email: text(value.email, EMAIL)?,
            password_hash: text(value.password_hash, PASSWORD_HASH)?,
        })
    }
}

/// Partial user update. Unknown keys such as `role` are ignored.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl TryFrom<UpdateUserRequest> for UserPatch {
    type Error = crate::domain::Error;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            username: optional_text(value.username, USERNAME)?,
            email: optional_text(value.email, EMAIL)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct UserResponse {
    pub user_id: i32,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id.get(),
            username: user.username,
            email: user.email,
        }
    }
}

#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Username or email already exists", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    caller: Caller,
    origin: RequestOrigin,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let user = NewUser::try_from(payload.into_inner())?;
    let created = state.users.create_user(user, caller.audit(origin)).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(created)))
}

#[utoipa::path(
    get,
    path = "/users",
    responses((status = 200, description = "All users", body = [UserResponse])),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users.list_users().await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(("user_id" = i32, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.users.get_user(UserId::new(path.into_inner())).await?;
    Ok(web::Json(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/users/{user_id}",
    params(("user_id" = i32, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 409, description = "Username or email already exists", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{user_id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    caller: Caller,
    origin: RequestOrigin,
    path: web::Path<i32>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let patch = UserPatch::try_from(payload.into_inner())?;
    let user = state
        .users
        .update_user(UserId::new(path.into_inner()), patch, caller.audit(origin))
        .await?;
    Ok(web::Json(UserResponse::from(user)))
}
