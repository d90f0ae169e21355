//! Audit trail endpoints.
//!
//! ```text
//! POST /audit                     manual entry; origin filled from the request
//! GET  /audit?entity_type=QUESTION&entity_id=5&skip=0&limit=20
//! GET  /audit/{audit_id}
//! ```
//!
//! Listing filters set to zero or the empty string are ignored.

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    ActionType, AuditEntry, AuditFilter, AuditId, AuditPage, DEFAULT_AUDIT_LIMIT, EntityType,
    Error, ManualAuditEntry, RequestOrigin, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_enum};

const ACTION_TYPE: FieldName = FieldName::new("action_type");
const ENTITY_TYPE: FieldName = FieldName::new("entity_type");
const ACTION_TYPES: &str = "CREATE, UPDATE, DELETE";
const ENTITY_TYPES: &str = "QUESTION, TEMPLATE, USER";

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateAuditRequest {
    pub user_id: i32,
    #[schema(example = "UPDATE")]
    pub action_type: String,
    #[schema(example = "TEMPLATE")]
    pub entity_type: String,
    pub entity_id: i32,
    /// JSON object serialised as text.
    pub old_values: Option<String>,
    /// JSON object serialised as text.
    pub new_values: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl TryFrom<CreateAuditRequest> for ManualAuditEntry {
    type Error = Error;

    fn try_from(value: CreateAuditRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: UserId::new(value.user_id),
            action_type: parse_enum(&value.action_type, ACTION_TYPE, ACTION_TYPES)?,
            entity_type: parse_enum(&value.entity_type, ENTITY_TYPE, ENTITY_TYPES)?,
            entity_id: value.entity_id,
            old_values: value.old_values,
            new_values: value.new_values,
            ip_address: value.ip_address,
            user_agent: value.user_agent,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuditQuery {
    /// Entries to skip, default 0.
    pub skip: Option<u32>,
    /// Page size, default 100.
    pub limit: Option<u32>,
    pub user_id: Option<i32>,
    /// One of QUESTION, TEMPLATE, USER.
    pub entity_type: Option<String>,
    pub entity_id: Option<i32>,
    /// One of CREATE, UPDATE, DELETE.
    pub action_type: Option<String>,
}

fn non_zero(value: Option<i32>) -> Option<i32> {
    value.filter(|id| *id != 0)
}

fn parse_kind<T: std::str::FromStr>(
    value: Option<&str>,
    field: FieldName,
    expected: &str,
) -> Result<Option<T>, Error> {
    value
        .filter(|raw| !raw.is_empty())
        .map(|raw| parse_enum(raw, field, expected))
        .transpose()
}

impl AuditQuery {
    fn into_parts(self) -> Result<(AuditFilter, AuditPage), Error> {
        let filter = AuditFilter {
            user_id: non_zero(self.user_id).map(UserId::new),
            entity_type: parse_kind::<EntityType>(
                self.entity_type.as_deref(),
                ENTITY_TYPE,
                ENTITY_TYPES,
            )?,
            entity_id: non_zero(self.entity_id),
            action_type: parse_kind::<ActionType>(
                self.action_type.as_deref(),
                ACTION_TYPE,
                ACTION_TYPES,
            )?,
        };
        let page = AuditPage {
            skip: self.skip.unwrap_or(0),
            limit: self.limit.unwrap_or(DEFAULT_AUDIT_LIMIT),
        };
        Ok((filter, page))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct AuditResponse {
    pub audit_id: i32,
    pub user_id: i32,
    pub action_type: String,
    pub entity_type: String,
    pub entity_id: i32,
    pub old_values: Option<String>,
    pub new_values: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AuditEntry> for AuditResponse {
    fn from(entry: AuditEntry) -> Self {
        Self {
            audit_id: entry.id.get(),
            user_id: entry.user_id.get(),
            action_type: entry.action_type.as_str().to_owned(),
            entity_type: entry.entity_type.as_str().to_owned(),
            entity_id: entry.entity_id,
            old_values: entry.old_values,
            new_values: entry.new_values,
            ip_address: entry.ip_address,
            user_agent: entry.user_agent,
            created_at: entry.created_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/audit",
    request_body = CreateAuditRequest,
    responses(
        (status = 201, description = "Entry recorded", body = AuditResponse),
        (status = 400, description = "Unknown action or entity type", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["audit"],
    operation_id = "createAuditEntry"
)]
#[post("/audit")]
pub async fn create_entry(
    state: web::Data<HttpState>,
    origin: RequestOrigin,
    payload: web::Json<CreateAuditRequest>,
) -> ApiResult<HttpResponse> {
    let entry = ManualAuditEntry::try_from(payload.into_inner())?;
    let recorded = state.audit.record_entry(entry, origin).await?;
    Ok(HttpResponse::Created().json(AuditResponse::from(recorded)))
}

#[utoipa::path(
    get,
    path = "/audit",
    params(AuditQuery),
    responses(
        (status = 200, description = "Entries, newest first", body = [AuditResponse]),
        (status = 400, description = "Invalid filter", body = ErrorSchema)
    ),
    tags = ["audit"],
    operation_id = "listAuditEntries"
)]
#[get("/audit")]
pub async fn list_entries(
    state: web::Data<HttpState>,
    query: web::Query<AuditQuery>,
) -> ApiResult<web::Json<Vec<AuditResponse>>> {
    let (filter, page) = query.into_inner().into_parts()?;
    let entries = state.audit.list_entries(filter, page).await?;
    Ok(web::Json(entries.into_iter().map(AuditResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/audit/{audit_id}",
    params(("audit_id" = i32, Path, description = "Audit entry identifier")),
    responses(
        (status = 200, description = "Audit entry", body = AuditResponse),
        (status = 404, description = "Audit log not found", body = ErrorSchema)
    ),
    tags = ["audit"],
    operation_id = "getAuditEntry"
)]
#[get("/audit/{audit_id}")]
pub async fn get_entry(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<AuditResponse>> {
    let entry = state.audit.get_entry(AuditId::new(path.into_inner())).await?;
    Ok(web::Json(AuditResponse::from(entry)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{MockPorts, init_app};
    use actix_web::http::{StatusCode, header};
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn entry(id: i32) -> AuditEntry {
        AuditEntry {
            id: AuditId::new(id),
            user_id: UserId::new(1),
            action_type: ActionType::Update,
            entity_type: EntityType::Template,
            entity_id: 4,
            old_values: None,
            new_values: Some(r#"{"name":"x"}"#.into()),
            ip_address: Some("192.0.2.7".into()),
            user_agent: Some("curl/8.5".into()),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("", AuditFilter::default())]
    #[case("?user_id=0&entity_id=0&entity_type=&action_type=", AuditFilter::default())]
    #[case(
        "?entity_type=QUESTION&entity_id=5",
        AuditFilter {
            entity_type: Some(EntityType::Question),
            entity_id: Some(5),
            ..AuditFilter::default()
        }
    )]
    #[case(
        "?user_id=3&action_type=DELETE",
        AuditFilter {
            user_id: Some(UserId::new(3)),
            action_type: Some(ActionType::Delete),
            ..AuditFilter::default()
        }
    )]
    #[actix_web::test]
    async fn query_builds_filter(#[case] query: &str, #[case] expected: AuditFilter) {
        let mut ports = MockPorts::default();
        ports
            .audit
            .expect_list_entries()
            .withf(move |filter, page| *filter == expected && *page == AuditPage::default())
            .return_once(|_, _| Ok(vec![]));
        let app = init_app(ports).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/audit{query}"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn query_forwards_pagination() {
        let mut ports = MockPorts::default();
        ports
            .audit
            .expect_list_entries()
            .withf(|_, page| page.skip == 20 && page.limit == 10)
            .return_once(|_, _| Ok(vec![entry(2), entry(1)]));
        let app = init_app(ports).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/audit?skip=20&limit=10")
                .to_request(),
        )
        .await;

        let body: Vec<AuditResponse> = test::read_body_json(res).await;
        assert_eq!(body.len(), 2);
        assert_eq!(body[0].action_type, "UPDATE");
        assert_eq!(body[0].entity_type, "TEMPLATE");
    }

    #[rstest]
    #[case("?entity_type=question", "entity_type")]
    #[case("?action_type=PATCH", "action_type")]
    #[actix_web::test]
    async fn unknown_filter_value_is_rejected(#[case] query: &str, #[case] field: &str) {
        let mut ports = MockPorts::default();
        ports.audit.expect_list_entries().never();
        let app = init_app(ports).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/audit{query}"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn negative_skip_is_a_query_error() {
        let app = init_app(MockPorts::default()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/audit?skip=-1").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["code"], "invalid_query");
    }

    #[actix_web::test]
    async fn create_passes_the_request_origin() {
        let mut ports = MockPorts::default();
        ports
            .audit
            .expect_record_entry()
            .withf(|entry, origin| {
                entry.entity_type == EntityType::Template
                    && entry.ip_address.is_none()
                    && origin.user_agent() == Some("curl/8.5")
            })
            .return_once(|_, _| Ok(entry(9)));
        let app = init_app(ports).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/audit")
                .insert_header((header::USER_AGENT, "curl/8.5"))
                .set_json(json!({
                    "user_id": 1,
                    "action_type": "UPDATE",
                    "entity_type": "TEMPLATE",
                    "entity_id": 4
                }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: AuditResponse = test::read_body_json(res).await;
        assert_eq!(body.audit_id, 9);
    }
}
