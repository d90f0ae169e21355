//! End-to-end HTTP flows over the real domain services.
//!
//! The app is assembled the way the server does it (CORS, path
//! normalisation, tracing middleware, health endpoints, the full route table)
//! but backed by the in-memory store so the suite runs without PostgreSQL.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{Method, StatusCode, header};
use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::{App, test, web};
use questionnaire_backend::Trace;
use questionnaire_backend::domain::{TRACE_ID_HEADER, UserId};
use questionnaire_backend::inbound::http::configure;
use questionnaire_backend::inbound::http::cors::cors_layer;
use questionnaire_backend::inbound::http::health::{HealthState, live, ready};
use questionnaire_backend::inbound::http::state::HttpState;
use questionnaire_backend::test_support::InMemoryStore;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

struct Harness {
    store: Arc<InMemoryStore>,
    caller: UserId,
}

#[fixture]
fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let caller = store
        .seed_user("admin", "admin@example.com")
        .expect("seed caller")
        .id;
    Harness { store, caller }
}

async fn init(
    harness: &Harness,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    init_with_origins(harness, &[]).await
}

async fn init_with_origins(
    harness: &Harness,
    cors_origins: &[String],
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    let state = web::Data::new(HttpState::new(harness.store.ports(), harness.caller));
    test::init_service(
        App::new()
            .app_data(health)
            .app_data(state)
            .wrap(cors_layer(cors_origins))
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .wrap(Trace)
            .service(ready)
            .service(live)
            .configure(configure),
    )
    .await
}

async fn send<S, B>(app: &S, req: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, value)
}

fn question_body(created_by: i32, text: &str) -> Value {
    json!({
        "context": "Onboarding",
        "question": text,
        "phase": "p1",
        "section": "s1",
        "answer_type": "text",
        "created_by": created_by,
    })
}

#[rstest]
#[actix_rt::test]
async fn user_lifecycle_hides_password_and_rejects_duplicates(harness: Harness) {
    let app = init(&harness).await;

    let (status, created) = send(
        &app,
        test::TestRequest::post().uri("/users/").set_json(json!({
            "username": "ada",
            "email": "ada@example.com",
            "password_hash": "x",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created.get("password_hash").is_none());
    let user_id = created["user_id"].as_i64().expect("user id");

    let (status, dup) = send(
        &app,
        test::TestRequest::post().uri("/users").set_json(json!({
            "username": "ada",
            "email": "other@example.com",
            "password_hash": "x",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(dup["code"], "conflict");

    let (status, updated) = send(
        &app,
        test::TestRequest::put()
            .uri(&format!("/users/{user_id}"))
            .set_json(json!({ "email": "ada@new.example.com", "role": "administrator" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["email"], "ada@new.example.com");
    assert_eq!(updated["username"], "ada");

    let (status, missing) = send(&app, test::TestRequest::get().uri("/users/9999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["message"], "User not found");
}

#[rstest]
#[actix_rt::test]
async fn question_round_trip_and_partial_update(harness: Harness) {
    let app = init(&harness).await;
    let author = harness.caller.get();

    let (status, created) = send(
        &app,
        test::TestRequest::post()
            .uri("/questions/")
            .set_json(question_body(author, "Name?")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["question_id"].as_i64().expect("question id");

    let (status, fetched) =
        send(&app, test::TestRequest::get().uri(&format!("/questions/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let audit_before = harness.store.audit_len().expect("audit len");
    let (status, updated) = send(
        &app,
        test::TestRequest::put()
            .uri(&format!("/questions/{id}"))
            .set_json(json!({ "phase": "p2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["phase"], "p2");
    assert_eq!(updated["question"], "Name?");
    assert_eq!(harness.store.audit_len().expect("audit len"), audit_before + 1);

    let (status, entries) = send(
        &app,
        test::TestRequest::get().uri(&format!(
            "/audit?entity_type=QUESTION&entity_id={id}&action_type=UPDATE"
        )),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entry = &entries[0];
    let old: Value =
        serde_json::from_str(entry["old_values"].as_str().expect("old values")).expect("json");
    let new: Value =
        serde_json::from_str(entry["new_values"].as_str().expect("new values")).expect("json");
    assert_eq!(old["phase"], "p1");
    assert_eq!(old["question"], "Name?");
    assert_eq!(new, json!({ "phase": "p2" }));
}

#[rstest]
#[actix_rt::test]
async fn add_question_reports_missing_fields(harness: Harness) {
    let app = init(&harness).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/questions/add")
            .set_json(json!({ "context": "c", "question": "q" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], "missing_field");

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/questions/add")
            .set_json(question_body(4242, "Orphan?")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[rstest]
#[actix_rt::test]
async fn template_links_order_and_survive_failed_replace(harness: Harness) {
    let app = init(&harness).await;
    let author = harness.caller.get();

    let (_, template) = send(
        &app,
        test::TestRequest::post().uri("/templates").set_json(json!({
            "name": "Intake",
            "purpose": "Screening",
            "type": "survey",
            "created_by": author,
        })),
    )
    .await;
    let template_id = template["template_id"].as_i64().expect("template id");
    assert_eq!(template["type"], "survey");

    let mut question_ids = Vec::new();
    for text in ["First?", "Second?"] {
        let (_, q) = send(
            &app,
            test::TestRequest::post()
                .uri("/questions")
                .set_json(question_body(author, text)),
        )
        .await;
        question_ids.push(q["question_id"].as_i64().expect("question id"));
    }

    let (status, links) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/templates/{template_id}/questions"))
            .set_json(json!([
                { "question_id": question_ids[0], "order": 2 },
                { "question_id": question_ids[1], "order": 1 },
            ])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(links.as_array().map(Vec::len), Some(2));

    let (status, failure) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/templates/{template_id}/questions"))
            .set_json(json!([
                { "question_id": question_ids[0], "order": 1 },
                { "question_id": 999, "order": 2 },
            ])),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(failure["message"], "Question with ID 999 not found");

    let (status, detail) =
        send(&app, test::TestRequest::get().uri(&format!("/templates/{template_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let texts: Vec<_> = detail["questions"]
        .as_array()
        .expect("questions")
        .iter()
        .map(|q| q["question"].as_str().unwrap_or_default().to_owned())
        .collect();
    assert_eq!(texts, ["Second?", "First?"]);

    let (status, dup) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/templates/{template_id}/questions"))
            .set_json(json!([
                { "question_id": question_ids[0], "order": 1 },
                { "question_id": question_ids[0], "order": 2 },
            ])),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(dup["code"], "conflict");

    let (status, removed) = send(
        &app,
        test::TestRequest::delete().uri(&format!(
            "/templates/{template_id}/questions/{}",
            question_ids[0]
        )),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["message"], "Question removed from template successfully");

    let (status, again) = send(
        &app,
        test::TestRequest::delete().uri(&format!(
            "/templates/{template_id}/questions/{}",
            question_ids[0]
        )),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(again["message"], "Question not in template");
}

#[rstest]
#[actix_rt::test]
async fn template_delete_removes_links_and_grants(harness: Harness) {
    let app = init(&harness).await;
    let author = harness.caller.get();
    let grantee = harness
        .store
        .seed_user("grace", "grace@example.com")
        .expect("seed grantee")
        .id
        .get();

    let (_, template) = send(
        &app,
        test::TestRequest::post().uri("/templates").set_json(json!({
            "name": "Doomed",
            "type": "survey",
            "created_by": author,
        })),
    )
    .await;
    let template_id = template["template_id"].as_i64().expect("template id");
    let (_, q) = send(
        &app,
        test::TestRequest::post()
            .uri("/questions")
            .set_json(question_body(author, "Linked?")),
    )
    .await;

    send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/templates/{template_id}/questions"))
            .set_json(json!([{ "question_id": q["question_id"], "order": 1 }])),
    )
    .await;
    let (status, grant) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/templates/{template_id}/access"))
            .set_json(json!({ "user_id": grantee, "access_type": "editor" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(grant["access_type"], "editor");

    let (status, dup) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/templates/{template_id}/access"))
            .set_json(json!({ "user_id": grantee, "access_type": "user" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(dup["message"], "User already has access to this template");

    let (status, deleted) =
        send(&app, test::TestRequest::delete().uri(&format!("/templates/{template_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], "Template deleted successfully");

    let (status, _) =
        send(&app, test::TestRequest::get().uri(&format!("/templates/{template_id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &app,
        test::TestRequest::get().uri(&format!("/templates/{template_id}/access")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, question) = send(
        &app,
        test::TestRequest::get().uri(&format!("/questions/{}", q["question_id"])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(question["question"], "Linked?");
}

#[rstest]
#[actix_rt::test]
async fn global_role_defaults_to_user_once(harness: Harness) {
    let app = init(&harness).await;
    let user_id = harness.caller.get();

    let (status, role) =
        send(&app, test::TestRequest::get().uri(&format!("/user-roles/{user_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(role["access_type"], "user");
    assert_eq!(role["template_id"], Value::Null);

    send(&app, test::TestRequest::get().uri(&format!("/user-roles/{user_id}"))).await;
    let (status, roles) = send(&app, test::TestRequest::get().uri("/user-roles")).await;
    assert_eq!(status, StatusCode::OK);
    let mine = roles
        .as_array()
        .expect("roles")
        .iter()
        .filter(|r| r["user_id"] == json!(user_id))
        .count();
    assert_eq!(mine, 1);

    let (status, assigned) = send(
        &app,
        test::TestRequest::post()
            .uri("/user-roles")
            .set_json(json!({ "user_id": user_id, "access_type": "administrator" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(assigned["id"], role["id"]);
    assert_eq!(assigned["access_type"], "administrator");

    let (status, _) = send(&app, test::TestRequest::get().uri("/user-roles/9999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_rt::test]
async fn audit_listing_pages_newest_first(harness: Harness) {
    let app = init(&harness).await;
    let user_id = harness.caller.get();

    for entity_id in 1..=3 {
        let (status, _) = send(
            &app,
            test::TestRequest::post().uri("/audit").set_json(json!({
                "user_id": user_id,
                "action_type": "UPDATE",
                "entity_type": "TEMPLATE",
                "entity_id": entity_id,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, all) = send(&app, test::TestRequest::get().uri(&format!("/audit?user_id={user_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = all
        .as_array()
        .expect("entries")
        .iter()
        .map(|e| e["entity_id"].as_i64().unwrap_or_default())
        .collect();
    assert_eq!(ids, [3, 2, 1]);

    let (_, page) = send(
        &app,
        test::TestRequest::get().uri(&format!("/audit?user_id={user_id}&skip=1&limit=1")),
    )
    .await;
    assert_eq!(page.as_array().map(Vec::len), Some(1));
    assert_eq!(page[0]["entity_id"], 2);

    let audit_id = page[0]["audit_id"].as_i64().expect("audit id");
    let (status, fetched) =
        send(&app, test::TestRequest::get().uri(&format!("/audit/{audit_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, page[0]);

    let (status, bad) = send(&app, test::TestRequest::get().uri("/audit?entity_type=ROUTE")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(bad["details"]["code"], "invalid_value");
}

#[rstest]
#[actix_rt::test]
async fn manual_audit_entry_for_unknown_user_is_rejected(harness: Harness) {
    let app = init(&harness).await;
    let audit_before = harness.store.audit_len().expect("audit len");

    let (status, body) = send(
        &app,
        test::TestRequest::post().uri("/audit").set_json(json!({
            "user_id": 999_999,
            "action_type": "DELETE",
            "entity_type": "USER",
            "entity_id": 1,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
    assert_eq!(harness.store.audit_len().expect("audit len"), audit_before);
}

#[rstest]
#[actix_rt::test]
async fn malformed_json_yields_error_envelope_with_trace_id(harness: Harness) {
    let app = init(&harness).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/templates")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], "invalid_json");
    assert_eq!(body["trace_id"], header);
}

#[rstest]
#[case("/health/live")]
#[case("/health/ready")]
#[actix_rt::test]
async fn health_endpoints_are_not_cached(harness: Harness, #[case] path: &str) {
    let app = init(&harness).await;

    let res = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get("cache-control")
            .and_then(|value| value.to_str().ok()),
        Some("no-store")
    );
}

fn cors_header<B>(res: &ServiceResponse<B>, name: header::HeaderName) -> Option<String> {
    res.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

#[rstest]
#[actix_rt::test]
async fn preflight_from_any_origin_is_allowed_by_default(harness: Harness) {
    let app = init(&harness).await;

    let res = test::call_service(
        &app,
        test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/questions")
            .insert_header((header::ORIGIN, "http://localhost:3000"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
            .to_request(),
    )
    .await;

    assert!(res.status().is_success());
    assert_eq!(
        cors_header(&res, header::ACCESS_CONTROL_ALLOW_ORIGIN).as_deref(),
        Some("http://localhost:3000")
    );
    assert_eq!(
        cors_header(&res, header::ACCESS_CONTROL_ALLOW_CREDENTIALS).as_deref(),
        Some("true")
    );
    assert!(
        cors_header(&res, header::ACCESS_CONTROL_ALLOW_METHODS)
            .is_some_and(|methods| methods.contains("POST"))
    );
}

#[rstest]
#[actix_rt::test]
async fn configured_origins_restrict_cross_origin_requests(harness: Harness) {
    let origins = vec!["https://forms.example.com".to_owned()];
    let app = init_with_origins(&harness, &origins).await;

    let allowed = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/questions")
            .insert_header((header::ORIGIN, "https://forms.example.com"))
            .to_request(),
    )
    .await;
    assert_eq!(allowed.status(), StatusCode::OK);
    assert_eq!(
        cors_header(&allowed, header::ACCESS_CONTROL_ALLOW_ORIGIN).as_deref(),
        Some("https://forms.example.com")
    );

    let refused = test::call_service(
        &app,
        test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/questions")
            .insert_header((header::ORIGIN, "https://evil.example.net"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .to_request(),
    )
    .await;
    assert_eq!(refused.status(), StatusCode::BAD_REQUEST);
    assert_eq!(cors_header(&refused, header::ACCESS_CONTROL_ALLOW_ORIGIN), None);
}
