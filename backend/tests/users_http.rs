//! End-to-end HTTP tests over the fully wired application.
//!
//! The app is built exactly as the server builds it, with the in-memory
//! repository standing in for PostgreSQL.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use rstest::rstest;
use serde_json::{Value, json};

use users_api::domain::TRACE_ID_HEADER;
use users_api::inbound::http::health::HealthState;
use users_api::inbound::http::state::HttpState;
use users_api::outbound::persistence::InMemoryUserRepository;
use users_api::server::{AppDependencies, build_app};

async fn app() -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    let health = HealthState::new();
    health.mark_ready();
    test::init_service(build_app(AppDependencies {
        http_state: web::Data::new(HttpState::from_repository(Arc::new(
            InMemoryUserRepository::new(),
        ))),
        health_state: web::Data::new(health),
    }))
    .await
}

async fn create(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    body: Value,
) -> (StatusCode, Value) {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/users/")
            .set_json(body)
            .to_request(),
    )
    .await;
    let status = res.status();
    (status, test::read_body_json(res).await)
}

#[rstest]
#[actix_web::test]
async fn user_lifecycle_round_trip() {
    let app = app().await;

    let (status, created) = create(&app, json!({ "name": "Ada", "email": "ada@x.com" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["name"], "Ada");
    assert_eq!(created["email"], "ada@x.com");
    let id = created["id"].as_str().expect("generated id").to_owned();
    let uri = format!("/users/{id}");

    let fetched: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(fetched, created);

    let updated: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "email": "ada2@x.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["name"], "Ada");
    assert_eq!(updated["email"], "ada2@x.com");

    let deleted: Value =
        test::call_and_read_body_json(&app, test::TestRequest::delete().uri(&uri).to_request())
            .await;
    assert_eq!(deleted["email"], "ada2@x.com");

    let after: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(after, Value::Null);
}

#[rstest]
#[actix_web::test]
async fn repeated_delete_returns_null_and_leaves_store_empty() {
    let app = app().await;
    let (_, created) = create(&app, json!({ "name": "Ada", "email": "ada@x.com" })).await;
    let uri = format!("/users/{}", created["id"].as_str().expect("generated id"));

    let first: Value =
        test::call_and_read_body_json(&app, test::TestRequest::delete().uri(&uri).to_request())
            .await;
    let second: Value =
        test::call_and_read_body_json(&app, test::TestRequest::delete().uri(&uri).to_request())
            .await;
    let listed: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/users/").to_request())
            .await;

    assert_eq!(first, created);
    assert_eq!(second, Value::Null);
    assert_eq!(listed, json!([]));
}

#[rstest]
#[actix_web::test]
async fn unknown_well_formed_id_reads_as_null() {
    let app = app().await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users/11111111-1111-1111-1111-111111111111")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, Value::Null);
}

#[rstest]
#[actix_web::test]
async fn list_includes_created_users() {
    let app = app().await;
    create(&app, json!({ "name": "Ada", "email": "ada@x.com" })).await;
    create(&app, json!({ "name": "Grace", "email": "grace@x.com" })).await;

    for uri in ["/users/", "/users"] {
        let listed: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri(uri).to_request())
                .await;
        let names: Vec<&str> = listed
            .as_array()
            .expect("array body")
            .iter()
            .filter_map(|user| user["name"].as_str())
            .collect();
        assert_eq!(names, ["Ada", "Grace"]);
    }
}

#[rstest]
#[case::get(test::TestRequest::get().uri("/nonexistent-path"))]
#[case::wrong_method(test::TestRequest::patch().uri("/users/"))]
#[actix_web::test]
async fn unknown_routes_get_plaintext_404(#[case] request: test::TestRequest) {
    let app = app().await;

    let res = test::call_service(&app, request.to_request()).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let body = test::read_body(res).await;
    assert_eq!(body.as_ref(), b"404, invalid route");
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_is_a_validation_error() {
    let app = app().await;
    create(&app, json!({ "name": "Ada", "email": "ada@x.com" })).await;

    let (status, body) = create(&app, json!({ "name": "Grace", "email": "ada@x.com" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], "duplicate_email");
}

#[rstest]
#[case(json!({ "name": "Ada", "email": "ada.x.com" }), "email")]
#[case(json!({ "email": "ada@x.com" }), "name")]
#[case(json!({ "name": "Ada" }), "email")]
#[actix_web::test]
async fn schema_violations_are_rejected(#[case] body: Value, #[case] field: &str) {
    let app = app().await;

    let (status, error) = create(&app, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"]["field"], field);
    assert!(error["traceId"].is_string());
}

#[rstest]
#[actix_web::test]
async fn updating_a_missing_user_is_not_found() {
    let app = app().await;

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/users/11111111-1111-1111-1111-111111111111")
            .set_json(json!({ "email": "ada2@x.com" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn readiness_probe_reports_ready() {
    let app = app().await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
        .await;

    assert_eq!(res.status(), StatusCode::OK);
}
