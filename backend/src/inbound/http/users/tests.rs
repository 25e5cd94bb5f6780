//! Tests for users API handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::UserRegistrationService;
use crate::domain::ports::FixtureUserRepository;
use crate::inbound::http::validation::json_config;

#[fixture]
fn repository() -> Arc<FixtureUserRepository> {
    Arc::new(FixtureUserRepository::default())
}

fn test_app(
    repository: Arc<FixtureUserRepository>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(Arc::new(UserRegistrationService::new(repository)));
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .service(create_user)
}

async fn post_json(repository: Arc<FixtureUserRepository>, body: Value) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(repository)).await;
    let request = actix_test::TestRequest::post()
        .uri("/users")
        .set_json(&body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    let body: Value = actix_test::read_body_json(response).await;
    (status, body)
}

#[rstest]
#[actix_web::test]
async fn valid_user_is_created_and_echoed(repository: Arc<FixtureUserRepository>) {
    let (status, body) = post_json(
        Arc::clone(&repository),
        json!({ "name": "Ada Lovelace", "email": "ada@test.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({ "success": true, "data": { "name": "Ada Lovelace", "email": "ada@test.com" } })
    );
    assert_eq!(repository.users().len(), 1);
}

#[rstest]
#[case("ada@example.com")]
#[case("ada@TEST.COM")]
#[case("ada@test.com.evil")]
#[actix_web::test]
async fn foreign_domain_is_rejected_without_storing(
    repository: Arc<FixtureUserRepository>,
    #[case] email: &str,
) {
    let (status, body) = post_json(
        Arc::clone(&repository),
        json!({ "name": "Ada", "email": email }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "detail": "Email must be from @test.com domain" }));
    assert!(repository.users().is_empty());
}

#[rstest]
#[actix_web::test]
async fn missing_fields_are_each_reported(repository: Arc<FixtureUserRepository>) {
    let (status, body) = post_json(Arc::clone(&repository), json!({})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({
            "success": false,
            "message": "Validation failed",
            "errors": [
                { "type": "missing", "loc": ["body", "name"], "msg": "Field required", "input": {} },
                { "type": "missing", "loc": ["body", "email"], "msg": "Field required", "input": {} }
            ]
        })
    );
    assert!(repository.users().is_empty());
}

#[rstest]
#[case(json!({ "name": 7, "email": "ada@test.com" }), &["string_type"], &["name"])]
#[case(json!({ "name": "Ada", "email": null }), &["string_type"], &["email"])]
#[case(json!({ "name": "", "email": false }), &["string_too_short", "string_type"], &["name", "email"])]
#[case(json!({ "email": "ada@example.com" }), &["missing"], &["name"])]
#[actix_web::test]
async fn shape_violations_are_listed_per_field(
    repository: Arc<FixtureUserRepository>,
    #[case] payload: Value,
    #[case] kinds: &[&str],
    #[case] fields: &[&str],
) {
    let (status, body) = post_json(Arc::clone(&repository), payload).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = body["errors"].as_array().expect("errors array");
    let actual_kinds: Vec<&str> = errors.iter().filter_map(|e| e["type"].as_str()).collect();
    let actual_fields: Vec<&str> = errors.iter().filter_map(|e| e["loc"][1].as_str()).collect();
    assert_eq!(actual_kinds, kinds);
    assert_eq!(actual_fields, fields);
    assert!(repository.users().is_empty());
}

#[rstest]
#[actix_web::test]
async fn whitespace_only_name_is_accepted_verbatim(repository: Arc<FixtureUserRepository>) {
    let (status, body) = post_json(
        Arc::clone(&repository),
        json!({ "name": "   ", "email": "space@test.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "   ");
    assert_eq!(repository.users().len(), 1);
}

#[rstest]
#[actix_web::test]
async fn body_without_content_type_is_decoded_as_json(repository: Arc<FixtureUserRepository>) {
    let app = actix_test::init_service(test_app(Arc::clone(&repository))).await;
    let request = actix_test::TestRequest::post()
        .uri("/users")
        .set_payload(r#"{"name":"Ada","email":"ada@test.com"}"#)
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(repository.users().len(), 1);
}

#[rstest]
#[case(Some("application/json"))]
#[case(None)]
#[actix_web::test]
async fn empty_body_is_reported_missing(
    repository: Arc<FixtureUserRepository>,
    #[case] content_type: Option<&str>,
) {
    let app = actix_test::init_service(test_app(Arc::clone(&repository))).await;
    let mut request = actix_test::TestRequest::post().uri("/users");
    if let Some(content_type) = content_type {
        request = request.insert_header(("content-type", content_type));
    }

    let response = actix_test::call_service(&app, request.to_request()).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body["errors"],
        json!([{ "type": "missing", "loc": ["body"], "msg": "Field required", "input": null }])
    );
    assert!(repository.users().is_empty());
}

#[rstest]
#[case(json!(["Ada", "ada@test.com"]))]
#[case(json!("ada@test.com"))]
#[actix_web::test]
async fn non_object_body_is_rejected(
    repository: Arc<FixtureUserRepository>,
    #[case] payload: Value,
) {
    let (status, body) = post_json(repository, payload.clone()).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["type"], "model_attributes_type");
    assert_eq!(body["errors"][0]["loc"], json!(["body"]));
    assert_eq!(body["errors"][0]["input"], payload);
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_rejected(repository: Arc<FixtureUserRepository>) {
    let app = actix_test::init_service(test_app(Arc::clone(&repository))).await;
    let request = actix_test::TestRequest::post()
        .uri("/users")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"name\": ")
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"][0]["type"], "json_invalid");
    assert!(body["errors"][0]["ctx"]["error"].is_string());
    assert!(repository.users().is_empty());
}

#[rstest]
#[actix_web::test]
async fn wrong_content_type_is_a_validation_failure(repository: Arc<FixtureUserRepository>) {
    let app = actix_test::init_service(test_app(repository)).await;
    let request = actix_test::TestRequest::post()
        .uri("/users")
        .insert_header(("content-type", "text/plain"))
        .set_payload(r#"{"name":"Ada","email":"ada@test.com"}"#)
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[rstest]
#[actix_web::test]
async fn repeated_email_conflicts(repository: Arc<FixtureUserRepository>) {
    let app = actix_test::init_service(test_app(Arc::clone(&repository))).await;
    let payload = json!({ "name": "Ada", "email": "ada@test.com" });

    let first = actix_test::TestRequest::post()
        .uri("/users")
        .set_json(&payload)
        .to_request();
    let first = actix_test::call_service(&app, first).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = actix_test::TestRequest::post()
        .uri("/users")
        .set_json(&payload)
        .to_request();
    let second = actix_test::call_service(&app, second).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(second).await;
    assert_eq!(body, json!({ "detail": "Email already registered" }));
    assert_eq!(repository.users().len(), 1);
}

#[rstest]
#[actix_web::test]
async fn distinct_emails_get_distinct_ids(repository: Arc<FixtureUserRepository>) {
    let app = actix_test::init_service(test_app(Arc::clone(&repository))).await;

    for email in ["ada@test.com", "grace@test.com"] {
        let request = actix_test::TestRequest::post()
            .uri("/users")
            .set_json(json!({ "name": "Same Name", "email": email }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let ids: Vec<i32> = repository
        .users()
        .iter()
        .map(|user| user.id().as_i32())
        .collect();
    assert_eq!(ids, vec![1, 2]);
}
