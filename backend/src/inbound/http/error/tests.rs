//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use actix_web::{App, test as actix_test};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn body_of(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("ascii header").to_owned());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("JSON body");
    (status, header, body)
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("connection string leaked")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"secret": "x"}));

    let (status, header, body) = body_of(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));
    assert_eq!(
        body,
        json!({
            "error": "Internal server error",
            "code": "internal_error",
            "traceId": TRACE_ID,
        })
    );
}

#[rstest]
#[actix_web::test]
async fn storage_outages_hide_driver_text(expected_trace_id: String) {
    let error = Error::service_unavailable(
        "user repository unavailable: password authentication failed for user \"catalog\" host=10.0.0.5",
    )
    .with_trace_id(expected_trace_id.clone());

    let (status, header, body) = body_of(&error).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));
    assert_eq!(
        body,
        json!({
            "error": UNAVAILABLE_MESSAGE,
            "code": "service_unavailable",
            "traceId": TRACE_ID,
        })
    );
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details(expected_trace_id: String) {
    let error = Error::invalid_request("bad")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"field": "name"}));

    let (status, _, body) = body_of(&error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("bad"));
    assert_eq!(body["details"], json!({"field": "name"}));
}

#[rstest]
#[actix_web::test]
async fn errors_without_trace_id_omit_the_header() {
    let (_, header, body) = body_of(&Error::forbidden("denied")).await;

    assert!(header.is_none());
    assert!(body.get("traceId").is_none());
}

#[rstest]
fn actix_errors_become_redacted_internal_errors() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}

#[derive(serde::Deserialize)]
struct CountPayload {
    #[expect(dead_code, reason = "only the extractor outcome matters")]
    count: u32,
}

async fn accept_body(_body: web::Json<CountPayload>) -> HttpResponse {
    HttpResponse::Ok().finish()
}

async fn accept_query(_query: web::Query<CountPayload>) -> HttpResponse {
    HttpResponse::Ok().finish()
}

async fn accept_path(_path: web::Path<i64>) -> HttpResponse {
    HttpResponse::Ok().finish()
}

#[rstest]
#[case(
    actix_test::TestRequest::post()
        .uri("/body")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json"),
    "body"
)]
#[case(actix_test::TestRequest::get().uri("/query?count=many"), "query")]
#[case(actix_test::TestRequest::get().uri("/path/seven"), "path")]
#[actix_web::test]
async fn extractor_failures_use_the_error_envelope(
    #[case] request: actix_test::TestRequest,
    #[case] source: &str,
) {
    let app = actix_test::init_service(
        App::new()
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .route("/body", web::post().to(accept_body))
            .route("/query", web::get().to(accept_query))
            .route("/path/{id}", web::get().to(accept_path)),
    )
    .await;

    let response = actix_test::call_service(&app, request.to_request()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], json!("invalid_request"));
    assert_eq!(body["details"]["source"], json!(source));
}
