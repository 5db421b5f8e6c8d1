//! End-to-end walkthroughs of the public API over the in-memory store.

mod support;

use actix_web::http::StatusCode;
use actix_web::test::{self as actix_test, TestRequest};
use rstest::rstest;
use serde_json::json;

use support::{
    ADMIN_EMAIL, PASSWORD, create_program, harness, login, register, send, with_token,
};

#[rstest]
#[actix_web::test]
async fn registration_then_uniform_login_failures() {
    let harness = harness();
    let app = actix_test::init_service(harness.app()).await;

    let (status, body) = send(
        &app,
        TestRequest::post().uri("/api/auth/register").set_json(json!({
            "email": "alice@x.com",
            "password": PASSWORD,
            "fullName": "Alice",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["fullName"], json!("Alice"));
    assert_eq!(body["user"]["role"], json!("user"));
    assert!(body["user"].get("passwordHash").is_none());

    let (wrong_status, wrong) = send(
        &app,
        TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "alice@x.com", "password": "not-it"})),
    )
    .await;
    let (unknown_status, unknown) = send(
        &app,
        TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "nobody@x.com", "password": PASSWORD})),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong["error"], json!("invalid credentials"));
    assert_eq!(wrong["error"], unknown["error"]);
    assert_eq!(wrong["code"], unknown["code"]);
}

#[rstest]
#[actix_web::test]
async fn repeated_enrolment_keeps_exactly_one_record() {
    let harness = harness();
    harness.bootstrap_admin().await;
    let app = actix_test::init_service(harness.app()).await;
    let (_, admin) = login(&app, ADMIN_EMAIL).await;
    for n in 2..=6 {
        register(&app, &format!("filler{n}@x.com"), "Filler").await;
    }
    let (u7, member) = register(&app, "u7@x.com", "User Seven").await;
    assert_eq!(u7, 7);

    let program = create_program(&app, &admin, "Algebra", "active").await;
    assert_eq!(program, 1);

    let enroll = || {
        with_token(TestRequest::post().uri("/api/programs/1/enroll"), &member)
            .set_json(json!({"userId": 7}))
    };
    let (first, record) = send(&app, enroll()).await;
    let (second, replay) = send(&app, enroll()).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(record, json!({
        "userId": 7,
        "programId": 1,
        "enrolledAt": record["enrolledAt"].clone(),
    }));
    assert_eq!(replay, record);

    let (_, members) = send(
        &app,
        with_token(TestRequest::get().uri("/api/programs/1/users"), &admin),
    )
    .await;
    assert_eq!(members["total"], json!(1));
    assert_eq!(members["items"][0]["id"], json!(7));
}

#[rstest]
#[actix_web::test]
async fn admin_pages_through_twenty_five_users() {
    let harness = harness();
    harness.bootstrap_admin().await;
    let app = actix_test::init_service(harness.app()).await;
    let (_, admin) = login(&app, ADMIN_EMAIL).await;
    for n in 1..25 {
        register(&app, &format!("user{n}@x.com"), &format!("User {n}")).await;
    }

    let (status, page) = send(
        &app,
        with_token(TestRequest::get().uri("/api/users?page=1&limit=10"), &admin),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["items"].as_array().map(Vec::len), Some(10));
    assert_eq!(page["total"], json!(25));
    assert_eq!(page["pages"], json!(3));
}

#[rstest]
#[actix_web::test]
async fn member_update_of_program_is_forbidden_and_harmless() {
    let harness = harness();
    harness.bootstrap_admin().await;
    let app = actix_test::init_service(harness.app()).await;
    let (_, admin) = login(&app, ADMIN_EMAIL).await;
    let (_, member) = register(&app, "u7@x.com", "User Seven").await;
    let program = create_program(&app, &admin, "Algebra", "active").await;
    let uri = format!("/api/programs/{program}");

    let (_, before) = send(&app, with_token(TestRequest::get().uri(&uri), &member)).await;
    let (status, body) = send(
        &app,
        with_token(TestRequest::put().uri(&uri), &member)
            .set_json(json!({"name": "Hijacked", "status": "archived"})),
    )
    .await;
    let (_, after) = send(&app, with_token(TestRequest::get().uri(&uri), &member)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], json!("forbidden"));
    assert_eq!(after, before);
}

#[rstest]
#[actix_web::test]
async fn errors_carry_the_trace_identifier() {
    let harness = harness();
    let app = actix_test::init_service(harness.app()).await;

    let res = actix_test::call_service(
        &app,
        TestRequest::get().uri("/api/users/profile/me").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let header = res
        .headers()
        .get("trace-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("trace-id header");
    let body: serde_json::Value = actix_test::read_body_json(res).await;
    assert_eq!(body["traceId"], json!(header));
}
