//! Enrolment idempotence, archival and cascade behaviour through the API.

mod support;

use actix_web::http::StatusCode;
use actix_web::test::{self as actix_test, TestRequest};
use rstest::rstest;
use serde_json::json;

use support::{ADMIN_EMAIL, create_program, harness, login, register, send, with_token};

#[rstest]
#[actix_web::test]
async fn deleting_a_program_removes_every_membership() {
    let harness = harness();
    harness.bootstrap_admin().await;
    let app = actix_test::init_service(harness.app()).await;
    let (_, admin) = login(&app, ADMIN_EMAIL).await;
    let (_, t1) = register(&app, "u1@x.com", "One").await;
    let (_, t2) = register(&app, "u2@x.com", "Two").await;
    let doomed = create_program(&app, &admin, "Doomed", "active").await;
    let kept = create_program(&app, &admin, "Kept", "active").await;

    for (token, program) in [(&t1, doomed), (&t2, doomed), (&t1, kept)] {
        let (status, _) = send(
            &app,
            with_token(
                TestRequest::post().uri(&format!("/api/programs/{program}/enroll")),
                token,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = send(
        &app,
        with_token(
            TestRequest::delete().uri(&format!("/api/programs/{doomed}")),
            &admin,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, mine) = send(
        &app,
        with_token(TestRequest::get().uri("/api/users/programs/me"), &t1),
    )
    .await;
    assert_eq!(mine.as_array().map(Vec::len), Some(1));
    assert_eq!(mine[0]["id"], json!(kept));
    let (_, theirs) = send(
        &app,
        with_token(TestRequest::get().uri("/api/users/programs/me"), &t2),
    )
    .await;
    assert_eq!(theirs, json!([]));

    let (status, _) = send(
        &app,
        with_token(
            TestRequest::get().uri(&format!("/api/programs/{doomed}/users")),
            &admin,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn archived_programs_refuse_new_members_but_keep_existing_ones() {
    let harness = harness();
    harness.bootstrap_admin().await;
    let app = actix_test::init_service(harness.app()).await;
    let (_, admin) = login(&app, ADMIN_EMAIL).await;
    let (_, early) = register(&app, "early@x.com", "Early").await;
    let (_, late) = register(&app, "late@x.com", "Late").await;
    let program = create_program(&app, &admin, "Algebra", "active").await;
    let enroll_uri = format!("/api/programs/{program}/enroll");

    let (status, _) = send(&app, with_token(TestRequest::post().uri(&enroll_uri), &early)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        with_token(TestRequest::put().uri(&format!("/api/programs/{program}")), &admin)
            .set_json(json!({"status": "archived"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        send(&app, with_token(TestRequest::post().uri(&enroll_uri), &late)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], json!("program is archived"));

    let (_, members) = send(
        &app,
        with_token(
            TestRequest::get().uri(&format!("/api/programs/{program}/users")),
            &admin,
        ),
    )
    .await;
    assert_eq!(members["total"], json!(1));
}

#[rstest]
#[actix_web::test]
async fn unenrol_then_reenrol_records_a_fresh_membership() {
    let harness = harness();
    harness.bootstrap_admin().await;
    let app = actix_test::init_service(harness.app()).await;
    let (_, admin) = login(&app, ADMIN_EMAIL).await;
    let (member_id, member) = register(&app, "u@x.com", "Member").await;
    let program = create_program(&app, &admin, "Algebra", "active").await;
    let enroll_uri = format!("/api/programs/{program}/enroll");
    let leave_uri = format!("/api/programs/{program}/enroll/{member_id}");

    let (status, _) = send(&app, with_token(TestRequest::post().uri(&enroll_uri), &member)).await;
    assert_eq!(status, StatusCode::CREATED);
    for _ in 0..2 {
        let (status, body) =
            send(&app, with_token(TestRequest::delete().uri(&leave_uri), &member)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, serde_json::Value::Null);
    }
    let (status, _) = send(&app, with_token(TestRequest::post().uri(&enroll_uri), &member)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[rstest]
#[actix_web::test]
async fn admins_enrol_and_remove_other_users() {
    let harness = harness();
    harness.bootstrap_admin().await;
    let app = actix_test::init_service(harness.app()).await;
    let (_, admin) = login(&app, ADMIN_EMAIL).await;
    let (member_id, member) = register(&app, "u@x.com", "Member").await;
    let program = create_program(&app, &admin, "Algebra", "active").await;

    let (status, record) = send(
        &app,
        with_token(
            TestRequest::post().uri(&format!("/api/programs/{program}/enroll")),
            &admin,
        )
        .set_json(json!({"userId": member_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record["userId"], json!(member_id));

    let (_, mine) = send(
        &app,
        with_token(TestRequest::get().uri("/api/users/programs/me"), &member),
    )
    .await;
    assert_eq!(mine[0]["id"], json!(program));

    let (status, _) = send(
        &app,
        with_token(
            TestRequest::delete().uri(&format!("/api/programs/{program}/enroll/{member_id}")),
            &admin,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[rstest]
#[case("/api/programs/999/enroll", StatusCode::NOT_FOUND)]
#[case("/api/programs/0/enroll", StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn enrolment_in_missing_program_is_rejected(
    #[case] uri: &str,
    #[case] expected: StatusCode,
) {
    let harness = harness();
    let app = actix_test::init_service(harness.app()).await;
    let (_, member) = register(&app, "u@x.com", "Member").await;

    let (status, _) = send(&app, with_token(TestRequest::post().uri(uri), &member)).await;

    assert_eq!(status, expected);
}
