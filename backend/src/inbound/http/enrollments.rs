//! Enrolment ledger handlers.
//!
//! ```text
//! POST   /api/programs/{id}/enroll {"userId":7}
//! DELETE /api/programs/{id}/enroll/{user_id}
//! GET    /api/programs/{id}/users?page=1&limit=10
//! ```

use actix_web::{HttpResponse, delete, get, post, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{EnrollRequest, EnrollmentResponse, PageQuery, UserPageResponse};
use crate::inbound::http::error::malformed;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::Caller;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_program_id, parse_user_id};

/// Enrol a user in a program.
///
/// `userId` defaults to the caller when the body is empty or omits it; any
/// other body must be valid JSON. Members may only enrol themselves.
/// Repeating the request is harmless: the original record comes back with
/// `200` instead of `201`.
#[utoipa::path(
    post,
    path = "/api/programs/{id}/enroll",
    params(("id" = i64, Path, description = "Program identifier")),
    request_body(content = EnrollRequest, description = "Defaults to the caller when empty"),
    responses(
        (status = 201, description = "Enrolled", body = EnrollmentResponse),
        (status = 200, description = "Already enrolled", body = EnrollmentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Program or user not found", body = ErrorSchema),
        (status = 409, description = "Program is archived", body = ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "enroll"
)]
#[post("/programs/{id}/enroll")]
pub async fn enroll(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<i64>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let principal = caller.require()?;
    let program_id = parse_program_id(path.into_inner())?;
    let user_id = match enroll_target(&body)? {
        Some(raw) => parse_user_id(raw)?,
        None => principal.user_id,
    };
    let outcome = state
        .enrollments
        .enroll(caller.principal(), program_id, user_id)
        .await?;
    let body = EnrollmentResponse::from(&outcome.record);
    if outcome.created {
        Ok(HttpResponse::Created().json(body))
    } else {
        Ok(HttpResponse::Ok().json(body))
    }
}

fn enroll_target(body: &[u8]) -> ApiResult<Option<i64>> {
    if body.trim_ascii().is_empty() {
        return Ok(None);
    }
    serde_json::from_slice::<EnrollRequest>(body)
        .map(|request| request.user_id)
        .map_err(|err| malformed("body", format!("invalid request body: {err}")))
}

/// Remove a membership. Succeeds whether or not it existed.
#[utoipa::path(
    delete,
    path = "/api/programs/{id}/enroll/{user_id}",
    params(
        ("id" = i64, Path, description = "Program identifier"),
        ("user_id" = i64, Path, description = "User identifier")
    ),
    responses(
        (status = 204, description = "Not enrolled"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "unenroll"
)]
#[delete("/programs/{id}/enroll/{user_id}")]
pub async fn unenroll(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<(i64, i64)>,
) -> ApiResult<HttpResponse> {
    let (program_raw, user_raw) = path.into_inner();
    let program_id = parse_program_id(program_raw)?;
    let user_id = parse_user_id(user_raw)?;
    state
        .enrollments
        .unenroll(caller.principal(), program_id, user_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Members of a program, most recently enrolled first. Admin only.
#[utoipa::path(
    get,
    path = "/api/programs/{id}/users",
    params(("id" = i64, Path, description = "Program identifier"), PageQuery),
    responses(
        (status = 200, description = "One page of members", body = UserPageResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Program not found", body = ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "listEnrollees"
)]
#[get("/programs/{id}/users")]
pub async fn list_enrollees(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<i64>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<UserPageResponse>> {
    let program_id = parse_program_id(path.into_inner())?;
    let request = query.into_inner().to_request()?;
    let page = state
        .enrollments_query
        .list_enrollees(caller.principal(), program_id, request)
        .await?;
    Ok(web::Json(UserPageResponse::from(page)))
}
