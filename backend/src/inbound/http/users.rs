//! Roster handlers.
//!
//! ```text
//! GET /api/users?page=1&limit=10
//! GET /api/users/{id}
//! PUT /api/users/{id} {"fullName":"Ada L.","role":"admin"}
//! GET /api/users/profile/me
//! GET /api/users/programs/me
//! ```
//!
//! The `/me` routes are registered ahead of `/users/{id}` so the literal
//! segment wins.

use actix_web::{get, put, web};

use crate::domain::{Error, FullName, Role, UserPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    PageQuery, ProgramResponse, UpdateUserRequest, UserPageResponse, UserResponse,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::Caller;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_user_validation, parse_user_id};

impl TryFrom<UpdateUserRequest> for UserPatch {
    type Error = Error;

    fn try_from(request: UpdateUserRequest) -> Result<Self, Self::Error> {
        let full_name = request
            .full_name
            .map(FullName::new)
            .transpose()
            .map_err(map_user_validation)?;
        let role = request
            .role
            .as_deref()
            .map(str::parse::<Role>)
            .transpose()
            .map_err(map_user_validation)?;
        Ok(Self::new(full_name, role))
    }
}

/// The caller's own account.
#[utoipa::path(
    get,
    path = "/api/users/profile/me",
    responses(
        (status = 200, description = "Caller profile", body = UserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/profile/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    caller: Caller,
) -> ApiResult<web::Json<UserResponse>> {
    let principal = caller.require()?;
    let user = state.roster.get_user(Some(principal), principal.user_id).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Programs the caller is enrolled in, most recent enrolment first.
#[utoipa::path(
    get,
    path = "/api/users/programs/me",
    responses(
        (status = 200, description = "Caller programs", body = [ProgramResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUserPrograms"
)]
#[get("/users/programs/me")]
pub async fn current_user_programs(
    state: web::Data<HttpState>,
    caller: Caller,
) -> ApiResult<web::Json<Vec<ProgramResponse>>> {
    let principal = caller.require()?;
    let programs = state
        .enrollments_query
        .programs_of_user(Some(principal), principal.user_id)
        .await?;
    Ok(web::Json(programs.iter().map(ProgramResponse::from).collect()))
}

/// List accounts, newest first. Admin only.
#[utoipa::path(
    get,
    path = "/api/users",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of users", body = UserPageResponse),
        (status = 400, description = "Invalid pagination", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    caller: Caller,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<UserPageResponse>> {
    let request = query.into_inner().to_request()?;
    let page = state.roster.list_users(caller.principal(), request).await?;
    Ok(web::Json(UserPageResponse::from(page)))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = parse_user_id(path.into_inner())?;
    let user = state.roster.get_user(caller.principal(), id).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Change a name (self or admin) or a role (admin only).
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<i64>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = parse_user_id(path.into_inner())?;
    let patch = UserPatch::try_from(payload.into_inner())?;
    let user = state
        .roster_admin
        .update_user(caller.principal(), id, patch)
        .await?;
    Ok(web::Json(UserResponse::from(&user)))
}
