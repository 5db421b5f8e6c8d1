//! Catalogue handlers.
//!
//! ```text
//! GET    /api/programs?page=1&limit=10
//! GET    /api/programs/{id}
//! POST   /api/programs {"name":"Algebra","description":"...","startDate":"2025-09-01"}
//! PUT    /api/programs/{id} {"status":"archived"}
//! DELETE /api/programs/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{
    Error, ProgramDescription, ProgramDraft, ProgramName, ProgramPatch, ProgramStatus,
    parse_start_date,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    CreateProgramRequest, PageQuery, ProgramPageResponse, ProgramResponse, UpdateProgramRequest,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::Caller;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_program_validation, parse_program_id};

fn parse_status(raw: Option<&str>) -> Result<Option<ProgramStatus>, Error> {
    raw.map(|value| value.parse::<ProgramStatus>())
        .transpose()
        .map_err(map_program_validation)
}

impl TryFrom<CreateProgramRequest> for ProgramDraft {
    type Error = Error;

    fn try_from(request: CreateProgramRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: ProgramName::new(&request.name).map_err(map_program_validation)?,
            description: ProgramDescription::new(request.description)
                .map_err(map_program_validation)?,
            start_date: parse_start_date(&request.start_date).map_err(map_program_validation)?,
            status: parse_status(request.status.as_deref())?.unwrap_or_default(),
        })
    }
}

impl TryFrom<UpdateProgramRequest> for ProgramPatch {
    type Error = Error;

    fn try_from(request: UpdateProgramRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: request
                .name
                .map(ProgramName::new)
                .transpose()
                .map_err(map_program_validation)?,
            description: request
                .description
                .map(ProgramDescription::new)
                .transpose()
                .map_err(map_program_validation)?,
            start_date: request
                .start_date
                .as_deref()
                .map(parse_start_date)
                .transpose()
                .map_err(map_program_validation)?,
            status: parse_status(request.status.as_deref())?,
        })
    }
}

/// List the catalogue, newest first.
#[utoipa::path(
    get,
    path = "/api/programs",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of programs", body = ProgramPageResponse),
        (status = 400, description = "Invalid pagination", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["programs"],
    operation_id = "listPrograms"
)]
#[get("/programs")]
pub async fn list_programs(
    state: web::Data<HttpState>,
    caller: Caller,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<ProgramPageResponse>> {
    let request = query.into_inner().to_request()?;
    let page = state
        .catalog
        .list_programs(caller.principal(), request)
        .await?;
    Ok(web::Json(ProgramPageResponse::from(page)))
}

#[utoipa::path(
    get,
    path = "/api/programs/{id}",
    params(("id" = i64, Path, description = "Program identifier")),
    responses(
        (status = 200, description = "Program", body = ProgramResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["programs"],
    operation_id = "getProgram"
)]
#[get("/programs/{id}")]
pub async fn get_program(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ProgramResponse>> {
    let id = parse_program_id(path.into_inner())?;
    let program = state.catalog.get_program(caller.principal(), id).await?;
    Ok(web::Json(ProgramResponse::from(&program)))
}

/// Add a program. Admin only.
#[utoipa::path(
    post,
    path = "/api/programs",
    request_body = CreateProgramRequest,
    responses(
        (status = 201, description = "Program created", body = ProgramResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["programs"],
    operation_id = "createProgram"
)]
#[post("/programs")]
pub async fn create_program(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: web::Json<CreateProgramRequest>,
) -> ApiResult<HttpResponse> {
    let draft = ProgramDraft::try_from(payload.into_inner())?;
    let program = state
        .catalog_admin
        .create_program(caller.principal(), draft)
        .await?;
    Ok(HttpResponse::Created().json(ProgramResponse::from(&program)))
}

/// Patch a program. Admin only; absent fields are left unchanged.
#[utoipa::path(
    put,
    path = "/api/programs/{id}",
    params(("id" = i64, Path, description = "Program identifier")),
    request_body = UpdateProgramRequest,
    responses(
        (status = 200, description = "Updated program", body = ProgramResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["programs"],
    operation_id = "updateProgram"
)]
#[put("/programs/{id}")]
pub async fn update_program(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<i64>,
    payload: web::Json<UpdateProgramRequest>,
) -> ApiResult<web::Json<ProgramResponse>> {
    let id = parse_program_id(path.into_inner())?;
    let patch = ProgramPatch::try_from(payload.into_inner())?;
    let program = state
        .catalog_admin
        .update_program(caller.principal(), id, patch)
        .await?;
    Ok(web::Json(ProgramResponse::from(&program)))
}

/// Delete a program and every enrolment in it. Admin only.
#[utoipa::path(
    delete,
    path = "/api/programs/{id}",
    params(("id" = i64, Path, description = "Program identifier")),
    responses(
        (status = 204, description = "Program deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["programs"],
    operation_id = "deleteProgram"
)]
#[delete("/programs/{id}")]
pub async fn delete_program(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = parse_program_id(path.into_inner())?;
    state
        .catalog_admin
        .delete_program(caller.principal(), id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
