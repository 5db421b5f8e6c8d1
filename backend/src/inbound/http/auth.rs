//! Registration and sign-in handlers.
//!
//! ```text
//! POST /api/auth/register {"email":"alice@x.com","password":"secret1","fullName":"Alice"}
//! POST /api/auth/login {"email":"alice@x.com","password":"secret1"}
//! ```

use actix_web::{HttpResponse, post, web};
use tracing::debug;

use crate::domain::{Error, INVALID_CREDENTIALS, LoginCredentials, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_auth_validation;

/// Create a `user` account and sign it in.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        email,
        password,
        full_name,
    } = payload.into_inner();
    let registration = Registration::try_from_parts(&email, &password, &full_name)
        .map_err(map_auth_validation)?;
    let session = state.auth.register(registration).await?;
    Ok(HttpResponse::Created().json(AuthResponse::from(&session)))
}

/// Exchange email and password for a bearer credential.
///
/// Malformed input, unknown emails and wrong passwords all produce the same
/// `401` body.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(|err| {
            debug!(%err, "sign-in rejected before lookup");
            Error::unauthorized(INVALID_CREDENTIALS)
        })?;
    let session = state.auth.login(&credentials).await?;
    Ok(web::Json(AuthResponse::from(&session)))
}
