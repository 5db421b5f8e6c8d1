//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every `/api` handler, the health probes and the wire
//! schemas. Handler paths default to the bearer scheme; the two auth
//! endpoints opt out. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` prints it for external tooling.

use crate::inbound::http::dto::{
    AuthResponse, CreateProgramRequest, EnrollRequest, EnrollmentResponse, LoginRequest,
    ProgramPageResponse, ProgramResponse, RegisterRequest, UpdateProgramRequest,
    UpdateUserRequest, UserPageResponse, UserResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer credential scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Credential returned by POST /api/auth/register or /api/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Course catalogue API",
        description = "Programs, user roster and enrolments behind role-based access control."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::programs::list_programs,
        crate::inbound::http::programs::get_program,
        crate::inbound::http::programs::create_program,
        crate::inbound::http::programs::update_program,
        crate::inbound::http::programs::delete_program,
        crate::inbound::http::enrollments::enroll,
        crate::inbound::http::enrollments::unenroll,
        crate::inbound::http::enrollments::list_enrollees,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::current_user_programs,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserResponse,
        ProgramResponse,
        EnrollmentResponse,
        AuthResponse,
        ProgramPageResponse,
        UserPageResponse,
        RegisterRequest,
        LoginRequest,
        CreateProgramRequest,
        UpdateProgramRequest,
        UpdateUserRequest,
        EnrollRequest,
    )),
    tags(
        (name = "auth", description = "Registration and sign-in"),
        (name = "programs", description = "Program catalogue"),
        (name = "enrollments", description = "Program membership"),
        (name = "users", description = "User roster and self-service"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
