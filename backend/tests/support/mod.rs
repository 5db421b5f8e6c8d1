//! Shared harness for end-to-end API tests.
//!
//! Builds the public `/api` surface over an in-memory store with a cheap
//! Argon2 profile, and offers JSON request helpers.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test::{self as actix_test, TestRequest};
use actix_web::{App, web};
use argon2::Params;
use chrono::Duration;
use serde_json::{Value, json};

use catalog_backend::Trace;
use catalog_backend::domain::{Email, FullName, IdentityService};
use catalog_backend::inbound::http::configure;
use catalog_backend::inbound::http::state::{HttpState, StatePorts};
use catalog_backend::outbound::memory::InMemoryStore;
use catalog_backend::outbound::security::{Argon2PasswordHasher, JwtTokenIssuer, TokenSecret};

pub const ADMIN_EMAIL: &str = "admin@x.com";
pub const PASSWORD: &str = "secret1";

pub struct Harness {
    pub state: HttpState,
    identity: IdentityService<InMemoryStore, Argon2PasswordHasher, JwtTokenIssuer>,
}

pub fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let params = Params::new(8, 1, 1, None).expect("argon2 params");
    let hasher = Arc::new(Argon2PasswordHasher::with_params(params).expect("hasher"));
    let tokens = Arc::new(JwtTokenIssuer::new(
        &TokenSecret::new(b"integration-secret".to_vec()),
        Duration::hours(1),
    ));
    let clock: Arc<dyn mockable::Clock> = Arc::new(mockable::DefaultClock);
    let identity = IdentityService::new(
        Arc::clone(&store),
        Arc::clone(&hasher),
        Arc::clone(&tokens),
        Arc::clone(&clock),
    );
    let state = HttpState::from_ports(StatePorts {
        users: Arc::clone(&store),
        programs: Arc::clone(&store),
        enrollments: store,
        hasher,
        tokens,
        clock,
    });
    Harness { state, identity }
}

impl Harness {
    pub fn app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(Trace)
            .configure(configure)
    }

    /// Create the administrator account out of band.
    pub async fn bootstrap_admin(&self) {
        self.identity
            .ensure_admin(
                Email::new(ADMIN_EMAIL).expect("email"),
                PASSWORD,
                FullName::new("Admin").expect("name"),
            )
            .await
            .expect("admin bootstrap");
    }
}

/// Send `req` and decode the JSON body (`Null` when empty).
pub async fn send<S, B>(app: &S, req: TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = actix_test::call_service(app, req.to_request()).await;
    let status = res.status();
    let body = actix_test::read_body(res).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

pub fn with_token(req: TestRequest, token: &str) -> TestRequest {
    req.insert_header((AUTHORIZATION, format!("Bearer {token}")))
}

pub async fn register<S, B>(app: &S, email: &str, full_name: &str) -> (i64, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        TestRequest::post().uri("/api/auth/register").set_json(json!({
            "email": email,
            "password": PASSWORD,
            "fullName": full_name,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {email}: {body}");
    session_parts(&body)
}

pub async fn login<S, B>(app: &S, email: &str) -> (i64, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": email, "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login {email}: {body}");
    session_parts(&body)
}

fn session_parts(body: &Value) -> (i64, String) {
    let id = body["user"]["id"].as_i64().expect("user id");
    let token = body["token"].as_str().expect("token").to_owned();
    (id, token)
}

pub async fn create_program<S, B>(app: &S, admin: &str, name: &str, status: &str) -> i64
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = with_token(TestRequest::post().uri("/api/programs"), admin).set_json(json!({
        "name": name,
        "description": format!("{name} for beginners"),
        "startDate": "2025-09-01",
        "status": status,
    }));
    let (code, body) = send(app, req).await;
    assert_eq!(code, StatusCode::CREATED, "create {name}: {body}");
    body["id"].as_i64().expect("program id")
}
