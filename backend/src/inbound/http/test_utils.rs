//! Test harness for inbound HTTP components.
//!
//! Handlers run against the real domain services over an [`InMemoryStore`],
//! with a cheap Argon2 profile so hashing does not dominate test time.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::{AUTHORIZATION, HeaderName};
use actix_web::{App, web};
use argon2::Params;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::ports::{
    EnrollmentRepository, PasswordHasher, ProgramRepository, TokenIssuer, UserRepository,
};
use crate::domain::{
    Email, EnrollmentOutcome, FullName, NewUser, Principal, Program, ProgramDescription,
    ProgramDraft, ProgramId, ProgramName, ProgramStatus, Role, User, parse_start_date,
};
use crate::inbound::http::configure;
use crate::inbound::http::error::{json_config, path_config, query_config};
use crate::inbound::http::state::{HttpState, StatePorts};
use crate::middleware::Trace;
use crate::outbound::memory::InMemoryStore;
use crate::outbound::security::{Argon2PasswordHasher, JwtTokenIssuer, TokenSecret};

/// Password every seeded account shares.
pub(crate) const SEED_PASSWORD: &str = "secret1";

/// `Authorization` header carrying `token`.
pub(crate) fn bearer(token: &str) -> (HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

pub(crate) struct TestApp {
    store: Arc<InMemoryStore>,
    hasher: Arc<Argon2PasswordHasher>,
    issuer: Arc<JwtTokenIssuer>,
    state: HttpState,
    // Seeded rows get strictly increasing timestamps so ordering is stable.
    ticks: AtomicI64,
}

pub(crate) fn test_app() -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let params = Params::new(8, 1, 1, None).expect("argon2 params");
    let hasher = Arc::new(Argon2PasswordHasher::with_params(params).expect("hasher"));
    let issuer = Arc::new(JwtTokenIssuer::new(
        &TokenSecret::new(b"test-secret".to_vec()),
        Duration::hours(1),
    ));
    let state = HttpState::from_ports(StatePorts {
        users: Arc::clone(&store),
        programs: Arc::clone(&store),
        enrollments: Arc::clone(&store),
        hasher: Arc::clone(&hasher),
        tokens: Arc::clone(&issuer),
        clock: Arc::new(mockable::DefaultClock),
    });
    TestApp {
        store,
        hasher,
        issuer,
        state,
        ticks: AtomicI64::new(0),
    }
}

impl TestApp {
    /// Bare app with state and extractor settings; add routes as needed.
    pub(crate) fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
    }

    /// The full `/api` surface behind the trace middleware.
    pub(crate) fn api(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        self.app().wrap(Trace).configure(configure)
    }

    fn tick(&self) -> DateTime<Utc> {
        let n = self.ticks.fetch_add(1, Ordering::SeqCst);
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp")
            + Duration::seconds(n)
    }

    pub(crate) fn token_for(&self, principal: Principal) -> String {
        self.issuer
            .issue(&principal, Utc::now())
            .expect("token issued")
            .token
    }

    /// Insert an account with [`SEED_PASSWORD`] and return it with a token.
    pub(crate) async fn seed_user(&self, email: &str, role: Role) -> (User, String) {
        let full_name = email.split('@').next().unwrap_or(email);
        let user = UserRepository::insert(
            &*self.store,
            NewUser {
                email: Email::new(email).expect("email"),
                full_name: FullName::new(full_name).expect("full name"),
                role,
                password_hash: self.hasher.hash(SEED_PASSWORD).expect("hash"),
                created_at: self.tick(),
            },
        )
        .await
        .expect("user inserted");
        let token = self.token_for(Principal::from(&user));
        (user, token)
    }

    pub(crate) async fn seed_program(&self, name: &str, status: ProgramStatus) -> Program {
        let draft = ProgramDraft {
            name: ProgramName::new(name).expect("name"),
            description: ProgramDescription::new(format!("About {name}")).expect("description"),
            start_date: parse_start_date("2025-09-01").expect("date"),
            status,
        };
        ProgramRepository::insert(&*self.store, draft, self.tick())
            .await
            .expect("program inserted")
    }

    pub(crate) async fn program(&self, id: ProgramId) -> Option<Program> {
        ProgramRepository::find_by_id(&*self.store, id)
            .await
            .expect("program lookup")
    }

    pub(crate) async fn enroll(&self, user: &User, program: &Program) -> EnrollmentOutcome {
        self.store
            .enroll(user.id(), program.id(), self.tick())
            .await
            .expect("enrolled")
    }
}
