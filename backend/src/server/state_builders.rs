//! Builders for the HTTP state over either storage backend.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use catalog_backend::domain::IdentityService;
use catalog_backend::domain::ports::{EnrollmentRepository, ProgramRepository, UserRepository};
use catalog_backend::inbound::http::state::{HttpState, StatePorts};
use catalog_backend::outbound::memory::InMemoryStore;
use catalog_backend::outbound::persistence::{
    DieselEnrollmentRepository, DieselProgramRepository, DieselUserRepository,
};
use catalog_backend::outbound::security::{Argon2PasswordHasher, JwtTokenIssuer};

use super::ServerConfig;

type Ports<U, P, E> = StatePorts<U, P, E, Argon2PasswordHasher, JwtTokenIssuer>;

/// Assemble the HTTP state, seeding the bootstrap administrator if configured.
///
/// # Errors
/// Returns [`std::io::Error`] when the hasher cannot be built or the admin
/// account cannot be created.
pub async fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let hasher = Arc::new(
        Argon2PasswordHasher::new().map_err(|err| std::io::Error::other(err.to_string()))?,
    );
    let tokens = Arc::new(JwtTokenIssuer::new(&config.token_secret, config.token_ttl));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            let ports = StatePorts {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                programs: Arc::new(DieselProgramRepository::new(pool.clone())),
                enrollments: Arc::new(DieselEnrollmentRepository::new(pool.clone())),
                hasher,
                tokens,
                clock,
            };
            assemble(ports, config).await
        }
        None => {
            info!("no database configured; using the in-memory store");
            let store = Arc::new(InMemoryStore::new());
            let ports = StatePorts {
                users: Arc::clone(&store),
                programs: Arc::clone(&store),
                enrollments: store,
                hasher,
                tokens,
                clock,
            };
            assemble(ports, config).await
        }
    }
}

async fn assemble<U, P, E>(ports: Ports<U, P, E>, config: &ServerConfig) -> std::io::Result<HttpState>
where
    U: UserRepository + 'static,
    P: ProgramRepository + 'static,
    E: EnrollmentRepository + 'static,
{
    if let Some(admin) = &config.admin {
        let identity = IdentityService::new(
            Arc::clone(&ports.users),
            Arc::clone(&ports.hasher),
            Arc::clone(&ports.tokens),
            Arc::clone(&ports.clock),
        );
        identity
            .ensure_admin(
                admin.email().clone(),
                admin.password(),
                admin.full_name().clone(),
            )
            .await
            .map_err(|err| std::io::Error::other(format!("admin bootstrap failed: {err}")))?;
    }
    Ok(HttpState::from_ports(ports))
}
