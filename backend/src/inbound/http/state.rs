//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on driving ports and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    Authenticator, CatalogCommand, CatalogQuery, EnrollmentCommand, EnrollmentQuery,
    EnrollmentRepository, PasswordHasher, ProgramRepository, RosterCommand, RosterQuery,
    TokenIssuer, UserRepository,
};
use crate::domain::{CatalogService, EnrollmentService, IdentityService, RosterService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn Authenticator>,
    pub catalog: Arc<dyn CatalogQuery>,
    pub catalog_admin: Arc<dyn CatalogCommand>,
    pub roster: Arc<dyn RosterQuery>,
    pub roster_admin: Arc<dyn RosterCommand>,
    pub enrollments: Arc<dyn EnrollmentCommand>,
    pub enrollments_query: Arc<dyn EnrollmentQuery>,
}

/// Driven adapters from which [`HttpState`] assembles the domain services.
///
/// The in-memory store implements all three repositories, so the same `Arc`
/// can be passed for `users`, `programs` and `enrollments`.
pub struct StatePorts<U, P, E, H, T> {
    pub users: Arc<U>,
    pub programs: Arc<P>,
    pub enrollments: Arc<E>,
    pub hasher: Arc<H>,
    pub tokens: Arc<T>,
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Wire the domain services over the given adapters.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use catalog_backend::inbound::http::state::{HttpState, StatePorts};
    /// use catalog_backend::outbound::memory::InMemoryStore;
    /// use catalog_backend::outbound::security::{
    ///     Argon2PasswordHasher, JwtTokenIssuer, TokenSecret,
    /// };
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let state = HttpState::from_ports(StatePorts {
    ///     users: Arc::clone(&store),
    ///     programs: Arc::clone(&store),
    ///     enrollments: store,
    ///     hasher: Arc::new(Argon2PasswordHasher::new().expect("hasher")),
    ///     tokens: Arc::new(JwtTokenIssuer::new(
    ///         &TokenSecret::new(b"doc-secret".to_vec()),
    ///         chrono::Duration::hours(1),
    ///     )),
    ///     clock: Arc::new(mockable::DefaultClock),
    /// });
    /// # let _ = state;
    /// ```
    pub fn from_ports<U, P, E, H, T>(ports: StatePorts<U, P, E, H, T>) -> Self
    where
        U: UserRepository + 'static,
        P: ProgramRepository + 'static,
        E: EnrollmentRepository + 'static,
        H: PasswordHasher + 'static,
        T: TokenIssuer + 'static,
    {
        let StatePorts {
            users,
            programs,
            enrollments,
            hasher,
            tokens,
            clock,
        } = ports;
        let identity = Arc::new(IdentityService::new(
            Arc::clone(&users),
            hasher,
            tokens,
            Arc::clone(&clock),
        ));
        let catalog = Arc::new(CatalogService::new(
            Arc::clone(&programs),
            Arc::clone(&clock),
        ));
        let roster = Arc::new(RosterService::new(users));
        let ledger = Arc::new(EnrollmentService::new(enrollments, programs, clock));

        Self {
            auth: identity,
            catalog: Arc::clone(&catalog) as Arc<dyn CatalogQuery>,
            catalog_admin: catalog,
            roster: Arc::clone(&roster) as Arc<dyn RosterQuery>,
            roster_admin: roster,
            enrollments: Arc::clone(&ledger) as Arc<dyn EnrollmentCommand>,
            enrollments_query: ledger,
        }
    }
}
