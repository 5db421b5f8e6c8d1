//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`Authenticator`, `Catalog*`, `Roster*`, `Enrollment*`) are
//! called by inbound adapters. Driven ports (repositories, hasher, token
//! issuer) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod authenticator;
mod catalog;
mod enrollment_repository;
mod ledger;
mod password_hasher;
mod program_repository;
mod roster;
mod token_issuer;
mod user_repository;

pub use authenticator::Authenticator;
pub use catalog::{CatalogCommand, CatalogQuery};
#[cfg(test)]
pub use enrollment_repository::MockEnrollmentRepository;
pub use enrollment_repository::{EnrollmentPersistenceError, EnrollmentRepository};
pub use ledger::{EnrollmentCommand, EnrollmentQuery};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use program_repository::MockProgramRepository;
pub use program_repository::{ProgramPersistenceError, ProgramRepository};
pub use roster::{RosterCommand, RosterQuery};
#[cfg(test)]
pub use token_issuer::MockTokenIssuer;
pub use token_issuer::{TokenError, TokenIssuer};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
