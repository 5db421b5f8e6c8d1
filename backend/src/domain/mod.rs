//! Domain primitives, the access gate and the services behind the ports.
//!
//! Purpose: define strongly typed entities for the catalogue, roster and
//! enrolment ledger, and the use-case services that enforce their invariants.
//! Nothing in here knows about HTTP or SQL; adapters live under `inbound` and
//! `outbound`.
//!
//! Public surface:
//! - `Error`/`ErrorCode`: transport-agnostic failure payload.
//! - `User`, `Program`, `Enrollment`: entities plus their validated fields.
//! - `authorize`/`Action`: the single access decision table.
//! - `IdentityService`, `CatalogService`, `RosterService`,
//!   `EnrollmentService`: driving-port implementations.

pub mod access;
pub mod auth;
pub mod catalog_service;
pub mod enrollment;
pub mod enrollment_service;
pub mod error;
pub mod identity_service;
pub mod ports;
pub mod program;
pub mod roster_service;
pub mod trace_id;
pub mod user;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::access::{Action, Decision, DenyReason, Sensitivity, authorize};
pub use self::auth::{
    AuthValidationError, Credential, LoginCredentials, PASSWORD_MIN, Principal, Registration,
    Session,
};
pub use self::catalog_service::CatalogService;
pub use self::enrollment::{Enrollment, EnrollmentOutcome};
pub use self::enrollment_service::EnrollmentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity_service::{INVALID_CREDENTIALS, IdentityService};
pub use self::program::{
    PROGRAM_NAME_MAX, Program, ProgramDescription, ProgramDraft, ProgramId, ProgramName,
    ProgramPatch, ProgramStatus, ProgramValidationError, parse_start_date,
};
pub use self::roster_service::RosterService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, FULL_NAME_MAX, FullName, NewUser, Role, StoredCredentials, User, UserId, UserPatch,
    UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use catalog_backend::domain::{ApiResult, Error};
///
/// fn guarded() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(guarded().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
