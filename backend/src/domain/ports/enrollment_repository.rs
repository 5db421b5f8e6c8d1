//! Driven port for the enrolment ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};

use crate::domain::{EnrollmentOutcome, Program, ProgramId, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by enrolment ledger adapters.
    pub enum EnrollmentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "enrollment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "enrollment repository query failed: {message}",
        /// Referenced program does not exist.
        ProgramNotFound { program_id: i64 } => "program {program_id} not found",
        /// Referenced user does not exist.
        UserNotFound { user_id: i64 } => "user {user_id} not found",
        /// Program is archived and accepts no new members.
        ProgramArchived { program_id: i64 } => "program {program_id} is archived",
    }
}

/// Set-membership store relating users to programs.
///
/// Every method is a single atomic unit: the existence and status checks in
/// [`EnrollmentRepository::enroll`] happen in the same transaction (or under
/// the same lock) as the insert.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Record membership, or return the existing record when already present.
    async fn enroll(
        &self,
        user_id: UserId,
        program_id: ProgramId,
        enrolled_at: DateTime<Utc>,
    ) -> Result<EnrollmentOutcome, EnrollmentPersistenceError>;

    /// Remove membership. Returns whether a record was deleted.
    async fn unenroll(
        &self,
        user_id: UserId,
        program_id: ProgramId,
    ) -> Result<bool, EnrollmentPersistenceError>;

    /// One page of members of `program_id`, most recently enrolled first.
    async fn list_enrollees(
        &self,
        program_id: ProgramId,
        request: PageRequest,
    ) -> Result<Page<User>, EnrollmentPersistenceError>;

    /// Every program `user_id` belongs to, most recently enrolled first.
    async fn list_programs_of_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Program>, EnrollmentPersistenceError>;
}
