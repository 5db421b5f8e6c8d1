//! Driving ports for the enrolment ledger.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{EnrollmentOutcome, Error, Principal, Program, ProgramId, User, UserId};

/// Membership mutations. Both are total and safe to retry.
#[async_trait]
pub trait EnrollmentCommand: Send + Sync {
    /// Enrol `user_id` in `program_id`; returns the existing record on repeat.
    async fn enroll(
        &self,
        principal: Option<&Principal>,
        program_id: ProgramId,
        user_id: UserId,
    ) -> Result<EnrollmentOutcome, Error>;

    /// Remove membership; succeeds whether or not it existed.
    async fn unenroll(
        &self,
        principal: Option<&Principal>,
        program_id: ProgramId,
        user_id: UserId,
    ) -> Result<(), Error>;
}

/// Membership reads.
#[async_trait]
pub trait EnrollmentQuery: Send + Sync {
    /// Members of a program. Admin only.
    async fn list_enrollees(
        &self,
        principal: Option<&Principal>,
        program_id: ProgramId,
        request: PageRequest,
    ) -> Result<Page<User>, Error>;

    /// Programs a user belongs to. Self or admin.
    async fn programs_of_user(
        &self,
        principal: Option<&Principal>,
        user_id: UserId,
    ) -> Result<Vec<Program>, Error>;
}
