//! Enrolment ledger records.
//!
//! A record pairs one user with one program. The pair is the identity of the
//! record; `enrolled_at` is set when the pair is first recorded and never
//! moves afterwards.

use chrono::{DateTime, Utc};

use super::{ProgramId, UserId};

/// One `(user, program)` membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enrollment {
    pub user_id: UserId,
    pub program_id: ProgramId,
    pub enrolled_at: DateTime<Utc>,
}

/// Result of an enrol request.
///
/// `created` is false when the pair already existed, in which case `record`
/// carries the original enrolment time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollmentOutcome {
    pub record: Enrollment,
    pub created: bool,
}
