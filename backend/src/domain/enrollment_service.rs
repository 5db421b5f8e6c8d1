//! Enrolment ledger service.
//!
//! `enroll` and `unenroll` are total over the `{absent, enrolled}` states of
//! a pair, so both are safe to retry. Idempotency comes from the ledger's
//! upsert, not from swallowing duplicate-key errors.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::{debug, info};

use crate::domain::access::{Action, require};
use crate::domain::catalog_service::{map_program_persistence_error, program_not_found};
use crate::domain::ports::{
    EnrollmentCommand, EnrollmentPersistenceError, EnrollmentQuery, EnrollmentRepository,
    ProgramRepository,
};
use crate::domain::{EnrollmentOutcome, Error, Principal, Program, ProgramId, User, UserId};

/// Ledger service implementing [`EnrollmentCommand`] and [`EnrollmentQuery`].
#[derive(Clone)]
pub struct EnrollmentService<E, P> {
    ledger: Arc<E>,
    programs: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<E, P> EnrollmentService<E, P> {
    /// Wire the ledger and catalogue repositories with a clock.
    pub fn new(ledger: Arc<E>, programs: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger,
            programs,
            clock,
        }
    }
}

fn map_ledger_error(error: EnrollmentPersistenceError) -> Error {
    match error {
        EnrollmentPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("enrollment repository unavailable: {message}"))
        }
        EnrollmentPersistenceError::Query { message } => {
            Error::internal(format!("enrollment repository error: {message}"))
        }
        EnrollmentPersistenceError::ProgramNotFound { program_id } => Error::not_found(
            "program not found",
        )
        .with_details(serde_json::json!({ "programId": program_id })),
        EnrollmentPersistenceError::UserNotFound { user_id } => Error::not_found("user not found")
            .with_details(serde_json::json!({ "userId": user_id })),
        EnrollmentPersistenceError::ProgramArchived { program_id } => Error::conflict(
            "program is archived",
        )
        .with_details(serde_json::json!({ "programId": program_id })),
    }
}

#[async_trait]
impl<E, P> EnrollmentCommand for EnrollmentService<E, P>
where
    E: EnrollmentRepository,
    P: ProgramRepository,
{
    async fn enroll(
        &self,
        principal: Option<&Principal>,
        program_id: ProgramId,
        user_id: UserId,
    ) -> Result<EnrollmentOutcome, Error> {
        require(
            principal,
            Action::Enroll {
                program: program_id,
                user: user_id,
            },
        )?;
        let outcome = self
            .ledger
            .enroll(user_id, program_id, self.clock.utc())
            .await
            .map_err(map_ledger_error)?;
        if outcome.created {
            info!(%program_id, %user_id, "enrollment created");
        } else {
            debug!(%program_id, %user_id, "enrollment already present");
        }
        Ok(outcome)
    }

    async fn unenroll(
        &self,
        principal: Option<&Principal>,
        program_id: ProgramId,
        user_id: UserId,
    ) -> Result<(), Error> {
        require(
            principal,
            Action::Unenroll {
                program: program_id,
                user: user_id,
            },
        )?;
        let removed = self
            .ledger
            .unenroll(user_id, program_id)
            .await
            .map_err(map_ledger_error)?;
        if removed {
            info!(%program_id, %user_id, "enrollment removed");
        }
        Ok(())
    }
}

#[async_trait]
impl<E, P> EnrollmentQuery for EnrollmentService<E, P>
where
    E: EnrollmentRepository,
    P: ProgramRepository,
{
    async fn list_enrollees(
        &self,
        principal: Option<&Principal>,
        program_id: ProgramId,
        request: PageRequest,
    ) -> Result<Page<User>, Error> {
        require(principal, Action::ListEnrollees(program_id))?;
        self.programs
            .find_by_id(program_id)
            .await
            .map_err(map_program_persistence_error)?
            .ok_or_else(|| program_not_found(program_id))?;
        self.ledger
            .list_enrollees(program_id, request)
            .await
            .map_err(map_ledger_error)
    }

    async fn programs_of_user(
        &self,
        principal: Option<&Principal>,
        user_id: UserId,
    ) -> Result<Vec<Program>, Error> {
        require(principal, Action::ListProgramsOfUser(user_id))?;
        self.ledger
            .list_programs_of_user(user_id)
            .await
            .map_err(map_ledger_error)
    }
}

#[cfg(test)]
#[path = "enrollment_service_tests.rs"]
mod tests;
