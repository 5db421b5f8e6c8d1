//! Catalogue service.
//!
//! Every operation consults the access gate before touching the repository.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::access::{Action, require};
use crate::domain::ports::{
    CatalogCommand, CatalogQuery, ProgramPersistenceError, ProgramRepository,
};
use crate::domain::{Error, Principal, Program, ProgramDraft, ProgramId, ProgramPatch};

/// Catalogue service implementing [`CatalogQuery`] and [`CatalogCommand`].
#[derive(Clone)]
pub struct CatalogService<P> {
    programs: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<P> CatalogService<P> {
    /// Create a service over the program repository.
    pub fn new(programs: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self { programs, clock }
    }
}

pub(crate) fn map_program_persistence_error(error: ProgramPersistenceError) -> Error {
    match error {
        ProgramPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("program repository unavailable: {message}"))
        }
        ProgramPersistenceError::Query { message } => {
            Error::internal(format!("program repository error: {message}"))
        }
    }
}

pub(crate) fn program_not_found(id: ProgramId) -> Error {
    Error::not_found("program not found").with_details(serde_json::json!({ "programId": id.get() }))
}

#[async_trait]
impl<P> CatalogQuery for CatalogService<P>
where
    P: ProgramRepository,
{
    async fn list_programs(
        &self,
        principal: Option<&Principal>,
        request: PageRequest,
    ) -> Result<Page<Program>, Error> {
        require(principal, Action::ListPrograms)?;
        self.programs
            .list(request)
            .await
            .map_err(map_program_persistence_error)
    }

    async fn get_program(
        &self,
        principal: Option<&Principal>,
        id: ProgramId,
    ) -> Result<Program, Error> {
        require(principal, Action::ViewProgram(id))?;
        self.programs
            .find_by_id(id)
            .await
            .map_err(map_program_persistence_error)?
            .ok_or_else(|| program_not_found(id))
    }
}

#[async_trait]
impl<P> CatalogCommand for CatalogService<P>
where
    P: ProgramRepository,
{
    async fn create_program(
        &self,
        principal: Option<&Principal>,
        draft: ProgramDraft,
    ) -> Result<Program, Error> {
        require(principal, Action::CreateProgram)?;
        let program = self
            .programs
            .insert(draft, self.clock.utc())
            .await
            .map_err(map_program_persistence_error)?;
        info!(program_id = %program.id(), "program created");
        Ok(program)
    }

    async fn update_program(
        &self,
        principal: Option<&Principal>,
        id: ProgramId,
        patch: ProgramPatch,
    ) -> Result<Program, Error> {
        require(principal, Action::UpdateProgram(id))?;
        let updated = if patch.is_empty() {
            self.programs.find_by_id(id).await
        } else {
            self.programs.update(id, &patch).await
        };
        updated
            .map_err(map_program_persistence_error)?
            .ok_or_else(|| program_not_found(id))
    }

    async fn delete_program(
        &self,
        principal: Option<&Principal>,
        id: ProgramId,
    ) -> Result<(), Error> {
        require(principal, Action::DeleteProgram(id))?;
        let removed = self
            .programs
            .delete(id)
            .await
            .map_err(map_program_persistence_error)?
            .ok_or_else(|| program_not_found(id))?;
        info!(program_id = %id, enrollments_removed = removed, "program deleted");
        Ok(())
    }
}
