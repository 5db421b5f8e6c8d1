//! Driving ports for the program catalogue.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, Principal, Program, ProgramDraft, ProgramId, ProgramPatch};

/// Read side of the catalogue.
#[async_trait]
pub trait CatalogQuery: Send + Sync {
    /// One page of programs, newest first.
    async fn list_programs(
        &self,
        principal: Option<&Principal>,
        request: PageRequest,
    ) -> Result<Page<Program>, Error>;

    /// A single program.
    async fn get_program(
        &self,
        principal: Option<&Principal>,
        id: ProgramId,
    ) -> Result<Program, Error>;
}

/// Write side of the catalogue. Admin only.
#[async_trait]
pub trait CatalogCommand: Send + Sync {
    async fn create_program(
        &self,
        principal: Option<&Principal>,
        draft: ProgramDraft,
    ) -> Result<Program, Error>;

    /// Partial update; an empty patch returns the program unchanged.
    async fn update_program(
        &self,
        principal: Option<&Principal>,
        id: ProgramId,
        patch: ProgramPatch,
    ) -> Result<Program, Error>;

    /// Delete a program and every enrolment in it.
    async fn delete_program(
        &self,
        principal: Option<&Principal>,
        id: ProgramId,
    ) -> Result<(), Error>;
}
