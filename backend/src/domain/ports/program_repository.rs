//! Driven port for catalogue persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};

use crate::domain::{Program, ProgramDraft, ProgramId, ProgramPatch};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by program repository adapters.
    pub enum ProgramPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "program repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "program repository query failed: {message}",
    }
}

/// Storage for catalogue programs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgramRepository: Send + Sync {
    /// One page of programs, newest first, plus the total program count.
    async fn list(&self, request: PageRequest) -> Result<Page<Program>, ProgramPersistenceError>;

    /// Fetch a program by identifier.
    async fn find_by_id(&self, id: ProgramId) -> Result<Option<Program>, ProgramPersistenceError>;

    /// Insert a program, assigning its identifier.
    async fn insert(
        &self,
        draft: ProgramDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Program, ProgramPersistenceError>;

    /// Apply `patch` and return the updated program, or `None` when absent.
    async fn update(
        &self,
        id: ProgramId,
        patch: &ProgramPatch,
    ) -> Result<Option<Program>, ProgramPersistenceError>;

    /// Delete a program together with its enrolments, atomically.
    ///
    /// Returns the number of enrolments removed, or `None` when the program
    /// did not exist.
    async fn delete(&self, id: ProgramId) -> Result<Option<u64>, ProgramPersistenceError>;
}
