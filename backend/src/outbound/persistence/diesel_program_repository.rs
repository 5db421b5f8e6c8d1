//! PostgreSQL-backed `ProgramRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use pagination::{Page, PageRequest};
use tracing::debug;

use crate::domain::ports::{ProgramPersistenceError, ProgramRepository};
use crate::domain::{Program, ProgramDraft, ProgramId, ProgramPatch};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::diesel_helpers::{collect_rows, page_bounds, row_total};
use super::models::{CorruptRow, NewProgramRow, ProgramChangeset, ProgramRow};
use super::pool::{DbPool, PoolError};
use super::schema::{enrollments, programs};

/// Diesel implementation of the catalogue store.
#[derive(Clone)]
pub struct DieselProgramRepository {
    pool: DbPool,
}

impl DieselProgramRepository {
    /// Create a repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ProgramPersistenceError {
    map_pool_error(error, ProgramPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ProgramPersistenceError {
    map_diesel_error(
        error,
        ProgramPersistenceError::query,
        ProgramPersistenceError::connection,
    )
}

fn corrupt(error: CorruptRow) -> ProgramPersistenceError {
    ProgramPersistenceError::query(error.to_string())
}

#[async_trait]
impl ProgramRepository for DieselProgramRepository {
    async fn list(&self, request: PageRequest) -> Result<Page<Program>, ProgramPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let (limit, offset) = page_bounds(request);

        let total: i64 = programs::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        let rows: Vec<ProgramRow> = programs::table
            .select(ProgramRow::as_select())
            .order_by((programs::created_at.desc(), programs::id.desc()))
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        let items = collect_rows(rows, ProgramRow::into_program).map_err(corrupt)?;
        Ok(Page::new(items, row_total(total), request))
    }

    async fn find_by_id(&self, id: ProgramId) -> Result<Option<Program>, ProgramPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row: Option<ProgramRow> = programs::table
            .find(id.get())
            .select(ProgramRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(ProgramRow::into_program)
            .transpose()
            .map_err(corrupt)
    }

    async fn insert(
        &self,
        draft: ProgramDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Program, ProgramPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row: ProgramRow = diesel::insert_into(programs::table)
            .values(NewProgramRow::new(&draft, created_at))
            .returning(ProgramRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;

        row.into_program().map_err(corrupt)
    }

    async fn update(
        &self,
        id: ProgramId,
        patch: &ProgramPatch,
    ) -> Result<Option<Program>, ProgramPersistenceError> {
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row: Option<ProgramRow> = diesel::update(programs::table.find(id.get()))
            .set(ProgramChangeset::from(patch))
            .returning(ProgramRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(ProgramRow::into_program)
            .transpose()
            .map_err(corrupt)
    }

    async fn delete(&self, id: ProgramId) -> Result<Option<u64>, ProgramPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let raw_id = id.get();

        // Enrolments go first so the count is exact; the program delete in the
        // same transaction makes the cascade atomic.
        let (removed, deleted) = conn
            .transaction(|conn| {
                async move {
                    let removed = diesel::delete(
                        enrollments::table.filter(enrollments::program_id.eq(raw_id)),
                    )
                    .execute(conn)
                    .await?;
                    let deleted = diesel::delete(programs::table.find(raw_id))
                        .execute(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>((removed, deleted))
                }
                .scope_boxed()
            })
            .await
            .map_err(diesel_error)?;

        if deleted == 0 {
            return Ok(None);
        }
        debug!(program_id = raw_id, removed, "program row deleted");
        Ok(Some(u64::try_from(removed).unwrap_or(u64::MAX)))
    }
}
