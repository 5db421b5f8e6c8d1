//! PostgreSQL-backed `EnrollmentRepository`.
//!
//! `enroll` runs inside one transaction: the program row is read `FOR SHARE`
//! so a concurrent archive or delete waits for the enrolment to commit, and
//! the insert relies on the composite primary key to keep one row per pair.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use pagination::{Page, PageRequest};

use crate::domain::ports::{EnrollmentPersistenceError, EnrollmentRepository};
use crate::domain::{EnrollmentOutcome, Program, ProgramId, ProgramStatus, User, UserId};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::diesel_helpers::{collect_rows, page_bounds, row_total};
use super::models::{CorruptRow, EnrollmentRow, ProgramRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{enrollments, programs, users};

/// Diesel implementation of the enrolment ledger.
#[derive(Clone)]
pub struct DieselEnrollmentRepository {
    pool: DbPool,
}

impl DieselEnrollmentRepository {
    /// Create a repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> EnrollmentPersistenceError {
    map_pool_error(error, EnrollmentPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> EnrollmentPersistenceError {
    map_diesel_error(
        error,
        EnrollmentPersistenceError::query,
        EnrollmentPersistenceError::connection,
    )
}

fn corrupt(error: CorruptRow) -> EnrollmentPersistenceError {
    EnrollmentPersistenceError::query(error.to_string())
}

/// Failure inside the enrol transaction. Any variant rolls it back.
enum EnrollFailure {
    Diesel(diesel::result::Error),
    Rejected(EnrollmentPersistenceError),
}

impl From<diesel::result::Error> for EnrollFailure {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<EnrollFailure> for EnrollmentPersistenceError {
    fn from(failure: EnrollFailure) -> Self {
        match failure {
            EnrollFailure::Diesel(error) => diesel_error(error),
            EnrollFailure::Rejected(error) => error,
        }
    }
}

#[async_trait]
impl EnrollmentRepository for DieselEnrollmentRepository {
    async fn enroll(
        &self,
        user_id: UserId,
        program_id: ProgramId,
        enrolled_at: DateTime<Utc>,
    ) -> Result<EnrollmentOutcome, EnrollmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let candidate = EnrollmentRow {
            user_id: user_id.get(),
            program_id: program_id.get(),
            enrolled_at,
        };

        let (row, created) = conn
            .transaction(|conn| {
                async move {
                    let status: Option<String> = programs::table
                        .find(candidate.program_id)
                        .select(programs::status)
                        .for_share()
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(status) = status else {
                        return Err(EnrollFailure::Rejected(
                            EnrollmentPersistenceError::program_not_found(candidate.program_id),
                        ));
                    };

                    let user_exists: bool =
                        diesel::select(diesel::dsl::exists(users::table.find(candidate.user_id)))
                            .get_result(conn)
                            .await?;
                    if !user_exists {
                        return Err(EnrollFailure::Rejected(
                            EnrollmentPersistenceError::user_not_found(candidate.user_id),
                        ));
                    }

                    let accepts = status
                        .parse::<ProgramStatus>()
                        .map_err(|err| {
                            EnrollFailure::Rejected(EnrollmentPersistenceError::query(
                                err.to_string(),
                            ))
                        })?
                        .accepts_enrollments();
                    if !accepts {
                        return Err(EnrollFailure::Rejected(
                            EnrollmentPersistenceError::program_archived(candidate.program_id),
                        ));
                    }

                    let inserted: Option<EnrollmentRow> = diesel::insert_into(enrollments::table)
                        .values(&candidate)
                        .on_conflict((enrollments::user_id, enrollments::program_id))
                        .do_nothing()
                        .returning(EnrollmentRow::as_returning())
                        .get_result(conn)
                        .await
                        .optional()?;
                    if let Some(row) = inserted {
                        return Ok((row, true));
                    }

                    // The no-op upsert returns the stored row even if it was
                    // removed and re-added since the insert above.
                    let existing: EnrollmentRow = diesel::insert_into(enrollments::table)
                        .values(&candidate)
                        .on_conflict((enrollments::user_id, enrollments::program_id))
                        .do_update()
                        .set(enrollments::enrolled_at.eq(enrollments::enrolled_at))
                        .returning(EnrollmentRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok((existing, false))
                }
                .scope_boxed()
            })
            .await
            .map_err(EnrollmentPersistenceError::from)?;

        let record = row.into_enrollment().map_err(corrupt)?;
        Ok(EnrollmentOutcome { record, created })
    }

    async fn unenroll(
        &self,
        user_id: UserId,
        program_id: ProgramId,
    ) -> Result<bool, EnrollmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let removed = diesel::delete(enrollments::table.find((user_id.get(), program_id.get())))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(removed > 0)
    }

    async fn list_enrollees(
        &self,
        program_id: ProgramId,
        request: PageRequest,
    ) -> Result<Page<User>, EnrollmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let (limit, offset) = page_bounds(request);

        let total: i64 = enrollments::table
            .filter(enrollments::program_id.eq(program_id.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        let rows: Vec<UserRow> = enrollments::table
            .inner_join(users::table)
            .filter(enrollments::program_id.eq(program_id.get()))
            .select(UserRow::as_select())
            .order_by((enrollments::enrolled_at.desc(), users::id.desc()))
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        let items = collect_rows(rows, UserRow::into_user).map_err(corrupt)?;
        Ok(Page::new(items, row_total(total), request))
    }

    async fn list_programs_of_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Program>, EnrollmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let rows: Vec<ProgramRow> = enrollments::table
            .inner_join(programs::table)
            .filter(enrollments::user_id.eq(user_id.get()))
            .select(ProgramRow::as_select())
            .order_by((enrollments::enrolled_at.desc(), programs::id.desc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        collect_rows(rows, ProgramRow::into_program).map_err(corrupt)
    }
}
