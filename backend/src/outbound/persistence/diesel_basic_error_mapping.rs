//! Diesel and pool error translation shared by every repository adapter.
//!
//! Each port error type exposes `connection` and `query` constructors; the
//! helpers here pick between them so adapters never leak driver text.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure onto the port's connection variant.
pub fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    debug!(message = error.message(), "connection checkout failed");
    connection(error.message().to_owned())
}

/// Map a Diesel failure onto the port's query or connection variant.
pub fn map_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => connection("database connection error"),
        DieselError::NotFound => query("record not found"),
        DieselError::DeserializationError(_) | DieselError::SerializationError(_) => {
            query("stored row could not be decoded")
        }
        _ => query("database error"),
    }
}

/// True for a `UNIQUE` constraint violation.
pub fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}
