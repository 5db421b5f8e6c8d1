//! Internal Diesel row structs.
//!
//! Rows never leave the persistence layer; repositories decode them into
//! domain types through the `into_*` helpers, which re-validate every field.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use super::schema::{enrollments, programs, users};
use crate::domain::{
    Email, Enrollment, FullName, NewUser, Program, ProgramDescription, ProgramDraft, ProgramId,
    ProgramName, ProgramPatch, ProgramStatus, Role, StoredCredentials, User, UserId, UserPatch,
};

/// A stored row failed domain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored {table} row {id} is invalid: {reason}")]
pub(crate) struct CorruptRow {
    table: &'static str,
    id: i64,
    reason: String,
}

impl CorruptRow {
    fn new(table: &'static str, id: i64, reason: impl ToString) -> Self {
        Self {
            table,
            id,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, CorruptRow> {
        Ok(self.into_credentials()?.user)
    }

    pub(crate) fn into_credentials(self) -> Result<StoredCredentials, CorruptRow> {
        let corrupt = |reason: crate::domain::UserValidationError| {
            CorruptRow::new("users", self.id, reason)
        };
        let user = User::new(
            UserId::new(self.id).map_err(corrupt)?,
            Email::new(&self.email).map_err(corrupt)?,
            FullName::new(&self.full_name).map_err(corrupt)?,
            self.role.parse::<Role>().map_err(corrupt)?,
            self.created_at,
        );
        Ok(StoredCredentials {
            user,
            password_hash: self.password_hash,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub full_name: &'a str,
    pub role: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            email: user.email.as_ref(),
            full_name: user.full_name.as_ref(),
            role: user.role.as_str(),
            password_hash: &user.password_hash,
            created_at: user.created_at,
        }
    }
}

/// `None` fields are skipped by Diesel.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub full_name: Option<&'a str>,
    pub role: Option<&'a str>,
}

impl<'a> From<&'a UserPatch> for UserChangeset<'a> {
    fn from(patch: &'a UserPatch) -> Self {
        Self {
            full_name: patch.full_name().map(AsRef::as_ref),
            role: patch.role().map(Role::as_str),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = programs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProgramRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl ProgramRow {
    pub(crate) fn into_program(self) -> Result<Program, CorruptRow> {
        let corrupt = |reason: crate::domain::ProgramValidationError| {
            CorruptRow::new("programs", self.id, reason)
        };
        let draft = ProgramDraft {
            name: ProgramName::new(&self.name).map_err(corrupt)?,
            description: ProgramDescription::new(self.description.clone()).map_err(corrupt)?,
            start_date: self.start_date,
            status: self.status.parse::<ProgramStatus>().map_err(corrupt)?,
        };
        Ok(Program::new(
            ProgramId::new(self.id).map_err(corrupt)?,
            draft,
            self.created_at,
        ))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = programs)]
pub(crate) struct NewProgramRow<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub start_date: NaiveDate,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewProgramRow<'a> {
    pub(crate) fn new(draft: &'a ProgramDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            name: draft.name.as_ref(),
            description: draft.description.as_ref(),
            start_date: draft.start_date,
            status: draft.status.as_str(),
            created_at,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = programs)]
pub(crate) struct ProgramChangeset<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub start_date: Option<NaiveDate>,
    pub status: Option<&'a str>,
}

impl<'a> From<&'a ProgramPatch> for ProgramChangeset<'a> {
    fn from(patch: &'a ProgramPatch) -> Self {
        Self {
            name: patch.name.as_ref().map(AsRef::as_ref),
            description: patch.description.as_ref().map(AsRef::as_ref),
            start_date: patch.start_date,
            status: patch.status.map(ProgramStatus::as_str),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = enrollments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EnrollmentRow {
    pub user_id: i64,
    pub program_id: i64,
    pub enrolled_at: DateTime<Utc>,
}

impl EnrollmentRow {
    pub(crate) fn into_enrollment(self) -> Result<Enrollment, CorruptRow> {
        let user_id = UserId::new(self.user_id)
            .map_err(|reason| CorruptRow::new("enrollments", self.user_id, reason))?;
        let program_id = ProgramId::new(self.program_id)
            .map_err(|reason| CorruptRow::new("enrollments", self.program_id, reason))?;
        Ok(Enrollment {
            user_id,
            program_id,
            enrolled_at: self.enrolled_at,
        })
    }
}
