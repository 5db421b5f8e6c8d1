//! Shared builders for domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    Email, FullName, Principal, Program, ProgramDescription, ProgramDraft, ProgramId,
    ProgramName, ProgramStatus, Role, User, UserId, parse_start_date,
};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn user_id(raw: i64) -> UserId {
    UserId::new(raw).expect("positive user id")
}

pub(crate) fn program_id(raw: i64) -> ProgramId {
    ProgramId::new(raw).expect("positive program id")
}

pub(crate) fn member(raw: i64) -> Principal {
    Principal::new(user_id(raw), Role::User)
}

pub(crate) fn admin(raw: i64) -> Principal {
    Principal::new(user_id(raw), Role::Admin)
}

pub(crate) fn sample_user(raw: i64, role: Role) -> User {
    User::new(
        user_id(raw),
        Email::new(format!("user{raw}@example.com")).expect("valid email"),
        FullName::new(format!("User {raw}")).expect("valid name"),
        role,
        fixture_timestamp(),
    )
}

pub(crate) fn sample_draft(name: &str, status: ProgramStatus) -> ProgramDraft {
    ProgramDraft {
        name: ProgramName::new(name).expect("valid name"),
        description: ProgramDescription::new("An introductory course").expect("valid description"),
        start_date: parse_start_date("2025-09-01").expect("valid date"),
        status,
    }
}

pub(crate) fn sample_program(raw: i64, status: ProgramStatus) -> Program {
    Program::new(
        program_id(raw),
        sample_draft(&format!("Program {raw}"), status),
        fixture_timestamp(),
    )
}
