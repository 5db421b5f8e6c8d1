//! In-process store implementing every repository port.
//!
//! One `tokio` mutex guards users, programs and enrolments together, so each
//! port call observes and mutates a consistent snapshot: an enrolment check
//! and insert, or a program delete and its cascade, happen under one lock.
//! Used when the server runs without a database and throughout the tests.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};
use tokio::sync::Mutex;

use crate::domain::ports::{
    EnrollmentPersistenceError, EnrollmentRepository, ProgramPersistenceError, ProgramRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Email, Enrollment, EnrollmentOutcome, NewUser, Program, ProgramDraft, ProgramId,
    ProgramPatch, StoredCredentials, User, UserId, UserPatch,
};

#[derive(Debug, Default)]
struct State {
    last_user_id: i64,
    last_program_id: i64,
    users: BTreeMap<UserId, StoredCredentials>,
    emails: BTreeSet<String>,
    programs: BTreeMap<ProgramId, Program>,
    // Keyed by (program, user) so a program's members are contiguous.
    enrollments: BTreeMap<(ProgramId, UserId), DateTime<Utc>>,
}

/// Shared in-memory backing store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T, K: Ord>(rows: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, K)) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

fn paginate<T: Clone>(rows: &[T], request: PageRequest) -> Page<T> {
    let total = u64::try_from(rows.len()).unwrap_or(u64::MAX);
    Page::new(request.window(rows).to_vec(), total, request)
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.state.lock().await;
        if state.emails.contains(user.email.as_ref()) {
            return Err(UserPersistenceError::duplicate_email(user.email));
        }
        let id = UserId::new(state.last_user_id + 1)
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        state.last_user_id = id.get();
        let NewUser {
            email,
            full_name,
            role,
            password_hash,
            created_at,
        } = user;
        state.emails.insert(email.to_string());
        let stored = User::new(id, email, full_name, role, created_at);
        state.users.insert(
            id,
            StoredCredentials {
                user: stored.clone(),
                password_hash,
            },
        );
        Ok(stored)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state.lock().await;
        Ok(state.users.get(&id).map(|row| row.user.clone()))
    }

    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|row| row.user.email() == email)
            .cloned())
    }

    async fn list(&self, request: PageRequest) -> Result<Page<User>, UserPersistenceError> {
        let state = self.state.lock().await;
        let mut users: Vec<User> = state.users.values().map(|row| row.user.clone()).collect();
        newest_first(&mut users, |user| (user.created_at(), user.id()));
        Ok(paginate(&users, request))
    }

    async fn update(
        &self,
        id: UserId,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.state.lock().await;
        let Some(row) = state.users.get_mut(&id) else {
            return Ok(None);
        };
        row.user = row.user.clone().apply(patch);
        Ok(Some(row.user.clone()))
    }
}

#[async_trait]
impl ProgramRepository for InMemoryStore {
    async fn list(&self, request: PageRequest) -> Result<Page<Program>, ProgramPersistenceError> {
        let state = self.state.lock().await;
        let mut programs: Vec<Program> = state.programs.values().cloned().collect();
        newest_first(&mut programs, |program| (program.created_at(), program.id()));
        Ok(paginate(&programs, request))
    }

    async fn find_by_id(&self, id: ProgramId) -> Result<Option<Program>, ProgramPersistenceError> {
        let state = self.state.lock().await;
        Ok(state.programs.get(&id).cloned())
    }

    async fn insert(
        &self,
        draft: ProgramDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Program, ProgramPersistenceError> {
        let mut state = self.state.lock().await;
        let id = ProgramId::new(state.last_program_id + 1)
            .map_err(|err| ProgramPersistenceError::query(err.to_string()))?;
        state.last_program_id = id.get();
        let program = Program::new(id, draft, created_at);
        state.programs.insert(id, program.clone());
        Ok(program)
    }

    async fn update(
        &self,
        id: ProgramId,
        patch: &ProgramPatch,
    ) -> Result<Option<Program>, ProgramPersistenceError> {
        let mut state = self.state.lock().await;
        let Some(program) = state.programs.get_mut(&id) else {
            return Ok(None);
        };
        *program = program.clone().apply(patch);
        Ok(Some(program.clone()))
    }

    async fn delete(&self, id: ProgramId) -> Result<Option<u64>, ProgramPersistenceError> {
        let mut state = self.state.lock().await;
        if state.programs.remove(&id).is_none() {
            return Ok(None);
        }
        let before = state.enrollments.len();
        state.enrollments.retain(|(program, _), _| *program != id);
        let removed = before - state.enrollments.len();
        Ok(Some(u64::try_from(removed).unwrap_or(u64::MAX)))
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryStore {
    async fn enroll(
        &self,
        user_id: UserId,
        program_id: ProgramId,
        enrolled_at: DateTime<Utc>,
    ) -> Result<EnrollmentOutcome, EnrollmentPersistenceError> {
        let mut state = self.state.lock().await;
        let program = state
            .programs
            .get(&program_id)
            .ok_or_else(|| EnrollmentPersistenceError::program_not_found(program_id.get()))?;
        if !state.users.contains_key(&user_id) {
            return Err(EnrollmentPersistenceError::user_not_found(user_id.get()));
        }
        if !program.status().accepts_enrollments() {
            return Err(EnrollmentPersistenceError::program_archived(program_id.get()));
        }
        if let Some(existing) = state.enrollments.get(&(program_id, user_id)) {
            return Ok(EnrollmentOutcome {
                record: Enrollment {
                    user_id,
                    program_id,
                    enrolled_at: *existing,
                },
                created: false,
            });
        }
        state
            .enrollments
            .insert((program_id, user_id), enrolled_at);
        Ok(EnrollmentOutcome {
            record: Enrollment {
                user_id,
                program_id,
                enrolled_at,
            },
            created: true,
        })
    }

    async fn unenroll(
        &self,
        user_id: UserId,
        program_id: ProgramId,
    ) -> Result<bool, EnrollmentPersistenceError> {
        let mut state = self.state.lock().await;
        Ok(state.enrollments.remove(&(program_id, user_id)).is_some())
    }

    async fn list_enrollees(
        &self,
        program_id: ProgramId,
        request: PageRequest,
    ) -> Result<Page<User>, EnrollmentPersistenceError> {
        let state = self.state.lock().await;
        let mut members: Vec<(DateTime<Utc>, User)> = state
            .enrollments
            .range((program_id, UserId::MIN)..=(program_id, UserId::MAX))
            .filter_map(|((_, user_id), at)| {
                state.users.get(user_id).map(|row| (*at, row.user.clone()))
            })
            .collect();
        newest_first(&mut members, |(at, user)| (*at, user.id()));
        let users: Vec<User> = members.into_iter().map(|(_, user)| user).collect();
        Ok(paginate(&users, request))
    }

    async fn list_programs_of_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Program>, EnrollmentPersistenceError> {
        let state = self.state.lock().await;
        let mut joined: Vec<(DateTime<Utc>, Program)> = state
            .enrollments
            .iter()
            .filter(|((_, member), _)| *member == user_id)
            .filter_map(|((program_id, _), at)| {
                state.programs.get(program_id).map(|p| (*at, p.clone()))
            })
            .collect();
        newest_first(&mut joined, |(at, program)| (*at, program.id()));
        Ok(joined.into_iter().map(|(_, program)| program).collect())
    }
}
