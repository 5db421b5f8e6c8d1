//! Wire representations for the HTTP adapter.
//!
//! Bodies use camelCase. The snake_case spellings `full_name`, `start_date`
//! and `user_id` are accepted as aliases on input; this is the only place
//! the two spellings are reconciled.

use chrono::{DateTime, NaiveDate, Utc};
use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Enrollment, Error, Program, Session, User};

use super::validation::map_page_request;

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 7)]
    pub id: i64,
    #[schema(example = "alice@x.com")]
    pub email: String,
    #[schema(example = "Alice")]
    pub full_name: String,
    #[schema(example = "user")]
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().get(),
            email: user.email().to_string(),
            full_name: user.full_name().to_string(),
            role: user.role().as_str().to_owned(),
            created_at: user.created_at(),
        }
    }
}

/// Public view of a catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgramResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Algebra")]
    pub name: String,
    pub description: String,
    #[schema(value_type = String, format = Date, example = "2025-09-01")]
    pub start_date: NaiveDate,
    #[schema(example = "active")]
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Program> for ProgramResponse {
    fn from(program: &Program) -> Self {
        Self {
            id: program.id().get(),
            name: program.name().as_ref().to_owned(),
            description: program.description().as_ref().to_owned(),
            start_date: program.start_date(),
            status: program.status().as_str().to_owned(),
            created_at: program.created_at(),
        }
    }
}

/// Membership record returned by `POST /api/programs/{id}/enroll`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub user_id: i64,
    pub program_id: i64,
    pub enrolled_at: DateTime<Utc>,
}

impl From<&Enrollment> for EnrollmentResponse {
    fn from(record: &Enrollment) -> Self {
        Self {
            user_id: record.user_id.get(),
            program_id: record.program_id.get(),
            enrolled_at: record.enrolled_at,
        }
    }
}

/// Bearer credential plus the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

impl From<&Session> for AuthResponse {
    fn from(session: &Session) -> Self {
        Self {
            token: session.credential.token.clone(),
            expires_at: session.credential.expires_at,
            user: UserResponse::from(&session.user),
        }
    }
}

/// One page of programs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProgramPageResponse {
    pub items: Vec<ProgramResponse>,
    pub total: u64,
    pub pages: u64,
}

impl From<Page<Program>> for ProgramPageResponse {
    fn from(page: Page<Program>) -> Self {
        let (total, pages) = (page.total(), page.pages());
        Self {
            items: page.items().iter().map(ProgramResponse::from).collect(),
            total,
            pages,
        }
    }
}

/// One page of accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserPageResponse {
    pub items: Vec<UserResponse>,
    pub total: u64,
    pub pages: u64,
}

impl From<Page<User>> for UserPageResponse {
    fn from(page: Page<User>) -> Self {
        let (total, pages) = (page.total(), page.pages());
        Self {
            items: page.items().iter().map(UserResponse::from).collect(),
            total,
            pages,
        }
    }
}

/// `?page=&limit=` query string. Both optional.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-indexed page number (default 1).
    pub page: Option<u32>,
    /// Items per page (default 10, capped at 100).
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn to_request(self) -> Result<PageRequest, Error> {
        PageRequest::from_query(self.page, self.limit).map_err(map_page_request)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(alias = "full_name")]
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/programs`. `status` defaults to `active`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgramRequest {
    pub name: String,
    pub description: String,
    #[serde(alias = "start_date")]
    #[schema(example = "2025-09-01")]
    pub start_date: String,
    pub status: Option<String>,
}

/// Body of `PUT /api/programs/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgramRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "start_date")]
    pub start_date: Option<String>,
    pub status: Option<String>,
}

/// Body of `PUT /api/users/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(alias = "full_name")]
    pub full_name: Option<String>,
    pub role: Option<String>,
}

/// Body of `POST /api/programs/{id}/enroll`. Omitting `userId` enrols the
/// caller.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    #[serde(alias = "user_id")]
    pub user_id: Option<i64>,
}
