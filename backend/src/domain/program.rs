//! Catalogue data model: programs, their lifecycle status and edits.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

/// Maximum number of characters in a program name.
pub const PROGRAM_NAME_MAX: usize = 200;

/// Validation errors raised while constructing program fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramValidationError {
    InvalidId,
    EmptyName,
    NameTooLong { max: usize },
    EmptyDescription,
    MalformedStartDate,
    UnknownStatus,
}

impl fmt::Display for ProgramValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "program id must be a positive integer"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::MalformedStartDate => write!(f, "startDate must be a YYYY-MM-DD date"),
            Self::UnknownStatus => {
                write!(f, "status must be one of: active, inactive, archived")
            }
        }
    }
}

impl std::error::Error for ProgramValidationError {}

/// Store-assigned program identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProgramId(i64);

impl ProgramId {
    /// Validate a raw identifier.
    pub fn new(raw: i64) -> Result<Self, ProgramValidationError> {
        if raw <= 0 {
            return Err(ProgramValidationError::InvalidId);
        }
        Ok(Self(raw))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Trimmed, non-empty program name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramName(String);

impl ProgramName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ProgramValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ProgramValidationError::EmptyName);
        }
        if trimmed.chars().count() > PROGRAM_NAME_MAX {
            return Err(ProgramValidationError::NameTooLong {
                max: PROGRAM_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ProgramName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ProgramName> for String {
    fn from(value: ProgramName) -> Self {
        value.0
    }
}

/// Free-form description, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramDescription(String);

impl ProgramDescription {
    pub fn new(raw: impl Into<String>) -> Result<Self, ProgramValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ProgramValidationError::EmptyDescription);
        }
        if trimmed.len() == raw.len() {
            return Ok(Self(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ProgramDescription {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ProgramDescription> for String {
    fn from(value: ProgramDescription) -> Self {
        value.0
    }
}

/// Parse a calendar date in `YYYY-MM-DD` form.
///
/// # Examples
/// ```
/// use catalog_backend::domain::parse_start_date;
///
/// assert!(parse_start_date("2025-09-01").is_ok());
/// assert!(parse_start_date("01/09/2025").is_err());
/// ```
pub fn parse_start_date(raw: &str) -> Result<NaiveDate, ProgramValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ProgramValidationError::MalformedStartDate)
}

/// Lifecycle state of a program. Archived programs accept no new enrolments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProgramStatus {
    #[default]
    Active,
    Inactive,
    Archived,
}

impl ProgramStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Archived => "archived",
        }
    }

    /// Whether new enrolments may be recorded.
    pub fn accepts_enrollments(self) -> bool {
        !matches!(self, Self::Archived)
    }
}

impl fmt::Display for ProgramStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgramStatus {
    type Err = ProgramValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "archived" => Ok(Self::Archived),
            _ => Err(ProgramValidationError::UnknownStatus),
        }
    }
}

/// Catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    id: ProgramId,
    name: ProgramName,
    description: ProgramDescription,
    start_date: NaiveDate,
    status: ProgramStatus,
    created_at: DateTime<Utc>,
}

impl Program {
    pub fn new(id: ProgramId, draft: ProgramDraft, created_at: DateTime<Utc>) -> Self {
        let ProgramDraft {
            name,
            description,
            start_date,
            status,
        } = draft;
        Self {
            id,
            name,
            description,
            start_date,
            status,
            created_at,
        }
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn name(&self) -> &ProgramName {
        &self.name
    }

    pub fn description(&self) -> &ProgramDescription {
        &self.description
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn status(&self) -> ProgramStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Apply a partial update. Identifier and creation time never change.
    pub fn apply(mut self, patch: &ProgramPatch) -> Self {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self
    }
}

/// Validated fields for a new program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramDraft {
    pub name: ProgramName,
    pub description: ProgramDescription,
    pub start_date: NaiveDate,
    pub status: ProgramStatus,
}

/// Partial update for a program. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramPatch {
    pub name: Option<ProgramName>,
    pub description: Option<ProgramDescription>,
    pub start_date: Option<NaiveDate>,
    pub status: Option<ProgramStatus>,
}

impl ProgramPatch {
    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.start_date.is_none()
            && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn draft() -> ProgramDraft {
        ProgramDraft {
            name: ProgramName::new("Rust 101").expect("valid name"),
            description: ProgramDescription::new("Intro").expect("valid description"),
            start_date: parse_start_date("2025-09-01").expect("valid date"),
            status: ProgramStatus::Active,
        }
    }

    #[rstest]
    #[case("", ProgramValidationError::EmptyName)]
    #[case("   ", ProgramValidationError::EmptyName)]
    fn name_rejects_blank(#[case] raw: &str, #[case] expected: ProgramValidationError) {
        assert_eq!(ProgramName::new(raw), Err(expected));
    }

    #[rstest]
    fn name_rejects_overlong() {
        let raw = "x".repeat(PROGRAM_NAME_MAX + 1);
        assert_eq!(
            ProgramName::new(raw),
            Err(ProgramValidationError::NameTooLong {
                max: PROGRAM_NAME_MAX
            })
        );
    }

    #[rstest]
    fn description_rejects_whitespace() {
        assert_eq!(
            ProgramDescription::new(" \n "),
            Err(ProgramValidationError::EmptyDescription)
        );
    }

    #[rstest]
    #[case("2025-02-30")]
    #[case("2025/09/01")]
    #[case("tomorrow")]
    fn start_date_rejects_malformed(#[case] raw: &str) {
        assert_eq!(
            parse_start_date(raw),
            Err(ProgramValidationError::MalformedStartDate)
        );
    }

    #[rstest]
    #[case("active", ProgramStatus::Active, true)]
    #[case("inactive", ProgramStatus::Inactive, true)]
    #[case("archived", ProgramStatus::Archived, false)]
    fn status_parses_and_gates_enrolment(
        #[case] raw: &str,
        #[case] expected: ProgramStatus,
        #[case] accepts: bool,
    ) {
        let status: ProgramStatus = raw.parse().expect("known status");
        assert_eq!(status, expected);
        assert_eq!(status.accepts_enrollments(), accepts);
    }

    #[rstest]
    fn patch_changes_only_supplied_fields(draft: ProgramDraft) {
        let created_at = DateTime::<Utc>::UNIX_EPOCH;
        let program = Program::new(ProgramId::new(1).expect("id"), draft, created_at);
        let patch = ProgramPatch {
            status: Some(ProgramStatus::Archived),
            ..ProgramPatch::default()
        };

        let updated = program.clone().apply(&patch);

        assert_eq!(updated.status(), ProgramStatus::Archived);
        assert_eq!(updated.name(), program.name());
        assert_eq!(updated.start_date(), program.start_date());
        assert_eq!(updated.created_at(), created_at);
        assert_eq!(updated.id(), program.id());
    }

    #[rstest]
    fn default_patch_is_empty() {
        assert!(ProgramPatch::default().is_empty());
    }
}
