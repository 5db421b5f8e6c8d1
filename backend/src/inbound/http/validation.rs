//! Translation of domain validation failures into `400` responses.
//!
//! Every validation error carries `details: {field, code}` so clients can
//! highlight the offending input. Field names use the wire (camelCase) form.

use pagination::PageRequestError;
use serde_json::json;

use crate::domain::{
    AuthValidationError, Error, ProgramId, ProgramValidationError, UserId, UserValidationError,
};

/// Machine-readable reason attached to a field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReasonCode {
    Empty,
    Malformed,
    TooLong,
    TooShort,
    UnknownValue,
    OutOfRange,
}

impl ReasonCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Malformed => "malformed",
            Self::TooLong => "too_long",
            Self::TooShort => "too_short",
            Self::UnknownValue => "unknown_value",
            Self::OutOfRange => "out_of_range",
        }
    }
}

/// Newtype wrapper for wire field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }
}

pub(crate) fn field_error(field: FieldName, code: ReasonCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.0,
        "code": code.as_str(),
    }))
}

const ID: FieldName = FieldName::new("id");
const EMAIL: FieldName = FieldName::new("email");
const PASSWORD: FieldName = FieldName::new("password");
const FULL_NAME: FieldName = FieldName::new("fullName");
const ROLE: FieldName = FieldName::new("role");
const NAME: FieldName = FieldName::new("name");
const DESCRIPTION: FieldName = FieldName::new("description");
const START_DATE: FieldName = FieldName::new("startDate");
const STATUS: FieldName = FieldName::new("status");
const PAGE: FieldName = FieldName::new("page");
const LIMIT: FieldName = FieldName::new("limit");

pub(crate) fn map_user_validation(err: UserValidationError) -> Error {
    let (field, code) = match err {
        UserValidationError::InvalidId => (ID, ReasonCode::OutOfRange),
        UserValidationError::EmptyEmail => (EMAIL, ReasonCode::Empty),
        UserValidationError::MalformedEmail => (EMAIL, ReasonCode::Malformed),
        UserValidationError::EmptyFullName => (FULL_NAME, ReasonCode::Empty),
        UserValidationError::FullNameTooLong { .. } => (FULL_NAME, ReasonCode::TooLong),
        UserValidationError::UnknownRole => (ROLE, ReasonCode::UnknownValue),
    };
    field_error(field, code, err.to_string())
}

pub(crate) fn map_auth_validation(err: AuthValidationError) -> Error {
    match err {
        AuthValidationError::Field(inner) => map_user_validation(inner),
        AuthValidationError::EmptyPassword => {
            field_error(PASSWORD, ReasonCode::Empty, err.to_string())
        }
        AuthValidationError::PasswordTooShort { .. } => {
            field_error(PASSWORD, ReasonCode::TooShort, err.to_string())
        }
    }
}

pub(crate) fn map_program_validation(err: ProgramValidationError) -> Error {
    let (field, code) = match err {
        ProgramValidationError::InvalidId => (ID, ReasonCode::OutOfRange),
        ProgramValidationError::EmptyName => (NAME, ReasonCode::Empty),
        ProgramValidationError::NameTooLong { .. } => (NAME, ReasonCode::TooLong),
        ProgramValidationError::EmptyDescription => (DESCRIPTION, ReasonCode::Empty),
        ProgramValidationError::MalformedStartDate => (START_DATE, ReasonCode::Malformed),
        ProgramValidationError::UnknownStatus => (STATUS, ReasonCode::UnknownValue),
    };
    field_error(field, code, err.to_string())
}

pub(crate) fn map_page_request(err: PageRequestError) -> Error {
    let field = match err {
        PageRequestError::PageOutOfRange => PAGE,
        PageRequestError::LimitOutOfRange => LIMIT,
    };
    field_error(field, ReasonCode::OutOfRange, err.to_string())
}

pub(crate) fn parse_user_id(raw: i64) -> Result<UserId, Error> {
    UserId::new(raw).map_err(map_user_validation)
}

pub(crate) fn parse_program_id(raw: i64) -> Result<ProgramId, Error> {
    ProgramId::new(raw).map_err(map_program_validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use serde_json::Value;

    fn details(error: &Error) -> (&str, &str) {
        let details = error.details().expect("details present");
        let text = |key: &str| match details.get(key) {
            Some(Value::String(value)) => value.as_str(),
            other => panic!("expected string at {key}, got {other:?}"),
        };
        (text("field"), text("code"))
    }

    #[rstest]
    #[case(UserValidationError::MalformedEmail, "email", "malformed")]
    #[case(UserValidationError::EmptyFullName, "fullName", "empty")]
    #[case(UserValidationError::FullNameTooLong { max: 100 }, "fullName", "too_long")]
    #[case(UserValidationError::UnknownRole, "role", "unknown_value")]
    fn user_errors_name_the_wire_field(
        #[case] err: UserValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let error = map_user_validation(err);

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(details(&error), (field, code));
    }

    #[rstest]
    #[case(ProgramValidationError::MalformedStartDate, "startDate", "malformed")]
    #[case(ProgramValidationError::UnknownStatus, "status", "unknown_value")]
    #[case(ProgramValidationError::EmptyDescription, "description", "empty")]
    fn program_errors_name_the_wire_field(
        #[case] err: ProgramValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        assert_eq!(details(&map_program_validation(err)), (field, code));
    }

    #[rstest]
    fn short_passwords_are_reported_on_password() {
        let error = map_auth_validation(AuthValidationError::PasswordTooShort { min: 6 });

        assert_eq!(details(&error), ("password", "too_short"));
        assert_eq!(error.message(), "password must be at least 6 characters");
    }

    #[rstest]
    #[case(PageRequestError::PageOutOfRange, "page")]
    #[case(PageRequestError::LimitOutOfRange, "limit")]
    fn page_errors_name_the_parameter(#[case] err: PageRequestError, #[case] field: &str) {
        assert_eq!(details(&map_page_request(err)).0, field);
    }

    #[rstest]
    #[case(0)]
    #[case(-4)]
    fn non_positive_path_ids_are_rejected(#[case] raw: i64) {
        assert!(parse_user_id(raw).is_err());
        assert!(parse_program_id(raw).is_err());
    }
}
