//! Authentication primitives: registration and login inputs, the verified
//! principal and the bearer credential issued at sign-in.
//!
//! Inbound adapters call the constructors here so raw payload strings are
//! validated before any port or service sees them.

use std::fmt;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use super::{Email, FullName, Role, User, UserId, UserValidationError};

/// Minimum number of characters in a password.
pub const PASSWORD_MIN: usize = 6;

/// Validation errors for registration and login payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// Email or full name failed roster validation.
    Field(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Password was shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(inner) => inner.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for AuthValidationError {}

impl From<UserValidationError> for AuthValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::Field(value)
    }
}

/// Validated sign-up request.
///
/// ## Invariants
/// - `email` is normalised (see [`Email`]).
/// - `password` holds at least [`PASSWORD_MIN`] characters and is wiped on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: Email,
    password: Zeroizing<String>,
    full_name: FullName,
}

impl Registration {
    /// Validate raw registration inputs.
    ///
    /// # Examples
    /// ```
    /// use catalog_backend::domain::Registration;
    ///
    /// let reg = Registration::try_from_parts(" Ada@Example.com ", "secret1", "Ada")
    ///     .expect("valid registration");
    /// assert_eq!(reg.email().as_ref(), "ada@example.com");
    /// ```
    pub fn try_from_parts(
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<Self, AuthValidationError> {
        let email = Email::new(email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(AuthValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        let full_name = FullName::new(full_name)?;
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
            full_name,
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn full_name(&self) -> &FullName {
        &self.full_name
    }
}

/// Validated sign-in request.
///
/// The password keeps caller-provided whitespace; only emptiness is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = Email::new(email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Verified identity attached to a request after its credential is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self::new(user.id(), user.role())
    }
}

/// Opaque signed bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Credential plus the account it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub credential: Credential,
    pub user: User,
}
