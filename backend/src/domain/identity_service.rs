//! Identity and session service.
//!
//! Implements [`Authenticator`] on top of the user repository, a password
//! hasher and a credential issuer. Credentials are stateless: nothing is
//! stored server-side, and signing out is a client-side discard.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    Authenticator, PasswordHashError, PasswordHasher, TokenError, TokenIssuer,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Email, Error, FullName, LoginCredentials, NewUser, Principal, Registration, Role, Session,
    User,
};

/// The single message every failed sign-in answers with.
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Identity service implementing the [`Authenticator`] driving port.
#[derive(Clone)]
pub struct IdentityService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<U, H, T> IdentityService<U, H, T> {
    /// Create a new service from its collaborators.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }
}

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict("email already registered"),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn map_signing_error(error: TokenError) -> Error {
    Error::internal(format!("failed to issue credential: {error}"))
}

impl<U, H, T> IdentityService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenIssuer,
{
    fn start_session(&self, user: User) -> Result<Session, Error> {
        let credential = self
            .tokens
            .issue(&Principal::from(&user), self.clock.utc())
            .map_err(map_signing_error)?;
        Ok(Session { credential, user })
    }

    async fn create_account(
        &self,
        email: Email,
        password: &str,
        full_name: FullName,
        role: Role,
    ) -> Result<User, Error> {
        let password_hash = self.hasher.hash(password).map_err(map_hash_error)?;
        let new_user = NewUser {
            email,
            full_name,
            role,
            password_hash,
            created_at: self.clock.utc(),
        };
        self.users
            .insert(new_user)
            .await
            .map_err(map_user_persistence_error)
    }

    /// Create the configured administrator unless the email is already taken.
    ///
    /// Returns `None` when an account with that email exists; its role is left
    /// as-is.
    pub async fn ensure_admin(
        &self,
        email: Email,
        password: &str,
        full_name: FullName,
    ) -> Result<Option<User>, Error> {
        let existing = self
            .users
            .find_credentials(&email)
            .await
            .map_err(map_user_persistence_error)?;
        if let Some(stored) = existing {
            debug!(user_id = %stored.user.id(), "bootstrap admin already present");
            return Ok(None);
        }
        let user = self
            .create_account(email, password, full_name, Role::Admin)
            .await?;
        info!(user_id = %user.id(), "bootstrap admin created");
        Ok(Some(user))
    }
}

#[async_trait]
impl<U, H, T> Authenticator for IdentityService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenIssuer,
{
    async fn register(&self, registration: Registration) -> Result<Session, Error> {
        let user = self
            .create_account(
                registration.email().clone(),
                registration.password(),
                registration.full_name().clone(),
                Role::User,
            )
            .await?;
        info!(user_id = %user.id(), "user registered");
        self.start_session(user)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, Error> {
        let stored = self
            .users
            .find_credentials(credentials.email())
            .await
            .map_err(map_user_persistence_error)?;

        let Some(stored) = stored else {
            // Burn the same verification cost as a real account.
            if let Err(error) = self
                .hasher
                .verify(credentials.password(), self.hasher.decoy_hash())
            {
                warn!(%error, "decoy password verification failed");
            }
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(map_hash_error)?;
        if !matches {
            debug!(user_id = %stored.user.id(), "password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        debug!(user_id = %stored.user.id(), "user signed in");
        self.start_session(stored.user)
    }

    fn verify(&self, token: &str) -> Result<Principal, Error> {
        self.tokens
            .verify(token, self.clock.utc())
            .map_err(|error| {
                warn!(%error, "bearer credential rejected");
                Error::unauthorized("invalid or expired credential")
            })
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
