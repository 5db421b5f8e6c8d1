//! Driven port for roster persistence.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Email, NewUser, StoredCredentials, User, UserId, UserPatch};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses this email.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Storage for user accounts.
///
/// Implementations compare emails on their normalised form, so a lookup with
/// [`Email`] is case-insensitive. Listings are ordered by creation time,
/// newest first, with the identifier as tie-breaker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account, assigning its identifier.
    async fn insert(&self, user: NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch an account and its password hash by email.
    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// One page of accounts plus the total account count.
    async fn list(&self, request: PageRequest) -> Result<Page<User>, UserPersistenceError>;

    /// Apply `patch` and return the updated account, or `None` when absent.
    async fn update(
        &self,
        id: UserId,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserPersistenceError>;
}
