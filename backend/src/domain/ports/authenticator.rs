//! Driving port for sign-up, sign-in and credential verification.
//!
//! Inbound adapters call this port without knowing how passwords are stored
//! or how credentials are signed.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Principal, Registration, Session};

/// Identity and session use-cases.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Create an account with the `user` role and sign the caller in.
    async fn register(&self, registration: Registration) -> Result<Session, Error>;

    /// Check credentials and sign the caller in.
    ///
    /// Unknown email and wrong password produce the same error.
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, Error>;

    /// Check a bearer credential and return the principal it asserts.
    fn verify(&self, token: &str) -> Result<Principal, Error>;
}
