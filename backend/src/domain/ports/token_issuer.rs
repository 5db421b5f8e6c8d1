//! Driven port for signed bearer credentials.

use chrono::{DateTime, Utc};

use crate::domain::{Credential, Principal};

use super::define_port_error;

define_port_error! {
    /// Failures raised by credential adapters.
    pub enum TokenError {
        /// Credential could not be signed.
        Signing { message: String } => "credential signing failed: {message}",
        /// Credential signature or structure is invalid.
        Invalid { message: String } => "credential is invalid: {message}",
        /// Credential is past its expiry.
        Expired => "credential has expired",
    }
}

/// Issues and verifies stateless credentials asserting a [`Principal`].
///
/// Time is passed in by the caller so expiry follows the injected clock.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Sign a credential for `principal` valid from `now`.
    fn issue(&self, principal: &Principal, now: DateTime<Utc>) -> Result<Credential, TokenError>;

    /// Check signature and expiry, returning the asserted principal.
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, TokenError>;
}
