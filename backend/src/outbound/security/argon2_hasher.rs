//! Argon2id implementation of the [`PasswordHasher`] port.

use argon2::{Algorithm, Argon2, Params, Version};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    self, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Password hasher producing PHC-format argon2id strings.
///
/// Verification compares digests in constant time.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
    decoy: String,
}

impl Argon2PasswordHasher {
    /// Build a hasher with the crate's default argon2id parameters.
    ///
    /// Hashes a throwaway value up front so failed lookups can verify
    /// against a real hash with identical cost.
    pub fn new() -> Result<Self, PasswordHashError> {
        Self::with_params(Params::default())
    }

    /// Build a hasher with explicit cost parameters.
    ///
    /// Cheap parameters keep integration tests fast; production uses
    /// [`Argon2PasswordHasher::new`].
    pub fn with_params(params: Params) -> Result<Self, PasswordHashError> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let decoy = hash_with(&argon2, "decoy password never issued")?;
        Ok(Self { argon2, decoy })
    }
}

fn hash_with(argon2: &Argon2<'_>, password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError::hash(err.to_string()))
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        hash_with(&self.argon2, password)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::hash(err.to_string())),
        }
    }

    fn decoy_hash(&self) -> &str {
        &self.decoy
    }
}
