//! HS256 JWT implementation of the [`TokenIssuer`] port.
//!
//! Claims: `sub` (user id), `role`, `iat` and `exp` as Unix seconds. Expiry
//! is compared against the caller-supplied time rather than the system
//! clock, so the library's own `exp` check is disabled.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{TokenError, TokenIssuer};
use crate::domain::{Credential, Principal, Role, UserId};

/// Symmetric signing secret, wiped from memory on drop.
#[derive(Clone)]
pub struct TokenSecret(Zeroizing<Vec<u8>>);

impl TokenSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl std::fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenSecret(..)")
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies bearer credentials with a shared secret.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenIssuer {
    /// Build an issuer whose credentials live for `ttl`.
    pub fn new(secret: &TokenSecret, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = ["exp", "sub"].map(String::from).into();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, principal: &Principal, now: DateTime<Utc>) -> Result<Credential, TokenError> {
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: principal.user_id.to_string(),
            role: principal.role.as_str().to_owned(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))?;
        Ok(Credential { token, expires_at })
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| TokenError::invalid(err.to_string()))?
            .claims;
        if now.timestamp() >= claims.exp {
            return Err(TokenError::expired());
        }
        let raw_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| TokenError::invalid("subject is not a user id"))?;
        let user_id = UserId::new(raw_id).map_err(|err| TokenError::invalid(err.to_string()))?;
        let role = claims
            .role
            .parse::<Role>()
            .map_err(|err| TokenError::invalid(err.to_string()))?;
        Ok(Principal::new(user_id, role))
    }
}
