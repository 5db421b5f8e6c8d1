//! Bearer credential extraction.
//!
//! [`Caller`] reads `Authorization: Bearer <token>` and verifies it through
//! the [`Authenticator`](crate::domain::ports::Authenticator) port. A missing
//! or rejected credential yields an anonymous caller; the access gate then
//! answers 401 for anything that needs a principal. Handlers pass the
//! principal into each port call explicitly.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::warn;

use crate::domain::{Error, Principal};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated principal for the current request, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller(Option<Principal>);

impl Caller {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.0.as_ref()
    }

    /// Principal or `401 Unauthorized`.
    pub fn require(&self) -> Result<&Principal, Error> {
        self.principal()
            .ok_or_else(|| Error::unauthorized("authentication required"))
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let raw = req.headers().get(AUTHORIZATION)?;
    let Ok(value) = raw.to_str() else {
        warn!("authorization header is not valid ASCII");
        return None;
    };
    let token = value.strip_prefix(BEARER_PREFIX).map(str::trim);
    if token.is_none_or(str::is_empty) {
        warn!("authorization header is not a bearer credential");
        return None;
    }
    token
}

fn resolve(req: &HttpRequest) -> Result<Caller, Error> {
    let Some(token) = bearer_token(req) else {
        return Ok(Caller::anonymous());
    };
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    // Verification failures are logged by the authenticator.
    Ok(Caller(state.auth.verify(token).ok()))
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve(req))
    }
}
