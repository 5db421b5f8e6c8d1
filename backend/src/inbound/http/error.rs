//! HTTP adapter mapping for domain errors.
//!
//! Keeps `domain::Error` HTTP-agnostic while letting Actix handlers turn
//! failures into one JSON envelope with a matching status. Extractor
//! failures (malformed JSON, query strings, path segments) are routed
//! through the same envelope as `400 invalid_request`.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use serde_json::json;
use tracing::{debug, error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Message shown for storage outages; the driver's text stays in the logs.
pub const UNAVAILABLE_MESSAGE: &str = "service temporarily unavailable";

fn redact(error: &Error) -> Error {
    let replacement = match error.code() {
        ErrorCode::InternalError => {
            error!(message = error.message(), trace_id = ?error.trace_id(), "internal error");
            Error::internal("Internal server error")
        }
        ErrorCode::ServiceUnavailable => {
            warn!(message = error.message(), trace_id = ?error.trace_id(), "storage unavailable");
            Error::service_unavailable(UNAVAILABLE_MESSAGE)
        }
        _ => return error.clone(),
    };
    match error.trace_id() {
        Some(id) => replacement.with_trace_id(id.to_owned()),
        None => replacement,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// `400 invalid_request` for input that could not be decoded at all.
///
/// `source` is one of `body`, `query` or `path`.
pub(crate) fn malformed(source: &'static str, message: String) -> Error {
    debug!(source, %message, "request rejected by extractor");
    Error::invalid_request(message).with_details(json!({ "source": source, "code": "malformed" }))
}

fn extractor_error(source: &'static str, message: String) -> actix_web::Error {
    malformed(source, message).into()
}

/// JSON body settings: malformed or mistyped bodies become `400`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        extractor_error("body", format!("invalid request body: {err}"))
    })
}

/// Query string settings: non-numeric `page`/`limit` become `400`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
        extractor_error("query", format!("invalid query string: {err}"))
    })
}

/// Path settings: non-numeric identifiers become `400`.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req: &HttpRequest| {
        extractor_error("path", format!("invalid path parameter: {err}"))
    })
}

#[cfg(test)]
mod tests;
