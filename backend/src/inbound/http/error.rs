//! HTTP mapping for domain errors.
//!
//! Handlers return [`ApiResult`]; actix renders the `Err` side through the
//! [`ResponseError`] impl below. Extractor rejections (bad JSON, path or
//! query) are funnelled through [`extractor_rejection`] so every 400 uses the
//! same envelope.

use std::fmt::Display;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Internal failures keep their trace id but lose message and details.
fn redact_if_internal(error: &Error) -> Error {
    if status_for(error.code()) != StatusCode::INTERNAL_SERVER_ERROR {
        return error.clone();
    }
    error!(message = error.message(), trace_id = ?error.trace_id(), "internal error");
    let redacted = Error::new(error.code(), "Internal server error");
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id.to_owned()),
        None => redacted,
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
        builder.json(redact_if_internal(self))
    }
}

/// Build the 400 returned when an actix extractor rejects the request.
///
/// `source` names what failed to parse (`json`, `path`, `query`) and becomes
/// the `details.code` suffix.
pub(crate) fn extractor_rejection(source: &'static str, err: impl Display) -> actix_web::Error {
    debug!(source, error = %err, "request rejected before reaching handler");
    Error::invalid_request(format!("invalid {source}: {err}"))
        .with_details(json!({ "code": format!("invalid_{source}") }))
        .into()
}
