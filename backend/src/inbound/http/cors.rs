//! Cross-origin policy for browser clients.
//!
//! With no configured origins (or a `*` entry) every origin is accepted and
//! echoed back with credentials allowed. Otherwise only the listed origins
//! pass; methods and headers are unrestricted in both modes.

use actix_cors::Cors;

const PREFLIGHT_MAX_AGE_SECS: usize = 3600;

/// Build the CORS middleware for `allowed_origins`.
#[must_use]
pub fn cors_layer(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() || allowed_origins.iter().any(|origin| origin == "*") {
        return Cors::permissive();
    }

    allowed_origins.iter().fold(
        Cors::default()
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(PREFLIGHT_MAX_AGE_SECS),
        |cors, origin| cors.allowed_origin(origin),
    )
}
