//! Extractor error handlers
//!
//! Malformed JSON bodies, query strings and path segments are answered with
//! the same `{"error": {...}}` body as [`AppError`] instead of actix's
//! plain-text defaults.

use actix_web::{error, web, HttpRequest};

use crate::core::AppError;

fn rejected(kind: &str, err: impl std::fmt::Display, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(path = %req.path(), error = %err, "Rejected malformed {}", kind);
    AppError::validation(format!("Invalid {}: {}", kind, err)).into()
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err: error::JsonPayloadError, req| rejected("request body", err, req))
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err: error::QueryPayloadError, req| rejected("query string", err, req))
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err: error::PathError, req| rejected("path parameter", err, req))
}
