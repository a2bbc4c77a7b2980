//! # REST API Interface Layer
//!
//! Axum handlers for the CRM. Each `*_apis` module exposes a `router()` that
//! the backend merges into the application router.
//!
//! Handlers stay thin: parse the request, call one service, map the result
//! into a shared DTO. Failures become a JSON [`ErrorResponse`] whose status is
//! picked by downcasting the service error:
//!
//! | error                                | status | code               |
//! |--------------------------------------|--------|--------------------|
//! | `DomainError::Validation`            | 400    | `INVALID_INPUT`    |
//! | `LeadValidationError`                | 400    | `INVALID_INPUT`    |
//! | `SessionDateError::InvalidWeekday`   | 400    | `INVALID_WEEKDAY`  |
//! | `SessionDateError::OutOfRange`       | 400    | `INVALID_DATE`     |
//! | `DomainError::NotFound`              | 404    | `NOT_FOUND`        |
//! | `DomainError::Conflict`              | 409    | `VERSION_CONFLICT` |
//! | anything else                        | 500    | `INTERNAL_ERROR`   |

pub mod accounting_apis;
pub mod extract;
pub mod health_apis;
pub mod lead_apis;
pub mod mappers;
pub mod report_apis;
pub mod session_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use tracing::{error, warn};

use crate::backend::domain::errors::DomainError;
use crate::backend::domain::models::LeadValidationError;
use crate::backend::domain::session_dates::SessionDateError;

fn classify(err: &anyhow::Error) -> (StatusCode, &'static str) {
    if let Some(domain) = err.downcast_ref::<DomainError>() {
        return match domain {
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            DomainError::Conflict { .. } => (StatusCode::CONFLICT, "VERSION_CONFLICT"),
        };
    }
    if err.downcast_ref::<LeadValidationError>().is_some() {
        return (StatusCode::BAD_REQUEST, "INVALID_INPUT");
    }
    match err.downcast_ref::<SessionDateError>() {
        Some(SessionDateError::InvalidWeekday(_)) => (StatusCode::BAD_REQUEST, "INVALID_WEEKDAY"),
        Some(SessionDateError::OutOfRange) => (StatusCode::BAD_REQUEST, "INVALID_DATE"),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

/// Turn a service error into a JSON error response.
///
/// Internal errors are logged in full but answered with a generic message.
pub fn error_response(context: &str, err: anyhow::Error) -> Response {
    let (status, code) = classify(&err);

    let message = if status.is_server_error() {
        error!("{}: {:#}", context, err);
        format!("{}: internal error", context)
    } else {
        warn!("{}: {}", context, err);
        err.to_string()
    };

    (status, Json(ErrorResponse { error: message, code: code.to_string() })).into_response()
}

/// 400 for malformed query parameters, in the same shape as every other error
pub fn bad_request(message: impl Into<String>) -> Response {
    let message = message.into();
    warn!("Rejected request: {}", message);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message,
            code: "INVALID_INPUT".to_string(),
        }),
    )
        .into_response()
}
