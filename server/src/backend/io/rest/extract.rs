//! Body and query extractors whose rejections use the API's JSON error shape.
//!
//! Axum's own `Json` and `Query` answer malformed input with a plain-text 422.
//! These wrappers turn those rejections into a 400 `INVALID_INPUT` body.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::bad_request;

#[derive(Debug, Error)]
pub enum RequestRejection {
    #[error("Invalid request body: {}", .0.body_text())]
    Json(#[from] JsonRejection),
    #[error("Invalid query string: {}", .0.body_text())]
    Query(#[from] QueryRejection),
}

impl IntoResponse for RequestRejection {
    fn into_response(self) -> Response {
        bad_request(self.to_string())
    }
}

/// `axum::Json` with a JSON 400 on rejection
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(RequestRejection))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Query` with a JSON 400 on rejection
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(RequestRejection))]
pub struct ApiQuery<T>(pub T);
