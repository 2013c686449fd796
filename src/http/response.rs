//! Response handling.
//!
//! # Responsibilities
//! - Map every request outcome to one status code
//! - Emit the fixed plain-text body that mirrors the status
//!
//! # Design Decisions
//! - No structured error payloads; the status code is the contract
//! - Bodies are static strings so a reply never allocates

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// The complete set of replies the relay can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusReply {
    Ok,
    BadRequest,
    Forbidden,
    MethodNotAllowed,
    NotAcceptable,
    InternalServerError,
}

impl StatusReply {
    pub fn status(self) -> StatusCode {
        match self {
            StatusReply::Ok => StatusCode::OK,
            StatusReply::BadRequest => StatusCode::BAD_REQUEST,
            StatusReply::Forbidden => StatusCode::FORBIDDEN,
            StatusReply::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            StatusReply::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            StatusReply::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            StatusReply::Ok => "200 - Ok",
            StatusReply::BadRequest => "400 - Bad request",
            StatusReply::Forbidden => "403 - Forbidden",
            StatusReply::MethodNotAllowed => "405 - Method not allowed",
            StatusReply::NotAcceptable => "406 - Not acceptable",
            StatusReply::InternalServerError => "500 - Internal server error",
        }
    }
}

impl IntoResponse for StatusReply {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.text(),
        )
            .into_response()
    }
}
