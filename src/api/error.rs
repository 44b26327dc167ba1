//! HTTP error responses.
//!
//! Every error body carries a machine-readable `code` and a human-readable
//! `message`. When a handler echoes the triggering request back (the
//! `requestInfo` block), the payload goes through the codec's redaction
//! rule first so secret material never appears in an error body.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::Value;

use crate::errors::Error;
use crate::secrets::codec;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    request_info: Option<RequestInfo>,
}

/// Echoed request description attached to some error bodies.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestInfo {
    pub method: &'static str,
    pub params: Value,
    pub payload: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_info: Option<RequestInfo>,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: String) -> Self {
        Self { status, code, message, request_info: None }
    }

    pub fn authentication_failed<S: Into<String>>(message: S) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "AuthenticationFailed", message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "InternalError", message.into())
    }

    /// Attach an echo of the triggering request. The payload is redacted
    /// here, unconditionally; callers never pass pre-sanitized data.
    pub fn with_request_info(mut self, method: &'static str, name: &str, payload: &Value) -> Self {
        self.request_info = Some(RequestInfo {
            method,
            params: serde_json::json!({ "name": name }),
            payload: codec::redact(payload),
        });
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = match &err {
            Error::Unauthorized(_) => "InsufficientScopes",
            Error::NotFound(_) => "ResourceNotFound",
            Error::Expired(_) => "ResourceExpired",
            Error::Validation(_) => "InputError",
            _ => "InternalError",
        };

        // Internal faults keep their detail in the logs, not the body.
        let message = match &err {
            Error::Unauthorized(_)
            | Error::NotFound(_)
            | Error::Expired(_)
            | Error::Validation(_) => err.to_string(),
            _ => "Internal server error".to_string(),
        };

        Self::new(status, code, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorBody {
            code: self.code,
            message: self.message,
            request_info: self.request_info,
        };
        (self.status, Json(body)).into_response()
    }
}
