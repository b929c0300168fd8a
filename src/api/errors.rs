// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of every non-2xx HTTP response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub detail: String,
    pub error_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    /// Uploaded bytes did not decode to an image
    InvalidImage(String),
    InvalidRequest(String),
    MissingField(String),
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let (error_type, detail, reason) = match self {
            ApiError::InvalidImage(reason) => (
                "invalid_image",
                "Invalid image data".to_string(),
                Some(reason.clone()),
            ),
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone(), None),
            ApiError::MissingField(field) => (
                "missing_field",
                format!("Missing multipart field '{}'", field),
                None,
            ),
            // Internal details stay in the logs
            ApiError::InternalError(_) => (
                "internal_error",
                "Hand detection failed".to_string(),
                None,
            ),
        };

        ErrorResponse {
            detail,
            error_type: error_type.to_string(),
            reason,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidImage(_) | ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidImage(msg) => write!(f, "Invalid image: {}", msg),
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::MissingField(field) => write!(f, "Missing field: {}", field),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}
