//! HTTP error mapping.
//!
//! Client-input problems become 400, missing records 404, everything else 500.
//! Every error body has the shape `{"message": "..."}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use taskboard_core::{RepoError, TaskValidationError};

pub const TASK_NOT_FOUND: &str = "Task not found";
pub const INVALID_TASK_ID: &str = "Invalid task ID format";

/// `{"message": ...}` body used for errors and confirmations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message) | Self::NotFound(message) | Self::Internal(message) => {
                message
            }
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status().as_u16(), self.message())
    }
}

impl Error for ApiError {}

impl From<TaskValidationError> for ApiError {
    fn from(value: TaskValidationError) -> Self {
        match value {
            TaskValidationError::MalformedId(_) | TaskValidationError::NilId => {
                Self::BadRequest(INVALID_TASK_ID.to_string())
            }
            other => Self::BadRequest(other.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => err.into(),
            RepoError::NotFound(_) => Self::NotFound(TASK_NOT_FOUND.to_string()),
            RepoError::Store(_) | RepoError::InvalidData(_) => Self::Internal(value.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=http_error module=server status=error code={} error={}",
                status.as_u16(),
                self.message()
            );
        } else {
            warn!(
                "event=http_error module=server status=rejected code={} error={}",
                status.as_u16(),
                self.message()
            );
        }
        (status, Json(MessageBody::new(self.message()))).into_response()
    }
}
