use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, warn};

use crate::services::{DataSourceError, UpstreamError};

/// Application-level error type
#[derive(Debug)]
pub enum AppError {
    /// Requested record does not exist
    NotFound(String),
    /// Malformed request parameter
    Validation(String),
    /// Upstream API answered with a non-success status
    Upstream { status: u16, message: String },
    /// Internal server error
    Internal(String),
}

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    fn message(&self) -> &str {
        match self {
            Self::NotFound(msg) | Self::Validation(msg) | Self::Internal(msg) => msg,
            Self::Upstream { message, .. } => message,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Upstream { status, message } => write!(f, "Upstream error ({status}): {message}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.message().to_string(),
        })
    }
}

impl From<DataSourceError> for AppError {
    fn from(err: DataSourceError) -> Self {
        match err {
            DataSourceError::Upstream(UpstreamError::Status(status)) => {
                warn!(status, "Upstream request failed");
                Self::Upstream {
                    status,
                    message: "Failed to fetch data".to_string(),
                }
            }
            DataSourceError::Upstream(other) => {
                error!(error = %other, "Upstream call could not be completed");
                Self::Internal("Internal server error".to_string())
            }
        }
    }
}
