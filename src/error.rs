use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::db::StoreError;

/// A single rejected request field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// JSON body of every error response. `details` is present only for
/// validation failures.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "COURSE_NOT_FOUND")]
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

/// Every failure a handler can surface. Each variant maps to one status
/// and one machine-readable code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    BadRequest(String),
    #[error("Professor not found")]
    ProfessorNotFound,
    #[error("Course not found")]
    CourseNotFound,
    #[error("Professor already exists")]
    ProfessorAlreadyExists,
    #[error("Course already exists")]
    CourseAlreadyExists,
    #[error("{0}")]
    InvalidCourseUpdate(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Authentication required")]
    Unauthorized,
    #[error("Access denied")]
    Forbidden,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::InvalidCourseUpdate(_) => StatusCode::BAD_REQUEST,
            AppError::ProfessorNotFound | AppError::CourseNotFound => StatusCode::NOT_FOUND,
            AppError::ProfessorAlreadyExists | AppError::CourseAlreadyExists => {
                StatusCode::CONFLICT
            }
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::ProfessorNotFound => "PROFESSOR_NOT_FOUND",
            AppError::CourseNotFound => "COURSE_NOT_FOUND",
            AppError::ProfessorAlreadyExists => "PROFESSOR_ALREADY_EXISTS",
            AppError::CourseAlreadyExists => "COURSE_ALREADY_EXISTS",
            AppError::InvalidCourseUpdate(_) => "INVALID_COURSE_UPDATE",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = match &self {
            AppError::Internal(err) => {
                // raw fault text stays in the logs
                error!(error = ?err, "unexpected error");
                "Unexpected error".to_string()
            }
            other => other.to_string(),
        };
        let details = match self {
            AppError::Validation(details) => details,
            _ => Vec::new(),
        };
        let body = ErrorBody {
            error: code.to_string(),
            message,
            details,
        };
        (status, Json(body)).into_response()
    }
}
