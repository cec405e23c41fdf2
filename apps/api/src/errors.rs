use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::ExportError;
use crate::interview::flow::FlowError;
use crate::interview::resume::ResumeError;
use crate::interview::validation::FieldError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// `fields` is empty when the failure is not tied to a form field.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        fields: Vec<FieldError>,
    },

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn invalid_fields(fields: Vec<FieldError>) -> Self {
        let message = fields
            .iter()
            .map(|f| f.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        AppError::Validation { message, fields }
    }
}

impl From<FlowError> for AppError {
    fn from(e: FlowError) -> Self {
        match e {
            FlowError::MissingFields(ref missing) => {
                let fields = missing
                    .iter()
                    .map(|field| FieldError::new(*field, "This field is required"))
                    .collect();
                AppError::Validation {
                    message: e.to_string(),
                    fields,
                }
            }
            FlowError::EmptySkillSet => AppError::Validation {
                message: e.to_string(),
                fields: vec![FieldError::new("skills", e.to_string())],
            },
            FlowError::NoQuestions => AppError::UnprocessableEntity(e.to_string()),
            FlowError::IndexOutOfRange { .. } => AppError::Internal(anyhow::anyhow!(e)),
            FlowError::QuestionsAlreadyGenerated
            | FlowError::QuestionsNotReady
            | FlowError::InvalidEvent { .. } => AppError::InvalidTransition(e.to_string()),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::NothingToExport => AppError::UnprocessableEntity(e.to_string()),
            ExportError::Encode(_) | ExportError::Write(_) => AppError::Export(e.to_string()),
        }
    }
}

impl From<ResumeError> for AppError {
    fn from(e: ResumeError) -> Self {
        AppError::Validation {
            message: e.to_string(),
            fields: vec![FieldError::new("resume", e.to_string())],
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, fields) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, Vec::new()),
            AppError::Validation { message, fields } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message, fields)
            }
            AppError::InvalidTransition(msg) => {
                (StatusCode::CONFLICT, "INVALID_TRANSITION", msg, Vec::new())
            }
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg,
                Vec::new(),
            ),
            AppError::Export(msg) => {
                tracing::error!("Export error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_ERROR",
                    "The summary document could not be generated".to_string(),
                    Vec::new(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    Vec::new(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if !fields.is_empty() {
            error["fields"] = json!(fields);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
