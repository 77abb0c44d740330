//! Error handling for the KisanSahayak advisory backend
//!
//! `AdvisoryError` is the workflow's own taxonomy. `AppError` is what HTTP
//! handlers return; it renders consistent error bodies in English and Hindi.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failures inside the advisory workflow and its collaborators
#[derive(Error, Debug)]
pub enum AdvisoryError {
    /// Transport failure, timeout or non-success status from the AI service
    #[error("Remote service unavailable: {0}")]
    RemoteUnavailable(String),

    /// Empty payload or payload that does not match the response schema
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A fallback was needed but nothing has been saved yet
    #[error("No cached data available for {0}")]
    NoCacheAvailable(&'static str),

    /// The operation requires connectivity
    #[error("Device is offline")]
    Offline,

    #[error("Cache storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AdvisoryError {
    /// Short reason shown to the farmer when saved data replaces a fresh fetch
    pub fn fallback_reason(&self) -> &'static str {
        match self {
            AdvisoryError::RemoteUnavailable(_) => "Server Error",
            AdvisoryError::MalformedResponse(_) => "Invalid Response",
            AdvisoryError::Offline => "Offline",
            _ => "Error",
        }
    }
}

/// Result type alias for the workflow
pub type WorkflowResult<T> = Result<T, AdvisoryError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Device is offline")]
    Offline,

    #[error("Advisory error: {0}")]
    Advisory(AdvisoryError),
}

impl From<AdvisoryError> for AppError {
    fn from(err: AdvisoryError) -> Self {
        match err {
            AdvisoryError::Offline => AppError::Offline,
            other => AppError::Advisory(other),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|k| k.to_string())
            .collect();
        fields.sort();
        AppError::Validation {
            field: fields.join(","),
            message: errors.to_string(),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_hi: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_hi: format!("अमान्य जानकारी: {}", field),
                    field: Some(field.clone()),
                },
            ),
            AppError::Offline => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "OFFLINE".to_string(),
                    message_en: "You are offline. Showing saved data.".to_string(),
                    message_hi: "आप ऑफ़लाइन हैं। सहेजा गया डेटा दिखाया जा रहा है।"
                        .to_string(),
                    field: None,
                },
            ),
            AppError::Advisory(AdvisoryError::NoCacheAvailable(what)) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NO_SAVED_DATA".to_string(),
                    message_en: format!("No saved {} yet. Connect once to download.", what),
                    message_hi: "अभी कोई सहेजा गया डेटा नहीं है।".to_string(),
                    field: None,
                },
            ),
            AppError::Advisory(err) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "ADVISORY_ERROR".to_string(),
                    message_en: err.to_string(),
                    message_hi: "सलाह सेवा में त्रुटि".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
