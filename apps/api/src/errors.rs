#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::validate::MIN_RESUME_CHARS;

/// Everything that can go wrong between receiving a submission and returning
/// an analysis. Each pipeline stage produces exactly one of these kinds and
/// propagates it with `?` — no stage converts, retries, or recovers.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The uploaded file declared a MIME type we have no extractor for.
    #[error("unsupported file type: {0:?}")]
    UnsupportedFormat(String),

    /// The MIME type was recognized but the bytes could not be decoded.
    #[error("could not extract text from {format} document: {reason}")]
    CorruptDocument {
        format: SourceFormat,
        reason: String,
    },

    /// Effective resume text is below the minimum length.
    #[error("resume text too short: {length} characters (minimum {MIN_RESUME_CHARS})")]
    TooShort { length: usize },

    /// The provider could not be reached or the call did not complete
    /// (connection failure, timeout, mid-body network error).
    #[error("model provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider responded, but without a usable completion (non-2xx
    /// status, unrecognizable envelope, or an empty choice list).
    #[error("model provider returned no usable completion: {0}")]
    ProviderRejected(String),

    /// The completion text is not valid JSON after fence stripping.
    /// `raw` carries the stripped text for diagnostics.
    #[error("model output is not valid JSON: {reason}")]
    MalformedResponse { reason: String, raw: String },

    /// The completion parsed as JSON but does not conform to the analysis
    /// result shape (missing fields, wrong types, out-of-range scores).
    #[error("model output does not match the analysis schema: {0}")]
    SchemaMismatch(String),

    /// Unclassified defect — kept separate from the domain kinds above so
    /// observability can tell expected failures from bugs.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Document format named in `CorruptDocument` errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Pdf,
    Docx,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Pdf => write!(f, "PDF"),
            SourceFormat::Docx => write!(f, "DOCX"),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Analysis(err) => match err {
                AnalysisError::UnsupportedFormat(mime) => (
                    StatusCode::BAD_REQUEST,
                    "UNSUPPORTED_FILE_TYPE",
                    format!("Unsupported file type: {mime}. Upload a PDF or DOCX file."),
                ),
                AnalysisError::CorruptDocument { format, .. } => {
                    tracing::warn!("Document extraction failed: {err}");
                    (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "UNREADABLE_DOCUMENT",
                        format!("The uploaded {format} file could not be read."),
                    )
                }
                AnalysisError::TooShort { length } => (
                    StatusCode::BAD_REQUEST,
                    "RESUME_TOO_SHORT",
                    format!("Resume too short: {length} characters (minimum {MIN_RESUME_CHARS})."),
                ),
                AnalysisError::Transport(e) => {
                    tracing::error!("Provider transport failure: {e}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "PROVIDER_UNREACHABLE",
                        "Could not reach the AI provider.".to_string(),
                    )
                }
                AnalysisError::ProviderRejected(msg) => {
                    tracing::error!("Provider rejected the request: {msg}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "PROVIDER_REJECTED",
                        "The AI provider did not return a completion.".to_string(),
                    )
                }
                AnalysisError::MalformedResponse { reason, raw } => {
                    tracing::error!(
                        raw_len = raw.len(),
                        "Model output was not valid JSON: {reason}"
                    );
                    (
                        StatusCode::BAD_GATEWAY,
                        "MALFORMED_MODEL_OUTPUT",
                        "The AI provider returned an unparseable result.".to_string(),
                    )
                }
                AnalysisError::SchemaMismatch(detail) => {
                    tracing::error!("Model output failed schema validation: {detail}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "MODEL_OUTPUT_SCHEMA_MISMATCH",
                        "The AI provider returned an incomplete result.".to_string(),
                    )
                }
                AnalysisError::Internal(e) => {
                    tracing::error!("Internal error: {e:?}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal server error occurred.".to_string(),
                    )
                }
            },
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
