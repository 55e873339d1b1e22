//! Axum route handlers for the analysis API.

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::info;

use crate::analysis::pipeline::{analyze, Submission, UploadedFile};
use crate::analysis::result::AnalysisResult;
use crate::errors::AppError;
use crate::state::AppState;

// Multipart field names, matching what the web client submits.
const TEXT_FIELD: &str = "resumeText";
const JD_FIELD: &str = "jobDescription";
const FILE_FIELD: &str = "file";

/// POST /analyze
///
/// Accepts multipart form data with `resumeText`, `jobDescription` and
/// `file` fields (each optional) and returns the structured analysis.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let submission = read_submission(&mut multipart).await?;

    info!(
        text_len = submission.resume_text.len(),
        has_file = submission.file.is_some(),
        jd_len = submission.job_description.len(),
        "analysis requested"
    );

    let result = analyze(submission, state.llm.as_ref()).await?;
    Ok(Json(result))
}

/// Collects the known multipart fields into a submission. Unknown fields
/// are skipped without error.
async fn read_submission(multipart: &mut Multipart) -> Result<Submission, AppError> {
    let mut submission = Submission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        // Field metadata must be captured before the body is consumed.
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            TEXT_FIELD => {
                submission.resume_text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("unreadable {TEXT_FIELD} field: {e}"))
                })?;
            }
            JD_FIELD => {
                submission.job_description = field.text().await.map_err(|e| {
                    AppError::Validation(format!("unreadable {JD_FIELD} field: {e}"))
                })?;
            }
            FILE_FIELD => {
                let content_type = field.content_type().map(str::to_string).unwrap_or_default();
                let file_name = field.file_name().map(str::to_string).unwrap_or_default();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("unreadable {FILE_FIELD} field: {e}"))
                })?;

                // Browsers send a zero-length part with an empty filename
                // when no file was chosen.
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }

                submission.file = Some(UploadedFile {
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    Ok(submission)
}
