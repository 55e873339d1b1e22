//! The end-to-end analysis pipeline: one submission in, one validated
//! result out. Stages run in a fixed order (extract, validate, build
//! prompt, call the model, normalize) and the first failing stage stops the
//! run; no partial results, no retries.

use bytes::Bytes;
use tracing::debug;

use crate::analysis::extract::{extract, InputDocument};
use crate::analysis::normalize::normalize_response;
use crate::analysis::prompts::build_analysis_prompt;
use crate::analysis::result::AnalysisResult;
use crate::analysis::validate::validate;
use crate::errors::AnalysisError;
use crate::llm_client::CompletionBackend;

/// An uploaded resume file with its declared content type.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub content_type: String,
    pub bytes: Bytes,
}

/// One analysis request as received from the host surface.
///
/// Pasted text and an uploaded file may both be present; non-empty pasted
/// text wins and the file is never opened.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub resume_text: String,
    pub file: Option<UploadedFile>,
    pub job_description: String,
}

impl Submission {
    /// Applies the precedence rule and hands the winning input to the
    /// extractor. With neither text nor file, the empty text document falls
    /// through to the length check downstream.
    fn into_document(self) -> (InputDocument, String) {
        let Submission {
            resume_text,
            file,
            job_description,
        } = self;

        let doc = if !resume_text.is_empty() {
            InputDocument::Text(resume_text)
        } else if let Some(file) = file {
            InputDocument::File {
                content_type: file.content_type,
                bytes: file.bytes,
            }
        } else {
            InputDocument::Text(String::new())
        };

        (doc, job_description)
    }
}

/// Runs one submission through the full pipeline.
pub async fn analyze(
    submission: Submission,
    backend: &dyn CompletionBackend,
) -> Result<AnalysisResult, AnalysisError> {
    let (doc, job_description) = submission.into_document();

    let resume_text = extract(doc)?;
    let request = validate(resume_text, job_description)?;
    debug!(len = request.resume_text.len(), "resume text resolved");

    let prompt = build_analysis_prompt(&request);
    let raw = backend.complete(&prompt).await?;
    debug!(len = raw.len(), "completion received");

    normalize_response(&raw)
}
