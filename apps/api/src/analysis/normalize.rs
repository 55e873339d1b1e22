//! Normalization of raw model output into a validated [`AnalysisResult`].
//!
//! Three stages, in order: strip markdown code fences, parse the remainder
//! as strict JSON, then validate the parsed value against the result schema.
//! Parse failures and schema failures are distinct error kinds so callers
//! can tell "not JSON at all" apart from "JSON with the wrong shape".

use crate::analysis::result::AnalysisResult;
use crate::errors::AnalysisError;

/// Turns one raw completion into a validated result.
pub fn normalize_response(raw: &str) -> Result<AnalysisResult, AnalysisError> {
    let text = strip_json_fences(raw);

    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| AnalysisError::MalformedResponse {
            reason: e.to_string(),
            raw: text.to_string(),
        })?;

    let result: AnalysisResult =
        serde_json::from_value(value).map_err(|e| AnalysisError::SchemaMismatch(e.to_string()))?;

    result
        .check_score_bounds()
        .map_err(AnalysisError::SchemaMismatch)?;

    Ok(result)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
