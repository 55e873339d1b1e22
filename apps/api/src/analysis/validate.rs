use crate::errors::AnalysisError;

/// Minimum resume length, in characters. Anything shorter cannot be
/// meaningfully scored.
pub const MIN_RESUME_CHARS: usize = 20;

/// A resume/job-description pair that passed the length check. Produced
/// only by [`validate`], so holding one means the resume text is long
/// enough to submit.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRequest {
    pub resume_text: String,
    pub job_description: String,
}

/// Checks the resume text is long enough to analyze, pairing it with the
/// job description on success.
///
/// Length is measured in raw characters, whitespace included; the text is
/// not normalized before counting. The job description may be empty.
pub fn validate(
    resume_text: String,
    job_description: String,
) -> Result<EvaluationRequest, AnalysisError> {
    let length = resume_text.chars().count();
    if length < MIN_RESUME_CHARS {
        return Err(AnalysisError::TooShort { length });
    }
    Ok(EvaluationRequest {
        resume_text,
        job_description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate_text(text: &str) -> Result<EvaluationRequest, AnalysisError> {
        validate(text.to_string(), String::new())
    }

    #[test]
    fn test_exactly_twenty_chars_accepted() {
        let text = "a".repeat(MIN_RESUME_CHARS);
        let request = validate_text(&text).unwrap();
        assert_eq!(request.resume_text, text);
    }

    #[test]
    fn test_nineteen_chars_rejected() {
        let text = "a".repeat(MIN_RESUME_CHARS - 1);
        let err = validate_text(&text).unwrap_err();
        assert!(matches!(err, AnalysisError::TooShort { length: 19 }));
    }

    #[test]
    fn test_empty_text_rejected() {
        let err = validate_text("").unwrap_err();
        assert!(matches!(err, AnalysisError::TooShort { length: 0 }));
    }

    #[test]
    fn test_whitespace_counts_toward_length() {
        // Raw character count, deliberately not trimmed.
        let text = format!("{:<width$}", "short", width = MIN_RESUME_CHARS);
        assert!(validate_text(&text).is_ok());
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        // 20 two-byte characters.
        let text = "é".repeat(MIN_RESUME_CHARS);
        assert!(validate_text(&text).is_ok());
    }

    #[test]
    fn test_job_description_carried_through() {
        let request = validate(
            "a".repeat(MIN_RESUME_CHARS),
            "Senior Rust role".to_string(),
        )
        .unwrap();
        assert_eq!(request.job_description, "Senior Rust role");
    }
}
