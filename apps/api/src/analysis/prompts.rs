// Prompt constants for the resume analysis call.
// Templates use `{placeholder}` markers filled with str::replace, so the
// literal JSON braces in the schema block pass through untouched.

use crate::analysis::validate::EvaluationRequest;

/// Analysis prompt template. Replace `{resume_text}` and `{job_description}`
/// before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an ATS expert recruiter.

Return ONLY valid JSON in this format:

{
  "overallScore": number,
  "breakdown": {
    "technicalSkills": number,
    "experienceImpact": number,
    "formatting": number,
    "atsOptimization": number
  },
  "keywordMatch": number,
  "missingKeywords": [string],
  "strengths": [string],
  "weaknesses": [string],
  "improvements": [string],
  "improvedResume": string
}

Resume:
{resume_text}

Job Description:
{job_description}"#;

/// Fills the analysis template. Same request always yields the same string.
/// Each marker is spliced exactly once, in template order, so a
/// marker-shaped token inside the resume or job description is embedded
/// verbatim rather than substituted again.
pub fn build_analysis_prompt(request: &EvaluationRequest) -> String {
    let mut prompt = String::with_capacity(
        ANALYSIS_PROMPT_TEMPLATE.len()
            + request.resume_text.len()
            + request.job_description.len(),
    );

    let mut rest = ANALYSIS_PROMPT_TEMPLATE;
    for (marker, value) in [
        ("{resume_text}", request.resume_text.as_str()),
        ("{job_description}", request.job_description.as_str()),
    ] {
        if let Some((head, tail)) = rest.split_once(marker) {
            prompt.push_str(head);
            prompt.push_str(value);
            rest = tail;
        }
    }
    prompt.push_str(rest);
    prompt
}
