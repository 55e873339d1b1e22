//! Canonical analysis result — the only shape this service ever returns on
//! success. Field names are camelCase on the wire; clients chart them as-is.

use serde::{Deserialize, Serialize};

/// Per-dimension scores, each 0–100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub technical_skills: u32,
    pub experience_impact: u32,
    pub formatting: u32,
    pub ats_optimization: u32,
}

/// Full structured assessment of one resume.
///
/// Either every field is present and in range, or the pipeline reports a
/// failure — a partially populated result is never returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_score: u32,
    pub breakdown: ScoreBreakdown,
    pub keyword_match: u32,
    pub missing_keywords: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improvements: Vec<String>,
    pub improved_resume: String,
}

impl AnalysisResult {
    /// Checks that every score is within 0–100. Negative and non-integer
    /// values already fail deserialization; this catches the rest.
    /// Returns the offending field on failure.
    pub fn check_score_bounds(&self) -> Result<(), String> {
        let scores = [
            ("overallScore", self.overall_score),
            ("breakdown.technicalSkills", self.breakdown.technical_skills),
            ("breakdown.experienceImpact", self.breakdown.experience_impact),
            ("breakdown.formatting", self.breakdown.formatting),
            ("breakdown.atsOptimization", self.breakdown.ats_optimization),
            ("keywordMatch", self.keyword_match),
        ];

        for (field, value) in scores {
            if value > 100 {
                return Err(format!("{field} is {value}, expected 0-100"));
            }
        }
        Ok(())
    }
}
