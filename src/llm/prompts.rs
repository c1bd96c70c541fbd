//! Prompt template for the semantic CV analysis

use serde::{Deserialize, Serialize};

/// Prompt template holder
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub analysis: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            analysis: ANALYSIS_TEMPLATE.to_string(),
        }
    }
}

/// Parameters for prompt template substitution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptParams {
    pub job_content: String,
    pub resume_content: String,
}

impl PromptTemplates {
    /// Render the analysis prompt. Pure and deterministic: identical
    /// inputs always produce byte-identical output. Both texts are
    /// embedded verbatim, without escaping or truncation.
    pub fn render_analysis(&self, params: &PromptParams) -> String {
        self.analysis
            .replace("{job}", &params.job_content)
            .replace("{resume}", &params.resume_content)
    }
}

// The OUTPUT FORMAT block below must stay in lockstep with the field set
// of `AnalysisResult` in llm::analyzer.
const ANALYSIS_TEMPLATE: &str = r#"ROLE: Senior Technical Recruiter & AI Engineer.
TASK: Analyze the Candidate CV against the Job Description.

JOB DESCRIPTION:
{job}

CANDIDATE CV:
{resume}

OUTPUT FORMAT (JSON ONLY):
{
    "technical_score": <integer 0-100>,
    "experience_score": <integer 0-100>,
    "soft_skill_score": <integer 0-100>,
    "overall_average": <integer 0-100>,
    "missing_keywords": ["list", "of", "missing", "tech", "keywords"],
    "candidate_summary": "Technical summary of the candidate.",
    "interview_question": "One hard technical interview question."
}

Respond with the JSON object only, without markdown fences or commentary."#;
