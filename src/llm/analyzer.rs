//! Analysis engine: prompt → generation → resilient parse

use crate::error::AnalysisError;
use crate::llm::client::Generate;
use crate::llm::prompts::{PromptParams, PromptTemplates};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured outcome of one analysis.
///
/// Field names mirror the OUTPUT FORMAT block in `llm::prompts`; the two
/// must change together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub technical_score: i64,
    pub experience_score: i64,
    pub soft_skill_score: i64,
    pub overall_average: i64,
    pub missing_keywords: Vec<String>,
    pub candidate_summary: String,
    pub interview_question: String,
}

impl AnalysisResult {
    /// Build a result from an arbitrary JSON value. Total: missing,
    /// malformed, or wrongly-typed fields degrade to their defaults
    /// instead of failing the whole analysis.
    pub fn from_value(data: &Value) -> Self {
        Self {
            technical_score: score_field(data.get("technical_score")),
            experience_score: score_field(data.get("experience_score")),
            soft_skill_score: score_field(data.get("soft_skill_score")),
            overall_average: score_field(data.get("overall_average")),
            missing_keywords: keyword_list(data.get("missing_keywords")),
            candidate_summary: text_field(data.get("candidate_summary")),
            interview_question: text_field(data.get("interview_question")),
        }
    }
}

/// Coerce a score value to an integer in [0, 100].
///
/// Floats truncate toward zero, numeric strings are parsed, anything
/// else falls back to 0.
fn score_field(value: Option<&Value>) -> i64 {
    let raw = match value {
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i
            } else if let Some(f) = n.as_f64() {
                f.trunc() as i64
            } else {
                0
            }
        }
        Some(Value::String(s)) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                i
            } else if let Ok(f) = s.parse::<f64>() {
                f.trunc() as i64
            } else {
                0
            }
        }
        _ => 0,
    };
    raw.clamp(0, 100)
}

/// Non-array values become an empty list; non-string entries are dropped.
fn keyword_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn text_field(value: Option<&Value>) -> String {
    match value.and_then(Value::as_str) {
        Some(s) => s.to_string(),
        None => "N/A".to_string(),
    }
}

/// Orchestrates one analysis: builds the prompt, invokes the generation
/// capability exactly once, and parses the untrusted reply.
pub struct AnalysisEngine<G: Generate> {
    generator: G,
    templates: PromptTemplates,
}

impl<G: Generate> AnalysisEngine<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            templates: PromptTemplates::default(),
        }
    }

    /// Analyze a candidate CV against a job description.
    ///
    /// Performs a single generation call, no retries. Returns either a
    /// fully populated (possibly default-laden) result or a typed error;
    /// field-level anomalies in the reply never abort the analysis.
    pub async fn analyze(
        &self,
        job_desc: &str,
        cv_text: &str,
    ) -> std::result::Result<AnalysisResult, AnalysisError> {
        let params = PromptParams {
            job_content: job_desc.to_string(),
            resume_content: cv_text.to_string(),
        };
        let prompt = self.templates.render_analysis(&params);
        debug!("Rendered analysis prompt ({} chars)", prompt.len());

        let raw = self.generator.generate(&prompt).await?;

        let payload = strip_code_fences(&raw);
        let value: Value = serde_json::from_str(payload).map_err(|e| {
            AnalysisError::GenerationFailed(format!("model returned invalid JSON: {}", e))
        })?;

        if !value.is_object() {
            return Err(AnalysisError::GenerationFailed(
                "model response is not a JSON object".to_string(),
            ));
        }

        Ok(AnalysisResult::from_value(&value))
    }
}

/// Models wrap JSON in markdown fences even when told not to.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct MockGenerator {
        response: std::result::Result<String, String>,
        calls: AtomicUsize,
        seen_prompt: Mutex<Option<String>>,
    }

    impl MockGenerator {
        fn returning(response: &str) -> Self {
            Self {
                response: Ok(response.to_string()),
                calls: AtomicUsize::new(0),
                seen_prompt: Mutex::new(None),
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                response: Err(reason.to_string()),
                calls: AtomicUsize::new(0),
                seen_prompt: Mutex::new(None),
            }
        }
    }

    impl Generate for &MockGenerator {
        fn generate(
            &self,
            prompt: &str,
        ) -> impl std::future::Future<Output = std::result::Result<String, AnalysisError>> + Send
        {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_prompt.lock().unwrap() = Some(prompt.to_string());
            let response = self.response.clone();
            async move { response.map_err(AnalysisError::GenerationFailed) }
        }
    }

    #[test]
    fn test_from_value_total_over_arbitrary_objects() {
        let cases = vec![
            json!({}),
            json!({"technical_score": "not a number"}),
            json!({"technical_score": null, "missing_keywords": "oops"}),
            json!({"technical_score": 250, "experience_score": -40}),
            json!({"unexpected_key": [1, 2, 3], "candidate_summary": 12}),
            json!({"technical_score": {"nested": true}}),
        ];

        for case in cases {
            let result = AnalysisResult::from_value(&case);
            for score in [
                result.technical_score,
                result.experience_score,
                result.soft_skill_score,
                result.overall_average,
            ] {
                assert!((0..=100).contains(&score), "score out of range for {}", case);
            }
        }
    }

    #[test]
    fn test_from_value_defaults() {
        let result = AnalysisResult::from_value(&json!({}));
        assert_eq!(result.technical_score, 0);
        assert_eq!(result.experience_score, 0);
        assert_eq!(result.soft_skill_score, 0);
        assert_eq!(result.overall_average, 0);
        assert!(result.missing_keywords.is_empty());
        assert_eq!(result.candidate_summary, "N/A");
        assert_eq!(result.interview_question, "N/A");
    }

    #[test]
    fn test_score_coercion_rules() {
        assert_eq!(score_field(Some(&json!(55))), 55);
        assert_eq!(score_field(Some(&json!("40"))), 40);
        assert_eq!(score_field(Some(&json!(70.9))), 70);
        assert_eq!(score_field(Some(&json!("70.9"))), 70);
        assert_eq!(score_field(Some(&json!(-3))), 0);
        assert_eq!(score_field(Some(&json!(1000))), 100);
        assert_eq!(score_field(Some(&json!("eleven"))), 0);
        assert_eq!(score_field(None), 0);
    }

    #[tokio::test]
    async fn test_generator_invoked_exactly_once_with_verbatim_inputs() {
        let mock = MockGenerator::returning(r#"{"technical_score": 10}"#);
        let engine = AnalysisEngine::new(&mock);

        let job = "Senior Go engineer, 5+ years, distributed systems";
        let cv = "3 years Python, some Go scripting";
        engine.analyze(job, cv).await.unwrap();

        assert_eq!(mock.calls.load(Ordering::SeqCst), 1);
        let prompt = mock.seen_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains(job));
        assert!(prompt.contains(cv));
    }

    #[tokio::test]
    async fn test_malformed_json_is_generation_failed() {
        let mock = MockGenerator::returning("{not valid json");
        let engine = AnalysisEngine::new(&mock);

        let result = engine.analyze("job", "cv").await;
        assert!(matches!(result, Err(AnalysisError::GenerationFailed(_))));
        assert_eq!(mock.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_object_top_level_is_generation_failed() {
        for payload in ["42", "[1, 2]", "\"a string\"", "null"] {
            let mock = MockGenerator::returning(payload);
            let engine = AnalysisEngine::new(&mock);
            let result = engine.analyze("job", "cv").await;
            assert!(
                matches!(result, Err(AnalysisError::GenerationFailed(_))),
                "payload {} should fail",
                payload
            );
        }
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        let mock = MockGenerator::failing("service unavailable");
        let engine = AnalysisEngine::new(&mock);

        let result = engine.analyze("job", "cv").await;
        assert!(matches!(result, Err(AnalysisError::GenerationFailed(_))));
    }

    #[tokio::test]
    async fn test_scoring_scenario() {
        let response = r#"{
            "technical_score": 55,
            "experience_score": "40",
            "soft_skill_score": 70.9,
            "overall_average": 88,
            "missing_keywords": ["Go", "distributed systems", 5],
            "candidate_summary": "Junior-to-mid profile",
            "interview_question": "Explain goroutines vs threads."
        }"#;
        let mock = MockGenerator::returning(response);
        let engine = AnalysisEngine::new(&mock);

        let result = engine
            .analyze(
                "Senior Go engineer, 5+ years, distributed systems",
                "3 years Python, some Go scripting",
            )
            .await
            .unwrap();

        assert_eq!(result.technical_score, 55);
        assert_eq!(result.experience_score, 40);
        assert_eq!(result.soft_skill_score, 70);
        assert_eq!(result.overall_average, 88);
        assert_eq!(
            result.missing_keywords,
            vec!["Go".to_string(), "distributed systems".to_string()]
        );
        assert_eq!(result.candidate_summary, "Junior-to-mid profile");
        assert_eq!(result.interview_question, "Explain goroutines vs threads.");
    }

    #[tokio::test]
    async fn test_fenced_json_is_accepted() {
        let mock =
            MockGenerator::returning("```json\n{\"technical_score\": 61}\n```");
        let engine = AnalysisEngine::new(&mock);

        let result = engine.analyze("job", "cv").await.unwrap();
        assert_eq!(result.technical_score, 61);
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {} "), "{}");
    }
}
