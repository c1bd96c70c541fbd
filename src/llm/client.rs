//! Generation service client
//!
//! The pipeline only depends on the `Generate` trait; `GeminiClient` is
//! the production implementation targeting the Gemini REST API.

use crate::config::Config;
use crate::error::AnalysisError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// An opaque generation capability: prompt in, raw text out.
pub trait Generate {
    fn generate(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = std::result::Result<String, AnalysisError>> + Send;
}

/// Client for the Gemini `generateContent` endpoint.
///
/// The request asks for a JSON response mime type, but the reply is still
/// treated as untrusted free text by the analysis engine. The API key is
/// sent in a header, kept out of the URL, and never logged.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &Config, api_key: String) -> std::result::Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.model.timeout_secs))
            .build()
            .map_err(|e| {
                AnalysisError::GenerationFailed(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            endpoint: config.model.endpoint.trim_end_matches('/').to_string(),
            model: config.model.name.clone(),
            api_key,
        })
    }

    fn request_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<Part>,
}

impl Generate for GeminiClient {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, AnalysisError> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        debug!("Sending generation request to model {}", self.model);

        let response = self
            .http
            .post(self.request_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::GenerationFailed(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::GenerationFailed(format!(
                "generation service returned {}",
                status
            )));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            AnalysisError::GenerationFailed(format!("unreadable response body: {}", e))
        })?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                AnalysisError::GenerationFailed("response contained no candidates".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_shape() {
        let config = Config::default();
        let client = GeminiClient::new(&config, "test-key".to_string()).unwrap();
        let url = client.request_url();
        assert!(url.ends_with("/models/gemini-2.5-flash:generateContent"));
        assert!(!url.contains("test-key"));
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"{\"technical_score\": 70}"}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let text = parsed.candidates[0].content.parts[0].text.clone();
        assert!(text.contains("technical_score"));
    }

    #[test]
    fn test_empty_candidates_deserialize() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
