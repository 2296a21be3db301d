//! Gemini `generateContent` client.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::TextGenerator;
use crate::config::{GenerativeConfig, API_KEY_ENV};
use crate::http::{self, RequestOptions};
use crate::retry::ProviderError;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Client for one Gemini model. Built once from config; the key is fixed for its lifetime.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    endpoint: String,
    model: String,
    api_key: String,
    request: RequestOptions,
}

impl GeminiClient {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
            request: RequestOptions::default(),
        }
    }

    /// Fails when no API key is configured or set in the environment.
    pub fn from_config(cfg: &GenerativeConfig) -> Result<Self> {
        let api_key = cfg.resolve_api_key().ok_or_else(|| {
            anyhow::anyhow!(
                "no API key: set {} or `api_key` under [generative] in config.toml",
                API_KEY_ENV
            )
        })?;
        let mut client = Self::new(&cfg.endpoint, &cfg.model, api_key);
        client.request.timeout = cfg.timeout();
        Ok(client)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = serde_json::to_vec(&GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        })
        .map_err(|e| ProviderError::Decode(e.to_string()))?;

        let mut opts = self.request.clone();
        opts.headers
            .push(("x-goog-api-key".to_string(), self.api_key.clone()));

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "generateContent");
        let response = http::post_json(&self.url(), &body, &opts)?.error_for_status()?;
        parse_response(&response.body)
    }
}

/// Extract the answer text from a `generateContent` response body:
/// the text parts of the first candidate, concatenated.
pub fn parse_response(body: &str) -> Result<String, ProviderError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(ProviderError::Message(format!("prompt rejected: {}", reason)));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.is_empty() {
        let reason = candidate
            .finish_reason
            .unwrap_or_else(|| "UNKNOWN".to_string());
        return Err(ProviderError::Message(format!(
            "empty response (finish reason {})",
            reason
        )));
    }
    Ok(text)
}
