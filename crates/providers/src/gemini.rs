use async_trait::async_trait;
use bubble_core::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::IntelligenceClient;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    api_base: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<&str>, api_base: Option<&str>, model: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key
                .map(|k| k.trim())
                .filter(|k| !k.is_empty())
                .map(|k| k.to_string()),
            api_base: api_base
                .unwrap_or(GEMINI_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            model: model.to_string(),
        }
    }

    /// Normalize model name: strip "gemini/" prefix if present.
    fn normalize_model(model: &str) -> &str {
        model.strip_prefix("gemini/").unwrap_or(model)
    }

    /// A single user turn carrying the instruction, with JSON output
    /// constrained to `schema`.
    fn build_request(instruction: &str, schema: &Value) -> Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": instruction}],
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            }
        })
    }

    /// Concatenated text parts of the first candidate, `None` if there are none.
    fn extract_text(resp: GeminiResponse) -> Option<String> {
        let content = resp.candidates?.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[async_trait]
impl IntelligenceClient for GeminiClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate_structured(&self, instruction: &str, schema: &Value) -> Result<Option<String>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Provider("Gemini API key is not configured".to_string()))?;

        let model = Self::normalize_model(&self.model);
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, model, api_key
        );
        let request = Self::build_request(instruction, schema);

        info!(
            model = %model,
            instruction_len = instruction.len(),
            "Calling Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        let raw_body = response
            .text()
            .await
            .map_err(|e| Error::Provider(format!("Failed to read Gemini response: {}", e)))?;

        if !status.is_success() {
            error!(status = %status, body = %raw_body, "Gemini API error");
            return Err(Error::Provider(format!(
                "Gemini API error {}: {}",
                status,
                truncate(&raw_body, 500)
            )));
        }

        debug!(body_len = raw_body.len(), "Gemini raw response");

        if raw_body.trim().is_empty() {
            return Ok(None);
        }

        let resp: GeminiResponse = serde_json::from_str(&raw_body).map_err(|e| {
            Error::Provider(format!(
                "Failed to parse Gemini response: {}. Body: {}",
                e,
                truncate(&raw_body, 500)
            ))
        })?;

        Ok(Self::extract_text(resp))
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}
