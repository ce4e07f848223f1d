//! Gemini text-generation client

use crate::clients::LlmClient;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const GEMINI_API: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct ApiError {
    code: i32,
    message: String,
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, api_key: String, model: String) -> Self {
        Self {
            http,
            api_key,
            model,
        }
    }

    /// Read the API key from `api_key_env` and build a client.
    pub fn from_env(http: reqwest::Client, api_key_env: &str, model: String) -> Result<Self> {
        let api_key = std::env::var(api_key_env)
            .map_err(|_| anyhow!("missing {} environment variable", api_key_env))?;
        Ok(Self::new(http, api_key, model))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            GEMINI_API, self.model, self.api_key
        )
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response: GenerateContentResponse = self
            .http
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .context("generation request failed")?
            .json()
            .await
            .context("failed to decode generation response")?;

        if let Some(err) = response.error {
            return Err(anyhow!("API error {}: {}", err.code, err.message));
        }

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| anyhow!("no valid candidates in response"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_includes_model_and_key() {
        let client = GeminiClient::new(
            reqwest::Client::new(),
            "secret".to_string(),
            "gemini-2.0-flash".to_string(),
        );
        let url = client.endpoint();
        assert!(url.contains("/gemini-2.0-flash:generateContent"));
        assert!(url.ends_with("key=secret"));
    }

    #[test]
    fn test_response_decoding() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "{\"ok\": true}"}]}}
            ]
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.candidates.len(), 1);
        assert_eq!(resp.candidates[0].content.parts[0].text, "{\"ok\": true}");
    }

    #[test]
    fn test_error_payload_decoding() {
        let raw = r#"{"error": {"code": 429, "message": "quota exceeded"}}"#;
        let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let err = resp.error.unwrap();
        assert_eq!(err.code, 429);
        assert!(resp.candidates.is_empty());
    }
}
