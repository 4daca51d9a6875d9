//! Gemini backend for deep research (API key-based Generative Language API).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{ResearchBackend, ResearchError};

const GENERATIVE_LANGUAGE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiBackend {
    client: Client,
    api_key: String,
}

impl GeminiBackend {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(300))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    async fn generate_content(
        &self,
        model: &str,
        prompt: &str,
        with_search: bool,
    ) -> Result<String, ResearchError> {
        let url = format!("{GENERATIVE_LANGUAGE_URL}/{model}:generateContent");

        let mut body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        if with_search {
            body["tools"] = serde_json::json!([{ "google_search": {} }]);
        }

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ResearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let json: serde_json::Value = response.json().await?;

        json["candidates"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c["content"]["parts"].as_array())
            .and_then(|parts| parts.first())
            .and_then(|p| p["text"].as_str())
            .map(str::to_owned)
            .ok_or(ResearchError::EmptyContent)
    }
}

#[async_trait]
impl ResearchBackend for GeminiBackend {
    async fn generate_with_search(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<String, ResearchError> {
        self.generate_content(model, prompt, true).await
    }

    async fn generate_plain(&self, model: &str, prompt: &str) -> Result<String, ResearchError> {
        self.generate_content(model, prompt, false).await
    }
}
