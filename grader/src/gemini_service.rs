use crate::credential::Credential;
use crate::model_client::{ModelClient, PromptPart};
use crate::models::*;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
    pub temperature: Option<f32>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            temperature: None,
        }
    }
}

impl GeminiConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads `GEMINI_MODEL`, `GEMINI_API_BASE`, `GEMINI_TIMEOUT_SECS` and
    /// `GEMINI_TEMPERATURE` through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(model) = lookup("GEMINI_MODEL").filter(|v| !v.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        if let Some(base) = lookup("GEMINI_API_BASE").filter(|v| !v.trim().is_empty()) {
            config.api_base = base.trim().trim_end_matches('/').to_string();
        }
        if let Some(secs) = lookup("GEMINI_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("GEMINI_TIMEOUT_SECS must be a whole number of seconds, got {secs:?}"))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(temperature) = lookup("GEMINI_TEMPERATURE") {
            let temperature: f32 = temperature
                .trim()
                .parse()
                .with_context(|| format!("GEMINI_TEMPERATURE must be a number, got {temperature:?}"))?;
            config.temperature = Some(temperature);
        }

        Ok(config)
    }
}

/// `ModelClient` backed by the Gemini `generateContent` REST endpoint.
pub struct GeminiService {
    client: Client,
    config: GeminiConfig,
}

impl GeminiService {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.model
        )
    }

    fn build_request(&self, parts: Vec<PromptPart>) -> GeminiRequest {
        let parts = parts
            .into_iter()
            .map(|part| match part {
                PromptPart::Text(text) => GeminiPart::Text { text },
                PromptPart::Image { mime_type, data } => GeminiPart::InlineData {
                    inline_data: GeminiInlineData { mime_type, data },
                },
            })
            .collect();

        GeminiRequest {
            contents: vec![GeminiContent { parts }],
            generation_config: self
                .config
                .temperature
                .map(|temperature| GeminiGenerationConfig { temperature }),
        }
    }
}

#[async_trait]
impl ModelClient for GeminiService {
    async fn generate(&self, parts: Vec<PromptPart>, credential: &Credential) -> Result<String> {
        let request = self.build_request(parts);

        // Keep the key out of the URL; reqwest errors quote it.
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", credential.expose())
            .json(&request)
            .send()
            .await
            .context("Gemini request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Gemini API error ({}): {}", status, error_text));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .context("Gemini returned an unreadable response")?;

        response_text(gemini_response)
    }
}

/// Concatenates the text parts of the first candidate.
fn response_text(response: GeminiResponse) -> Result<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("No response generated"))?;

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(anyhow::anyhow!(
            "No response generated (finish reason: {})",
            reason
        ));
    }

    Ok(text)
}
