pub mod image_client;
#[cfg(test)]
pub(crate) mod stub;

use crate::{
    config::GeminiConfig,
    error::{GenerationError, Result},
    models::{ContentPart, GenerateContentRequest, GenerateContentResponse},
};
use async_trait::async_trait;
use serde::Deserialize;

pub use image_client::ImageClient;

/// Anything that can answer a `generateContent` call.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate_content(
        &self,
        model: &str,
        parts: Vec<ContentPart>,
    ) -> Result<GenerateContentResponse>;
}

/// REST client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self, model: &str) -> String {
        let model = model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        };
        format!(
            "{}/v1beta/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model_path
        )
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        parts: Vec<ContentPart>,
    ) -> Result<GenerateContentResponse> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            GenerationError::ConfigError(
                "GOOGLE_AI_API_KEY is not set; cannot call the Gemini API".into(),
            )
        })?;

        let endpoint = self.endpoint(model);
        let payload = GenerateContentRequest::from_parts(parts);

        log::debug!("POST {}", endpoint);

        let response = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(provider_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            GenerationError::ResponseError(format!("invalid generateContent response: {e}"))
        })
    }
}

fn provider_error(status: reqwest::StatusCode, body: &str) -> GenerationError {
    let message = match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(kind) if !kind.is_empty() => format!("{}: {}", kind, envelope.error.message),
            _ => envelope.error.message,
        },
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };

    GenerationError::ProviderError {
        status: status.as_u16(),
        message,
    }
}
