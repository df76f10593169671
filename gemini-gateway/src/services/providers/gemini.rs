//! Gemini provider implementation.
//!
//! Posts `generateContent` requests to Google's Gemini REST API and hands back
//! the decoded JSON untouched. There are no retries and no local timeout; any
//! upstream failure surfaces as a [`ProviderError`].

use super::{ContentGenerator, GenerationPayload, ModelResponse, ProviderError};
use crate::config::GeminiSettings;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini content provider.
pub struct GeminiProvider {
    api_key: Secret<String>,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(settings: &GeminiSettings) -> Result<Self, ProviderError> {
        if settings.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self {
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Build the API URL for the configured model and the given method.
    fn api_url(&self, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, self.model, method)
    }
}

#[async_trait]
impl ContentGenerator for GeminiProvider {
    async fn generate_content(
        &self,
        payload: GenerationPayload,
    ) -> Result<ModelResponse, ProviderError> {
        let request = payload.to_request_body();
        let url = self.api_url("generateContent");

        tracing::debug!(
            model = %self.model,
            part_count = request.contents.iter().map(|c| c.parts.len()).sum::<usize>(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!(
                "Gemini API error {}: {}",
                status, error_text
            )));
        }

        response
            .json::<ModelResponse>()
            .await
            .map_err(|e| ProviderError::Api(format!("Failed to parse response: {}", e)))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(api_key: &str, base_url: &str) -> GeminiSettings {
        GeminiSettings {
            api_key: Secret::new(api_key.to_string()),
            model: "gemini-2.5-flash".to_string(),
            base_url: base_url.to_string(),
        }
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let result = GeminiProvider::new(&settings("", "http://localhost"));
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }

    #[test]
    fn api_url_targets_model_method() {
        let provider = GeminiProvider::new(&settings("key", "http://localhost:9999/v1beta/"))
            .expect("provider");
        assert_eq!(
            provider.api_url("generateContent"),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
