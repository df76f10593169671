//! Mock provider for testing.

use super::{ContentGenerator, ContentPart, GenerationPayload, ModelResponse, ProviderError};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;

/// Mock provider that records every payload it receives.
///
/// Replies with a `candidates` response echoing the first text part, or fails
/// with a fixed message when built with [`MockProvider::failing`].
pub struct MockProvider {
    failure: Option<String>,
    calls: Mutex<Vec<GenerationPayload>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Payloads received so far, oldest first.
    pub fn calls(&self) -> Vec<GenerationPayload> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentGenerator for MockProvider {
    async fn generate_content(
        &self,
        payload: GenerationPayload,
    ) -> Result<ModelResponse, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(payload.clone());
        }

        if let Some(message) = &self.failure {
            return Err(ProviderError::Api(message.clone()));
        }

        let prompt = match &payload {
            GenerationPayload::Prompt(prompt) => prompt.clone(),
            GenerationPayload::Parts(parts) => parts
                .iter()
                .find_map(|part| match part {
                    ContentPart::Text { text } => Some(text.clone()),
                    ContentPart::InlineData { .. } => None,
                })
                .unwrap_or_default(),
        };

        Ok(json!({
            "candidates": [
                { "content": { "parts": [ { "text": format!("Mock response for: {}", prompt) } ] } }
            ]
        }))
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}
