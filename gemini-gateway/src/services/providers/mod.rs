//! Generative model abstractions and implementations.
//!
//! Handlers only see the [`ContentGenerator`] trait, so the Gemini backend can be
//! swapped for the recording mock in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Raw model response. Its shape is owned by the upstream API and is only
/// ever inspected by the response extractor.
pub type ModelResponse = serde_json::Value;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("{0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// One element of a request's `parts` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ContentPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64, standard alphabet with padding
    pub data: String,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        ContentPart::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }
}

/// What a handler asks the model to generate from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationPayload {
    /// A bare prompt.
    Prompt(String),
    /// An ordered part list, wrapped as a single content entry.
    Parts(Vec<ContentPart>),
}

impl GenerationPayload {
    /// Build the `generateContent` request body.
    ///
    /// A bare prompt becomes a single text part, which is how the API expects
    /// plain strings to be sent.
    pub fn to_request_body(&self) -> GenerateContentRequest {
        let parts = match self {
            GenerationPayload::Prompt(prompt) => vec![ContentPart::text(prompt.clone())],
            GenerationPayload::Parts(parts) => parts.clone(),
        };

        GenerateContentRequest {
            contents: vec![Content { parts }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<ContentPart>,
}

/// Trait for content generation backends (e.g., Gemini).
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Submit a payload and return the model's raw response.
    async fn generate_content(
        &self,
        payload: GenerationPayload,
    ) -> Result<ModelResponse, ProviderError>;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;
}
