use serde::{Deserialize, Serialize};

/// Body of `POST /generate-text`.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateTextRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Successful generation, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub text: String,
    /// Original filename of the upload (audio only).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source_file: Option<String>,
    /// Declared content type of the upload (audio only).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mime_type: Option<String>,
}

impl GenerationResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_file: None,
            mime_type: None,
        }
    }

    pub fn with_source(mut self, source_file: String, mime_type: String) -> Self {
        self.source_file = Some(source_file);
        self.mime_type = Some(mime_type);
        self
    }
}
