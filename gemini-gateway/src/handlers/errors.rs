use crate::services::UploadError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// The four generation routes and the wording each uses towards clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Text,
    Image,
    Document,
    Audio,
}

impl Endpoint {
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Text => "generate-text",
            Endpoint::Image => "generate-from-image",
            Endpoint::Document => "generate-from-document",
            Endpoint::Audio => "generate-from-audio",
        }
    }

    /// Multipart field carrying the attachment. `None` for the JSON-only route.
    pub fn file_field(self) -> Option<&'static str> {
        match self {
            Endpoint::Text => None,
            Endpoint::Image => Some("image"),
            Endpoint::Document => Some("document"),
            Endpoint::Audio => Some("audio"),
        }
    }

    /// Prompt sent when the caller supplies none.
    pub fn default_prompt(self) -> Option<&'static str> {
        match self {
            Endpoint::Text | Endpoint::Image => None,
            Endpoint::Document => Some("Ringkas dokumen berikut:"),
            Endpoint::Audio => Some("Please transcribe and analyze this audio:"),
        }
    }

    /// Whether an empty prompt is sent as is instead of being replaced by
    /// [`Endpoint::default_prompt`]. Image has no default, so it drops empty
    /// prompts.
    pub fn keeps_empty_prompt(self) -> bool {
        matches!(self, Endpoint::Audio)
    }

    /// Whether the response echoes the upload's name and type.
    pub fn echoes_source(self) -> bool {
        matches!(self, Endpoint::Audio)
    }

    fn missing_input(self) -> &'static str {
        match self {
            Endpoint::Text => "Prompt is required",
            Endpoint::Image => "Image file is required",
            Endpoint::Document => "Document file is required",
            Endpoint::Audio => "Audio file is required",
        }
    }

    fn missing_input_hint(self) -> Option<&'static str> {
        match self {
            Endpoint::Audio => Some("Please upload an audio file (MP3 or WAV format)"),
            _ => None,
        }
    }

    fn failure_summary(self) -> &'static str {
        match self {
            Endpoint::Text => "Failed to generate text",
            Endpoint::Image => "Failed to generate from image",
            Endpoint::Document => "Failed to generate from document",
            Endpoint::Audio => "Failed to process audio file",
        }
    }

    fn failure_suggestion(self) -> Option<&'static str> {
        match self {
            Endpoint::Audio => Some("Please ensure the audio file is in a supported format"),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    /// Required prompt or file absent. Never reaches the model.
    #[error("{}", .0.missing_input())]
    MissingInput(Endpoint),

    /// The multipart body could not be received or stored.
    #[error("{1}")]
    Upload(Endpoint, UploadError),

    /// Reading the upload or calling the model failed.
    #[error("{}: {1}", .0.failure_summary())]
    Failed(Endpoint, String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<String>,
}

impl ErrorBody {
    fn failure(endpoint: Endpoint, details: String) -> Self {
        ErrorBody {
            error: endpoint.failure_summary().to_string(),
            message: None,
            details: Some(details),
            suggestion: endpoint.failure_suggestion().map(str::to_string),
        }
    }
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            GenerateError::MissingInput(endpoint) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: endpoint.missing_input().to_string(),
                    message: endpoint.missing_input_hint().map(str::to_string),
                    details: None,
                    suggestion: None,
                },
            ),
            GenerateError::Upload(endpoint, UploadError::Io(err)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::failure(endpoint, err.to_string()),
            ),
            GenerateError::Upload(_, err) => (
                err.status(),
                ErrorBody {
                    error: "Invalid multipart request".to_string(),
                    message: None,
                    details: Some(err.to_string()),
                    suggestion: None,
                },
            ),
            GenerateError::Failed(endpoint, details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::failure(endpoint, details),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    async fn render(err: GenerateError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_prompt_is_bad_request() {
        let (status, body) = render(GenerateError::MissingInput(Endpoint::Text)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Prompt is required" }));
    }

    #[tokio::test]
    async fn missing_audio_carries_hint() {
        let (status, body) = render(GenerateError::MissingInput(Endpoint::Audio)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "error": "Audio file is required",
                "message": "Please upload an audio file (MP3 or WAV format)"
            })
        );
    }

    #[tokio::test]
    async fn failure_carries_details() {
        let (status, body) =
            render(GenerateError::Failed(Endpoint::Document, "quota exceeded".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "Failed to generate from document", "details": "quota exceeded" })
        );
    }

    #[tokio::test]
    async fn audio_failure_carries_suggestion() {
        let (_, body) = render(GenerateError::Failed(Endpoint::Audio, "boom".into())).await;
        assert_eq!(body["error"], "Failed to process audio file");
        assert_eq!(body["details"], "boom");
        assert_eq!(
            body["suggestion"],
            "Please ensure the audio file is in a supported format"
        );
    }

    #[tokio::test]
    async fn storage_failure_is_reported_as_endpoint_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let (status, body) =
            render(GenerateError::Upload(Endpoint::Image, UploadError::Io(io))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to generate from image");
        assert_eq!(body["details"], "disk full");
    }

    #[test]
    fn defaults_only_for_document_and_audio() {
        assert_eq!(Endpoint::Text.default_prompt(), None);
        assert_eq!(Endpoint::Image.default_prompt(), None);
        assert_eq!(
            Endpoint::Document.default_prompt(),
            Some("Ringkas dokumen berikut:")
        );
        assert_eq!(
            Endpoint::Audio.default_prompt(),
            Some("Please transcribe and analyze this audio:")
        );
    }
}
