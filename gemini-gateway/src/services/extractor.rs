//! Pulls the generated text out of a raw model response.
//!
//! The upstream API and its client SDKs have nested the text differently over
//! time, so several locations are tried in order before giving up and handing
//! the caller the whole response as indented JSON.

use crate::services::providers::ModelResponse;

/// Locations of the first generated text fragment, most common first.
const TEXT_POINTERS: [&str; 3] = [
    "/response/candidates/0/content/parts/0/text",
    "/candidates/0/content/parts/0/text",
    "/response/candidates/0/content/text",
];

/// Outcome of searching a response for text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Text found at one of the known locations.
    Text(String),
    /// No known location matched; the whole response, pretty-printed.
    Raw(String),
}

impl Extraction {
    pub fn into_text(self) -> String {
        match self {
            Extraction::Text(text) | Extraction::Raw(text) => text,
        }
    }
}

pub fn extract(response: &ModelResponse) -> Extraction {
    TEXT_POINTERS
        .iter()
        .find_map(|pointer| response.pointer(pointer).and_then(|v| v.as_str()))
        .map(|text| Extraction::Text(text.to_string()))
        .unwrap_or_else(|| {
            tracing::warn!("No generated text found in model response, returning raw payload");
            Extraction::Raw(pretty(response))
        })
}

/// Generated text, or the indented JSON of `response` when none is found.
pub fn extract_text(response: &ModelResponse) -> String {
    extract(response).into_text()
}

fn pretty(response: &ModelResponse) -> String {
    serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string())
}
