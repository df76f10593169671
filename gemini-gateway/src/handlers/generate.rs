//! Generation routes.
//!
//! Every route runs the same pipeline: validate, build the part list, call the
//! model, extract text. They differ only in the [`Endpoint`] wording and
//! defaults.

use super::errors::{Endpoint, GenerateError};
use crate::dtos::{GenerateTextRequest, GenerationResult};
use crate::services::providers::{ContentPart, GenerationPayload};
use crate::services::{extract_text, record_generation, UploadedFile};
use crate::startup::AppState;
use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use std::time::Instant;

pub async fn generate_text(
    State(state): State<AppState>,
    body: Result<Json<GenerateTextRequest>, JsonRejection>,
) -> Result<Json<GenerationResult>, GenerateError> {
    let prompt = match body {
        Ok(Json(request)) => request.prompt,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Unreadable generate-text body");
            None
        }
    }
    .filter(|prompt| !prompt.is_empty())
    .ok_or(GenerateError::MissingInput(Endpoint::Text))?;

    let text = generate(&state, Endpoint::Text, GenerationPayload::Prompt(prompt)).await?;

    Ok(Json(GenerationResult::text(text)))
}

pub async fn generate_from_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResult>, GenerateError> {
    generate_from_upload(&state, Endpoint::Image, multipart).await
}

pub async fn generate_from_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResult>, GenerateError> {
    generate_from_upload(&state, Endpoint::Document, multipart).await
}

pub async fn generate_from_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResult>, GenerateError> {
    generate_from_upload(&state, Endpoint::Audio, multipart).await
}

async fn generate_from_upload(
    state: &AppState,
    endpoint: Endpoint,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResult>, GenerateError> {
    let file_field = endpoint
        .file_field()
        .ok_or(GenerateError::MissingInput(endpoint))?;

    // A body that isn't multipart at all simply carries no file.
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(
            endpoint = endpoint.name(),
            error = %rejection.body_text(),
            "Request body is not multipart"
        );
        GenerateError::MissingInput(endpoint)
    })?;

    let form = state
        .uploads
        .receive(multipart, file_field)
        .await
        .map_err(|e| {
            tracing::warn!(endpoint = endpoint.name(), error = %e, "Failed to receive upload");
            GenerateError::Upload(endpoint, e)
        })?;

    let file = form.file.ok_or(GenerateError::MissingInput(endpoint))?;
    let prompt = resolve_prompt(endpoint, form.prompt);

    // Dropping `file` also cleans up if this future is cancelled mid-call.
    let result = generate_from_file(state, endpoint, prompt, &file).await;
    file.discard();

    result.map(Json)
}

async fn generate_from_file(
    state: &AppState,
    endpoint: Endpoint,
    prompt: Option<String>,
    file: &UploadedFile,
) -> Result<GenerationResult, GenerateError> {
    let bytes = file.read().await.map_err(|e| {
        tracing::error!(
            endpoint = endpoint.name(),
            path = %file.path.display(),
            error = %e,
            "Failed to read upload"
        );
        GenerateError::Failed(endpoint, e.to_string())
    })?;

    let payload = GenerationPayload::Parts(build_parts(prompt, &file.mime_type, &bytes));
    let text = generate(state, endpoint, payload).await?;

    let result = GenerationResult::text(text);
    if endpoint.echoes_source() {
        return Ok(result.with_source(file.original_name.clone(), file.mime_type.clone()));
    }
    Ok(result)
}

/// The caller's prompt, or the endpoint default when it is missing. An empty
/// prompt also takes the default unless the endpoint keeps it as sent.
fn resolve_prompt(endpoint: Endpoint, prompt: Option<String>) -> Option<String> {
    match prompt {
        Some(prompt) if !prompt.is_empty() || endpoint.keeps_empty_prompt() => Some(prompt),
        _ => endpoint.default_prompt().map(str::to_string),
    }
}

/// Text part first when there is one, then the attachment as inline data.
fn build_parts(prompt: Option<String>, mime_type: &str, bytes: &[u8]) -> Vec<ContentPart> {
    let mut parts = Vec::with_capacity(2);
    if let Some(prompt) = prompt {
        parts.push(ContentPart::text(prompt));
    }
    parts.push(ContentPart::inline_data(
        mime_type,
        BASE64_STANDARD.encode(bytes),
    ));
    parts
}

async fn generate(
    state: &AppState,
    endpoint: Endpoint,
    payload: GenerationPayload,
) -> Result<String, GenerateError> {
    let started = Instant::now();

    match state.generator.generate_content(payload).await {
        Ok(response) => {
            record_generation(endpoint.name(), "success");
            tracing::info!(
                endpoint = endpoint.name(),
                model = state.generator.model(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Generation completed"
            );
            Ok(extract_text(&response))
        }
        Err(e) => {
            record_generation(endpoint.name(), "failure");
            tracing::error!(
                endpoint = endpoint.name(),
                model = state.generator.model(),
                error = %e,
                "Generation failed"
            );
            Err(GenerateError::Failed(endpoint, e.to_string()))
        }
    }
}
