//! HTTP handlers for the gateway.

pub mod errors;
pub mod generate;
pub mod health;

pub use errors::{Endpoint, GenerateError};
pub use generate::{
    generate_from_audio, generate_from_document, generate_from_image, generate_text,
};
pub use health::{health_check, metrics_endpoint, not_found, readiness_check};
