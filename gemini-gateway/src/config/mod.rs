use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Model used when `GEMINI_MODEL_NAME` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Public Gemini REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default upper bound for a multipart request body (20MB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub uploads: UploadSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    /// Model identifier, e.g. gemini-2.5-flash
    pub model: String,
    /// REST base URL without trailing slash
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    /// Directory holding uploads while their request is in flight
    pub dir: String,
    pub max_bytes: usize,
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        Ok(GatewayConfig {
            common: common_config,
            gemini: GeminiSettings {
                api_key: Secret::new(get_env("GEMINI_API_KEY", None)?),
                model: get_env("GEMINI_MODEL_NAME", Some(DEFAULT_MODEL))?,
                base_url: get_env("GEMINI_API_BASE_URL", Some(DEFAULT_API_BASE_URL))?
                    .trim_end_matches('/')
                    .to_string(),
            },
            uploads: UploadSettings {
                dir: get_env("UPLOAD_DIR", Some("uploads"))?,
                max_bytes: get_env(
                    "MAX_UPLOAD_BYTES",
                    Some(&DEFAULT_MAX_UPLOAD_BYTES.to_string()),
                )?
                .parse()
                .map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!("MAX_UPLOAD_BYTES is invalid: {}", e))
                })?,
            },
        })
    }
}

/// Read `key`, falling back to `default`. Unset and blank values are treated alike.
fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => match default {
            Some(def) => Ok(def.to_string()),
            None => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} is required but not set",
                key
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_env_uses_default_when_unset() {
        let value = get_env("GEMINI_GATEWAY_TEST_SURELY_UNSET", Some("fallback")).unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn get_env_without_default_is_a_config_error() {
        let err = get_env("GEMINI_GATEWAY_TEST_SURELY_UNSET", None).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err
            .to_string()
            .contains("GEMINI_GATEWAY_TEST_SURELY_UNSET is required"));
    }

    #[test]
    fn api_key_is_redacted_in_debug_output() {
        let settings = GeminiSettings {
            api_key: Secret::new("super-secret".to_string()),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_API_BASE_URL.to_string(),
        };
        assert!(!format!("{:?}", settings).contains("super-secret"));
    }
}
