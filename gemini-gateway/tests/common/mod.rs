#![allow(dead_code)]

use gemini_gateway::config::{GatewayConfig, GeminiSettings, UploadSettings, DEFAULT_MODEL};
use gemini_gateway::services::providers::mock::MockProvider;
use gemini_gateway::services::providers::{
    ContentGenerator, GenerationPayload, ModelResponse, ProviderError,
};
use gemini_gateway::startup::Application;
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_API_KEY: &str = "test-api-key";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub upload_dir: String,
    pub client: reqwest::Client,
}

/// Configuration for a test instance: random port, private upload directory.
pub fn test_config(base_url: &str) -> GatewayConfig {
    GatewayConfig {
        common: CoreConfig { port: 0 },
        gemini: GeminiSettings {
            api_key: Secret::new(TEST_API_KEY.to_string()),
            model: DEFAULT_MODEL.to_string(),
            base_url: base_url.to_string(),
        },
        uploads: UploadSettings {
            dir: format!("target/test-uploads-{}", Uuid::new_v4()),
            max_bytes: 1024 * 1024,
        },
    }
}

impl TestApp {
    /// Spawn the gateway backed by `generator`.
    pub async fn spawn(generator: Arc<dyn ContentGenerator>) -> Self {
        let config = test_config("http://127.0.0.1:9");
        let app = Application::build_with_generator(config.clone(), generator)
            .await
            .expect("Failed to build test application");
        Self::run(app, config).await
    }

    /// Spawn the gateway with the real Gemini provider pointed at `base_url`.
    pub async fn spawn_with_gemini(base_url: &str) -> Self {
        let config = test_config(base_url);
        let app = Application::build(config.clone())
            .await
            .expect("Failed to build test application");
        Self::run(app, config).await
    }

    async fn run(app: Application, config: GatewayConfig) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            upload_dir: config.uploads.dir,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_json(&self, path: &str, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_form(&self, path: &str, form: reqwest::multipart::Form) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Number of entries left in the upload directory.
    pub async fn stored_uploads(&self) -> usize {
        let mut entries = match tokio::fs::read_dir(&self.upload_dir).await {
            Ok(entries) => entries,
            Err(_) => return 0,
        };
        let mut count = 0;
        while let Ok(Some(_)) = entries.next_entry().await {
            count += 1;
        }
        count
    }

    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_dir_all(&self.upload_dir).await;
    }
}

pub fn mock() -> Arc<MockProvider> {
    Arc::new(MockProvider::new())
}

pub fn failing_mock(message: &str) -> Arc<MockProvider> {
    Arc::new(MockProvider::failing(message))
}

/// A multipart file part with the given name and content type.
pub fn file_part(bytes: &[u8], file_name: &str, mime: &str) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(bytes.to_vec())
        .file_name(file_name.to_string())
        .mime_str(mime)
        .expect("valid mime type")
}

/// Generator that never answers, standing in for a stalled upstream.
#[derive(Default)]
pub struct HangingProvider {
    calls: AtomicUsize,
}

impl HangingProvider {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ContentGenerator for HangingProvider {
    async fn generate_content(
        &self,
        _payload: GenerationPayload,
    ) -> Result<ModelResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }

    fn model(&self) -> &str {
        "hanging-model"
    }
}
