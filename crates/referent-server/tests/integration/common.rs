use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wiremock::MockServer;

use referent_core::config::{AppConfig, ImageSettings, ProviderSettings};
use referent_core::Provider;
use referent_server::routes;
use referent_server::state::AppState;

pub const TEST_API_KEY: &str = "test-secret-key";

pub struct TestApp {
    pub router: Router,
    /// Stands in for article hosts, chat providers and the image provider.
    pub upstream: MockServer,
}

impl TestApp {
    pub async fn post_json(
        &self,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }
}

/// Perplexity, OpenAI and the image provider configured against the mock upstream.
/// OpenRouter stays unconfigured.
pub async fn setup_test_app() -> TestApp {
    let upstream = MockServer::start().await;
    let config = configured(&upstream);
    build(config, None, upstream)
}

/// Same providers, but every API route requires [`TEST_API_KEY`].
pub async fn setup_test_app_with_auth() -> TestApp {
    let upstream = MockServer::start().await;
    let config = configured(&upstream);
    build(config, Some(TEST_API_KEY.to_string()), upstream)
}

/// No provider keys at all.
pub async fn setup_unconfigured_app() -> TestApp {
    let upstream = MockServer::start().await;
    let config = AppConfig {
        allow_private_urls: true,
        ..AppConfig::default()
    };
    build(config, None, upstream)
}

fn configured(upstream: &MockServer) -> AppConfig {
    let chat = |key: &str| ProviderSettings {
        api_key: Some(key.to_string()),
        base_url: format!("{}/v1", upstream.uri()),
        model: "test-model".to_string(),
    };

    AppConfig {
        allow_private_urls: true,
        ..AppConfig::default()
    }
    .with_provider(Provider::Perplexity, chat("pplx-key"))
    .with_provider(Provider::OpenAi, chat("openai-key"))
    .with_image(ImageSettings {
        api_key: Some("hf-key".to_string()),
        base_url: format!("{}/models", upstream.uri()),
        model: "org/diffusion".to_string(),
    })
}

fn build(config: AppConfig, api_key: Option<String>, upstream: MockServer) -> TestApp {
    let state = Arc::new(AppState::new(config, api_key).unwrap());
    TestApp {
        router: routes::router(state),
        upstream,
    }
}

pub fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}
