use std::sync::Arc;

use referent_core::config::{AppConfig, ImageEndpoint};
use referent_core::error::AppError;
use referent_core::models::GeneratedImage;
use referent_core::traits::ImageGenerator;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::llm::build_client;
use crate::upstream;

const GUIDANCE_SCALE: f32 = 7.5;
const INFERENCE_STEPS: u32 = 50;
const IMAGE_SIZE: u32 = 512;
const DEFAULT_MIME: &str = "image/png";

const GENERIC_FAILURE: &str = "Image generation failed";
const WRONG_FORMAT: &str = "Expected an image but received a different format";

/// Hugging Face inference client for text-to-image models.
#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    config: Arc<AppConfig>,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    inputs: &'a str,
    parameters: ImageParameters,
}

#[derive(Serialize)]
struct ImageParameters {
    guidance_scale: f32,
    num_inference_steps: u32,
    width: u32,
    height: u32,
}

impl ImageClient {
    pub fn new(config: Arc<AppConfig>) -> Result<Self, AppError> {
        Ok(Self {
            client: build_client()?,
            config,
        })
    }

    async fn send(&self, endpoint: &ImageEndpoint, prompt: &str) -> Result<GeneratedImage, AppError> {
        let body = ImageRequest {
            inputs: prompt,
            parameters: ImageParameters {
                guidance_scale: GUIDANCE_SCALE,
                num_inference_steps: INFERENCE_STEPS,
                width: IMAGE_SIZE,
                height: IMAGE_SIZE,
            },
        };

        tracing::info!(
            model = %endpoint.model,
            prompt_chars = prompt.chars().count(),
            "Sending image generation request"
        );

        let response = self
            .client
            .post(&endpoint.url)
            .bearer_auth(&endpoint.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    AppError::NetworkError(format!("Connection failed: {e}"))
                } else {
                    AppError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        tracing::info!(status = status.as_u16(), %content_type, "Image provider responded");

        if status == StatusCode::SERVICE_UNAVAILABLE {
            tracing::warn!("Image model is still loading");
            return Err(AppError::ModelLoading);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = upstream::error_message(status, &text, GENERIC_FAILURE);
            tracing::error!(status = status.as_u16(), %message, "Image provider returned an error");
            return Err(AppError::UpstreamError {
                status_code: status.as_u16(),
                message,
            });
        }

        let mime = mime_essence(&content_type);
        if !mime.as_deref().is_some_and(|m| m.starts_with("image/")) {
            tracing::warn!(%content_type, "Unexpected content type from image provider");
            let text = response.text().await.unwrap_or_default();
            let message = upstream::message_from_json(&text)
                .or_else(|| {
                    let raw = text.trim();
                    (!raw.is_empty()).then(|| raw.chars().take(500).collect())
                })
                .unwrap_or_else(|| WRONG_FORMAT.to_string());
            return Err(AppError::UnexpectedFormat(message));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read image body: {e}")))?;
        tracing::info!(bytes = bytes.len(), "Image received");

        Ok(GeneratedImage {
            mime_type: mime.unwrap_or_else(|| DEFAULT_MIME.to_string()),
            bytes: bytes.to_vec(),
        })
    }
}

impl ImageGenerator for ImageClient {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, AppError> {
        let endpoint = self.config.resolve_image()?;
        self.send(&endpoint, prompt).await
    }
}

/// `image/jpeg; charset=binary` -> `image/jpeg`.
/// Lower-cased `type/subtype` of a `Content-Type` value.
fn mime_essence(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next()?.trim();
    (!essence.is_empty()).then(|| essence.to_ascii_lowercase())
}
