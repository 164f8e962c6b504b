use std::sync::Arc;

use referent_core::config::{AppConfig, ProviderEndpoint};
use referent_core::error::AppError;
use referent_core::models::{GenerationRequest, Provider};
use referent_core::traits::{Generator, GeneratorFactory};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::upstream;

/// Chat-completion client for one resolved provider.
///
/// Works with any OpenAI-compatible API, including:
/// - OpenAI directly (`https://api.openai.com/v1`)
/// - Perplexity (`https://api.perplexity.ai`)
/// - OpenRouter (`https://openrouter.ai/api/v1`)
///
/// Each call is a single request: nothing is retried.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    endpoint: ProviderEndpoint,
}

impl ChatClient {
    pub fn new(endpoint: ProviderEndpoint) -> Result<Self, AppError> {
        Ok(Self::with_client(build_client()?, endpoint))
    }

    /// Reuse an existing connection pool.
    pub fn with_client(client: Client, endpoint: ProviderEndpoint) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &ProviderEndpoint {
        &self.endpoint
    }
}

pub(crate) fn build_client() -> Result<Client, AppError> {
    Client::builder()
        .build()
        .map_err(|e| AppError::HttpError(e.to_string()))
}

// ---- OpenAI API types ----

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Option<Vec<Choice>>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl Generator for ChatClient {
    async fn complete(&self, request: &GenerationRequest) -> Result<Option<String>, AppError> {
        let url = self.endpoint.completions_url();
        let provider = self.endpoint.provider;

        let body = ChatRequest {
            model: &self.endpoint.model,
            messages: [
                Message {
                    role: "system",
                    content: &request.system_prompt,
                },
                Message {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            temperature: request.temperature,
        };

        tracing::info!(
            %provider,
            model = %self.endpoint.model,
            prompt_chars = request.user_prompt.chars().count(),
            "Sending chat completion request"
        );

        let mut builder = self
            .client
            .post(&url)
            .bearer_auth(&self.endpoint.api_key)
            .json(&body);
        if let Some(referer) = &self.endpoint.referer {
            builder = builder.header("HTTP-Referer", referer);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else {
                AppError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = upstream::error_message(status, &text, "API error");
            tracing::error!(%provider, status = status.as_u16(), %message, "Provider returned an error");
            return Err(AppError::UpstreamError {
                status_code: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to parse LLM response: {e}")))?;

        Ok(chat_response
            .choices
            .into_iter()
            .flatten()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content))
    }
}

/// Creates [`ChatClient`]s from the application configuration.
///
/// All clients share one connection pool.
#[derive(Clone)]
pub struct ChatClientFactory {
    client: Client,
    config: Arc<AppConfig>,
}

impl ChatClientFactory {
    pub fn new(config: Arc<AppConfig>) -> Result<Self, AppError> {
        Ok(Self {
            client: build_client()?,
            config,
        })
    }
}

impl GeneratorFactory for ChatClientFactory {
    type Generator = ChatClient;

    fn create(&self, provider: Provider) -> Result<ChatClient, AppError> {
        let endpoint = self.config.resolve(provider)?;
        Ok(ChatClient::with_client(self.client.clone(), endpoint))
    }
}
