use std::future::Future;

use crate::error::AppError;
use crate::models::{GeneratedImage, GenerationRequest, ParsedArticle, Provider};

/// Fetches raw HTML content from a URL.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Pulls title, date and body text out of raw HTML.
///
/// Never fails: missing fields come back as `None`.
pub trait ArticleExtractor: Send + Sync + Clone {
    fn extract(&self, html: &str, url: &str) -> ParsedArticle;
}

/// Sends one chat-completion request to a resolved provider.
pub trait Generator: Send + Sync + Clone {
    /// Returns the first choice's message content, or `None` when the
    /// provider answered successfully without any.
    fn complete(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<Option<String>, AppError>> + Send;
}

/// Creates a [`Generator`] for a given provider.
///
/// Resolution fails with [`AppError::ConfigError`] when the provider has no key.
pub trait GeneratorFactory: Send + Sync + Clone {
    type Generator: Generator;

    fn create(&self, provider: Provider) -> Result<Self::Generator, AppError>;
}

/// Turns a text prompt into an image.
pub trait ImageGenerator: Send + Sync + Clone {
    fn generate(&self, prompt: &str)
    -> impl Future<Output = Result<GeneratedImage, AppError>> + Send;
}
