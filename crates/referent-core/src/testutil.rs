//! Test utilities: mock implementations of the core traits.
//!
//! Handwritten mocks for dependency injection in unit tests. All mocks use
//! `Arc<Mutex<_>>` so tests can assert on recorded calls.

use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::models::{GenerationRequest, ParsedArticle, Provider};
use crate::traits::{ArticleExtractor, Fetcher, Generator, GeneratorFactory};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher that returns a configurable response.
#[derive(Clone)]
pub struct MockFetcher {
    /// Queue of responses. Each call pops the first element.
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
}

impl MockFetcher {
    pub fn new(html: &str) -> Self {
        Self {
            responses: Arc::new(Mutex::new(vec![Ok(html.to_string())])),
        }
    }

    pub fn with_error(error: AppError) -> Self {
        Self {
            responses: Arc::new(Mutex::new(vec![Err(error)])),
        }
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, _url: &str) -> Result<String, AppError> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("<html><body>default</body></html>".to_string())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockArticleExtractor
// ---------------------------------------------------------------------------

/// Mock extractor that ignores the HTML and returns a fixed article.
#[derive(Clone)]
pub struct MockArticleExtractor {
    article: ParsedArticle,
}

impl MockArticleExtractor {
    pub fn new(article: ParsedArticle) -> Self {
        Self { article }
    }
}

impl ArticleExtractor for MockArticleExtractor {
    fn extract(&self, _html: &str, _url: &str) -> ParsedArticle {
        self.article.clone()
    }
}

// ---------------------------------------------------------------------------
// MockGenerator
// ---------------------------------------------------------------------------

/// Mock generator that records requests and returns configurable text.
#[derive(Clone)]
pub struct MockGenerator {
    output: Option<String>,
    error: Arc<Mutex<Option<AppError>>>,
    pub requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockGenerator {
    pub fn new(output: &str) -> Self {
        Self {
            output: Some(output.to_string()),
            error: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A provider that answers with no message content.
    pub fn empty() -> Self {
        Self {
            output: None,
            error: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_error(error: AppError) -> Self {
        Self {
            output: None,
            error: Arc::new(Mutex::new(Some(error))),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Generator for MockGenerator {
    async fn complete(&self, request: &GenerationRequest) -> Result<Option<String>, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(e) = self.error.lock().unwrap().take() {
            return Err(e);
        }
        Ok(self.output.clone())
    }
}

// ---------------------------------------------------------------------------
// MockGeneratorFactory
// ---------------------------------------------------------------------------

/// Mock factory whose generators all share one request log.
#[derive(Clone)]
pub struct MockGeneratorFactory {
    output: String,
    create_error: Arc<Mutex<Option<AppError>>>,
    pub created: Arc<Mutex<Vec<Provider>>>,
    pub requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockGeneratorFactory {
    pub fn new(output: &str) -> Self {
        Self {
            output: output.to_string(),
            create_error: Arc::new(Mutex::new(None)),
            created: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_create_error(error: AppError) -> Self {
        Self {
            create_error: Arc::new(Mutex::new(Some(error))),
            ..Self::new("")
        }
    }
}

impl GeneratorFactory for MockGeneratorFactory {
    type Generator = MockGenerator;

    fn create(&self, provider: Provider) -> Result<MockGenerator, AppError> {
        if let Some(e) = self.create_error.lock().unwrap().take() {
            return Err(e);
        }
        self.created.lock().unwrap().push(provider);
        let mut generator = MockGenerator::new(&self.output);
        generator.requests = Arc::clone(&self.requests);
        Ok(generator)
    }
}
