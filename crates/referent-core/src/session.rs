use std::sync::Mutex;

use crate::dispatch::dispatch;
use crate::error::AppError;
use crate::models::{ParsedArticle, Provider};
use crate::task::{Task, TaskInput};
use crate::traits::{ArticleExtractor, Fetcher, GeneratorFactory};

/// Where a session is in its single in-flight action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Extracting,
    Generating,
}

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Extraction only.
    Parse,
    /// Extraction followed by one generation task.
    Generate { task: Task, provider: Provider },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub article: ParsedArticle,
    /// Generated text, present for [`Action::Generate`].
    pub output: Option<String>,
}

/// Sequences one extraction and at most one generation per action.
///
/// Only one action may be in flight: a second [`run`](Self::run) while the
/// first is still extracting or generating fails with [`AppError::Busy`].
/// Nothing is queued and nothing is retried.
pub struct Session<F, X, G>
where
    F: Fetcher,
    X: ArticleExtractor,
    G: GeneratorFactory,
{
    fetcher: F,
    extractor: X,
    generators: G,
    language: String,
    phase: Mutex<Phase>,
}

impl<F, X, G> Session<F, X, G>
where
    F: Fetcher,
    X: ArticleExtractor,
    G: GeneratorFactory,
{
    pub fn new(fetcher: F, extractor: X, generators: G, language: impl Into<String>) -> Self {
        Self {
            fetcher,
            extractor,
            generators,
            language: language.into(),
            phase: Mutex::new(Phase::Idle),
        }
    }

    pub fn phase(&self) -> Phase {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Claim the session for one action. The claim is released on drop.
    fn begin(&self) -> Result<PhaseGuard<'_>, AppError> {
        let mut phase = self.phase.lock().unwrap_or_else(|e| e.into_inner());
        if *phase != Phase::Idle {
            return Err(AppError::Busy);
        }
        *phase = Phase::Extracting;
        Ok(PhaseGuard { phase: &self.phase })
    }

    /// Run one action end to end.
    ///
    /// 1. Fetch the page and extract the article
    /// 2. For a generation action, require usable content
    /// 3. Resolve the provider and dispatch the task
    pub async fn run(&self, url: &str, action: Action) -> Result<Outcome, AppError> {
        let guard = self.begin()?;

        tracing::info!("Fetching {}", url);
        let html = self.fetcher.fetch(url).await?;
        tracing::info!("Fetched {} bytes of HTML", html.len());

        let article = self.extractor.extract(&html, url);

        let (task, provider) = match action {
            Action::Parse => {
                return Ok(Outcome {
                    article,
                    output: None,
                });
            }
            Action::Generate { task, provider } => (task, provider),
        };

        if !article.has_usable_content() {
            tracing::warn!(url, "No usable content extracted, skipping generation");
            return Err(AppError::ContentUnavailable);
        }

        guard.set(Phase::Generating);
        let generator = self.generators.create(provider)?;
        tracing::info!(%provider, task = task.name(), "Generating");

        let content = article.content.as_deref().unwrap_or_default();
        let input = TaskInput::new(content)
            .with_title(article.title.as_deref())
            .with_date(article.date.as_deref());
        let output = dispatch(&generator, task, &input, &self.language).await?;

        Ok(Outcome {
            article,
            output: Some(output),
        })
    }
}

struct PhaseGuard<'a> {
    phase: &'a Mutex<Phase>,
}

impl PhaseGuard<'_> {
    fn set(&self, next: Phase) {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner()) = next;
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.set(Phase::Idle);
    }
}
