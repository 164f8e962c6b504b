pub mod config;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod session;
pub mod task;
pub mod traits;

#[cfg(test)]
mod testutil;

pub use config::{AppConfig, ImageEndpoint, ProviderEndpoint, ProviderSettings};
pub use dispatch::dispatch;
pub use error::{AppError, ErrorCategory};
pub use models::{GeneratedImage, GenerationRequest, MIN_CONTENT_CHARS, ParsedArticle, Provider};
pub use session::{Action, Outcome, Phase, Session};
pub use task::{Task, TaskInput};
pub use traits::{ArticleExtractor, Fetcher, Generator, GeneratorFactory, ImageGenerator};
