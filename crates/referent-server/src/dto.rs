use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ParseRequest {
    /// Article URL to fetch
    pub url: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ParseResponse {
    pub date: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl From<referent_core::ParsedArticle> for ParseResponse {
    fn from(a: referent_core::ParsedArticle) -> Self {
        Self {
            date: a.date,
            title: a.title,
            content: a.content,
        }
    }
}

// ---------------------------------------------------------------------------
// Text generation
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct TranslateRequest {
    /// Text to translate
    pub content: Option<String>,
    /// `openai`, `perplexity` (default) or `openrouter`
    pub provider: Option<String>,
}

/// Body shared by the summary, theses, post and image-prompt endpoints.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ArticleTaskRequest {
    pub title: Option<String>,
    /// Only used by `/telegram-post`
    pub date: Option<String>,
    pub content: Option<String>,
    /// `openai`, `perplexity` (default) or `openrouter`
    pub provider: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TranslateResponse {
    pub translation: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ThesesResponse {
    pub theses: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PostResponse {
    pub post: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ImagePromptResponse {
    pub prompt: String,
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct GenerateImageRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct GenerateImageResponse {
    /// `data:<mime>;base64,<payload>`
    pub image: String,
    pub prompt: String,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// Which chat providers have an API key.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProviderStatus {
    pub openai: bool,
    pub perplexity: bool,
    pub openrouter: bool,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub providers: ProviderStatus,
    /// Whether the image provider has an API key
    pub image: bool,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
