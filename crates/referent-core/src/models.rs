use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Minimum number of characters a body block needs before it counts as article content.
pub const MIN_CONTENT_CHARS: usize = 100;

/// Title, date and body text pulled out of an article page.
///
/// Every field degrades to `None` independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParsedArticle {
    pub date: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl ParsedArticle {
    /// True when the body text is long enough to feed a generation task.
    pub fn has_usable_content(&self) -> bool {
        self.content
            .as_deref()
            .is_some_and(|c| c.chars().count() > MIN_CONTENT_CHARS)
    }
}

/// An LLM chat-completion provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Provider {
    OpenAi,
    #[default]
    Perplexity,
    OpenRouter,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::OpenAi, Provider::Perplexity, Provider::OpenRouter];

    /// Resolve a request's provider parameter.
    ///
    /// Absent or unrecognised names fall back to the default provider.
    pub fn from_name(name: Option<&str>) -> Self {
        let Some(raw) = name.map(str::trim).filter(|n| !n.is_empty()) else {
            return Provider::default();
        };
        match raw.to_ascii_lowercase().as_str() {
            "openai" => Provider::OpenAi,
            "perplexity" => Provider::Perplexity,
            "openrouter" => Provider::OpenRouter,
            _ => {
                tracing::warn!(provider = raw, "Unknown provider, using default");
                Provider::default()
            }
        }
    }

    /// Identifier used in requests and environment variable prefixes.
    pub fn id(self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Perplexity => "perplexity",
            Provider::OpenRouter => "openrouter",
        }
    }

    /// Human-readable name used in error messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Perplexity => "Perplexity",
            Provider::OpenRouter => "OpenRouter",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single chat request: one system prompt, one user prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
}

/// Raw bytes returned by the image provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl GeneratedImage {
    /// Encode as a `data:<mime>;base64,<payload>` URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, BASE64.encode(&self.bytes))
    }
}
