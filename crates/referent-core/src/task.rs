use std::fmt;
use std::str::FromStr;

use crate::models::GenerationRequest;

/// Character budget for article content sent when describing an illustration.
pub const IMAGE_PROMPT_CONTENT_BUDGET: usize = 2000;

/// A generation task that can be run against an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    Translate,
    Summarize,
    Theses,
    TelegramPost,
    ImagePrompt,
}

/// The article fields a task may draw on.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskInput<'a> {
    pub title: Option<&'a str>,
    pub date: Option<&'a str>,
    pub content: &'a str,
}

impl<'a> TaskInput<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            title: None,
            date: None,
            content,
        }
    }

    pub fn with_title(mut self, title: Option<&'a str>) -> Self {
        self.title = title.filter(|t| !t.is_empty());
        self
    }

    pub fn with_date(mut self, date: Option<&'a str>) -> Self {
        self.date = date.filter(|d| !d.is_empty());
        self
    }
}

impl Task {
    pub const ALL: [Task; 5] = [
        Task::Translate,
        Task::Summarize,
        Task::Theses,
        Task::TelegramPost,
        Task::ImagePrompt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Task::Translate => "translate",
            Task::Summarize => "summarize",
            Task::Theses => "theses",
            Task::TelegramPost => "telegram-post",
            Task::ImagePrompt => "image-prompt",
        }
    }

    pub fn temperature(self) -> f32 {
        match self {
            Task::Translate | Task::Summarize | Task::Theses => 0.3,
            Task::TelegramPost | Task::ImagePrompt => 0.7,
        }
    }

    /// Maximum number of content characters sent upstream, if any.
    pub fn content_budget(self) -> Option<usize> {
        match self {
            Task::ImagePrompt => Some(IMAGE_PROMPT_CONTENT_BUDGET),
            _ => None,
        }
    }

    /// Text returned when the provider answers without any content.
    pub fn placeholder(self) -> &'static str {
        match self {
            Task::Translate => "Could not produce a translation",
            Task::Summarize => "Could not produce a summary of the article",
            Task::Theses => "Could not extract the theses of the article",
            Task::TelegramPost => "Could not produce a Telegram post",
            Task::ImagePrompt => "Could not produce an image description",
        }
    }

    /// Whether surrounding whitespace is stripped from the result.
    pub fn trims_output(self) -> bool {
        matches!(self, Task::ImagePrompt)
    }

    /// The fixed system prompt. `language` is the output language for text tasks.
    pub fn system_prompt(self, language: &str) -> String {
        match self {
            Task::Translate => format!(
                "You are a professional translator. Translate the following text from English into {language}, preserving the structure and style of the original."
            ),
            Task::Summarize => format!(
                "You are a professional analyst. Read the following article and write a short summary in {language} (2-3 paragraphs) explaining the main topic and the key points of the article."
            ),
            Task::Theses => format!(
                "You are a professional analyst. Read the following article and identify its main theses (key ideas, claims, conclusions). Present them as a structured bulleted list in {language}. Each thesis must be short and meaningful."
            ),
            Task::TelegramPost => format!(
                "You are a professional copywriter. Based on the following article, write a Telegram post in {language}. The post must be:\n\
                 - Engaging and attention-grabbing\n\
                 - Structured (use Markdown: **bold**, *italic*, lists)\n\
                 - Include a short summary and the key points\n\
                 - End with a call to action or a question for discussion\n\
                 - Length: 500-800 characters\n\
                 Use only Markdown formatting supported by Telegram."
            ),
            Task::ImagePrompt => "You are a professional artist and illustrator. Based on the following article, write a detailed image description in English for generating an illustration. The description must be concrete, visually rich and reflect the main topic of the article. Use a photographic or realistic illustration style. The description must be 50-100 words long. Reply with the image description only, without any additional comments.".to_string(),
        }
    }

    /// Build the user prompt from the article fields.
    pub fn user_prompt(self, input: &TaskInput<'_>) -> String {
        let content = match self.content_budget() {
            Some(budget) => truncate_chars(input.content, budget),
            None => input.content,
        };

        match self {
            Task::Translate => content.to_string(),
            Task::TelegramPost => {
                let mut prompt = String::new();
                if let Some(title) = input.title {
                    prompt.push_str(&format!("Title: {title}\n\n"));
                }
                if let Some(date) = input.date {
                    prompt.push_str(&format!("Date: {date}\n\n"));
                }
                prompt.push_str(&format!("Content: {content}"));
                prompt
            }
            Task::Summarize | Task::Theses | Task::ImagePrompt => match input.title {
                Some(title) => format!("Title: {title}\n\nContent: {content}"),
                None => format!("Content: {content}"),
            },
        }
    }

    pub fn build_request(self, input: &TaskInput<'_>, language: &str) -> GenerationRequest {
        GenerationRequest {
            system_prompt: self.system_prompt(language),
            user_prompt: self.user_prompt(input),
            temperature: self.temperature(),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Task {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Task::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Task::ALL.iter().map(|t| t.name()).collect();
                format!("unknown task '{s}', expected one of: {}", names.join(", "))
            })
    }
}

/// Cut `s` after `max` characters without splitting a code point.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
