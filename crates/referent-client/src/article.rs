//! Selector-chain article extraction.
//!
//! Title, date and body are each found by walking an ordered list of CSS
//! selectors and taking the first candidate that passes that field's
//! acceptance check. Only the first element matched by each selector is
//! considered. The lists are plain data so they can be tuned and tested
//! on their own.

use std::collections::HashSet;

use referent_core::models::{MIN_CONTENT_CHARS, ParsedArticle};
use referent_core::traits::ArticleExtractor;
use scraper::{ElementRef, Html, Selector};

/// Where a date candidate's value is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    /// `datetime`, then `content`, then the visible text.
    AttributeOrText,
    /// `content` only (meta tags).
    MetaContent,
}

#[derive(Debug, Clone, Copy)]
pub struct DateRule {
    pub selector: &'static str,
    pub source: DateSource,
}

impl DateRule {
    const fn element(selector: &'static str) -> Self {
        Self {
            selector,
            source: DateSource::AttributeOrText,
        }
    }

    const fn meta(selector: &'static str) -> Self {
        Self {
            selector,
            source: DateSource::MetaContent,
        }
    }
}

pub const TITLE_SELECTORS: &[&str] = &[
    "h1",
    "article h1",
    ".post-title",
    ".article-title",
    r#"[class*="title"]"#,
    "title",
];

pub const DATE_RULES: &[DateRule] = &[
    DateRule::element("time[datetime]"),
    DateRule::element("[datetime]"),
    DateRule::element(".date"),
    DateRule::element(".published"),
    DateRule::element(".post-date"),
    DateRule::element(".article-date"),
    DateRule::element(r#"[class*="date"]"#),
    DateRule::meta(r#"meta[property="article:published_time"]"#),
    DateRule::meta(r#"meta[name="publish-date"]"#),
];

pub const CONTENT_SELECTORS: &[&str] = &[
    "article",
    ".post",
    ".content",
    ".article-content",
    ".post-content",
    r#"[class*="content"]"#,
    "main",
    ".entry-content",
];

/// Stripped from content candidates before measuring them.
pub const CONTENT_NOISE: &[&str] = &["script", "style", "nav", "aside", ".ad", ".advertisement"];

/// Stripped from `<body>` when no content candidate qualifies.
pub const BODY_NOISE: &[&str] = &[
    "script",
    "style",
    "nav",
    "aside",
    "header",
    "footer",
    ".ad",
    ".advertisement",
];

struct CompiledDateRule {
    selector: Selector,
    source: DateSource,
}

/// [`ArticleExtractor`] driven by the selector lists in this module.
#[derive(Clone)]
pub struct SelectorExtractor {
    inner: std::sync::Arc<Compiled>,
}

struct Compiled {
    title: Vec<Selector>,
    date: Vec<CompiledDateRule>,
    content: Vec<Selector>,
    content_noise: Vec<Selector>,
    body: Vec<Selector>,
    body_noise: Vec<Selector>,
}

fn compile(selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .filter_map(|s| match Selector::parse(s) {
            Ok(selector) => Some(selector),
            Err(e) => {
                tracing::warn!(selector = s, "Skipping invalid selector: {e}");
                None
            }
        })
        .collect()
}

impl SelectorExtractor {
    pub fn new() -> Self {
        let date = DATE_RULES
            .iter()
            .filter_map(|rule| {
                compile(&[rule.selector])
                    .pop()
                    .map(|selector| CompiledDateRule {
                        selector,
                        source: rule.source,
                    })
            })
            .collect();

        Self {
            inner: std::sync::Arc::new(Compiled {
                title: compile(TITLE_SELECTORS),
                date,
                content: compile(CONTENT_SELECTORS),
                content_noise: compile(CONTENT_NOISE),
                body: compile(&["body"]),
                body_noise: compile(BODY_NOISE),
            }),
        }
    }

    pub fn extract_title(&self, document: &Html) -> Option<String> {
        self.inner.title.iter().find_map(|selector| {
            let element = document.select(selector).next()?;
            non_empty(element.text().collect::<String>().trim())
        })
    }

    pub fn extract_date(&self, document: &Html) -> Option<String> {
        self.inner.date.iter().find_map(|rule| {
            let element = document.select(&rule.selector).next()?;
            let attr = |name| element.value().attr(name).and_then(non_empty);
            match rule.source {
                DateSource::MetaContent => attr("content"),
                DateSource::AttributeOrText => attr("datetime")
                    .or_else(|| attr("content"))
                    .or_else(|| non_empty(element.text().collect::<String>().trim())),
            }
        })
    }

    pub fn extract_content(&self, document: &Html) -> Option<String> {
        let from_candidates = self.inner.content.iter().find_map(|selector| {
            let element = document.select(selector).next()?;
            accept_content(clean_text(element, &self.inner.content_noise))
        });

        from_candidates.or_else(|| {
            tracing::debug!("No content candidate qualified, falling back to <body>");
            self.inner.body.iter().find_map(|selector| {
                let body = document.select(selector).next()?;
                accept_content(clean_text(body, &self.inner.body_noise))
            })
        })
    }
}

impl Default for SelectorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ArticleExtractor for SelectorExtractor {
    fn extract(&self, html: &str, url: &str) -> ParsedArticle {
        let document = Html::parse_document(html);

        let article = ParsedArticle {
            date: self.extract_date(&document),
            title: self.extract_title(&document),
            content: self.extract_content(&document),
        };

        tracing::info!(
            url,
            title = article.title.is_some(),
            date = article.date.is_some(),
            content_chars = article.content.as_deref().map_or(0, |c| c.chars().count()),
            "Extracted article"
        );

        article
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn accept_content(text: String) -> Option<String> {
    (text.chars().count() > MIN_CONTENT_CHARS).then_some(text)
}

/// Concatenated, trimmed text of `root`, skipping every descendant matched by `noise`.
fn clean_text(root: ElementRef<'_>, noise: &[Selector]) -> String {
    let excluded: HashSet<_> = noise
        .iter()
        .flat_map(|selector| root.select(selector))
        .map(|element| element.id())
        .collect();

    let mut text = String::new();
    for node in root.descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        if node.ancestors().any(|a| excluded.contains(&a.id())) {
            continue;
        }
        text.push_str(fragment);
    }

    text.trim().to_string()
}
