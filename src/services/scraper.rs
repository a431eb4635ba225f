use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::errors::{AppError, AppResult};

/// Article text is capped here before it reaches the prompt builder, to
/// stay within the model's input token limits.
pub const MAX_ARTICLE_CHARS: usize = 8000;

const HTTP_USER_AGENT: &str = "wikiquiz-server/0.1 (+educational)";

/// Sections after which Wikipedia articles carry no quizzable prose.
const STOP_HEADINGS: [&str; 5] = [
    "references",
    "external links",
    "see also",
    "notes",
    "further reading",
];

static CITATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\d+\]").expect("CITATION_RE is a valid regex pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedArticle {
    pub title: String,
    pub text: String,
}

#[async_trait]
pub trait ArticleScraper: Send + Sync {
    async fn fetch_and_clean(&self, url: &str) -> AppResult<ScrapedArticle>;
}

pub struct WikipediaScraper {
    http: reqwest::Client,
}

impl WikipediaScraper {
    pub fn new() -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(HTTP_USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| AppError::InternalError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http })
    }
}

#[async_trait]
impl ArticleScraper for WikipediaScraper {
    async fn fetch_and_clean(&self, url: &str) -> AppResult<ScrapedArticle> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::ScrapeFailed(e.to_string()))?;

        let html = response
            .text()
            .await
            .map_err(|e| AppError::ScrapeFailed(e.to_string()))?;

        clean_article(&html)
    }
}

/// Reduces a Wikipedia page to (title, readable prose): paragraphs and
/// top-level list items from the article body, stopping before the
/// references/navigation tail. Tables, infoboxes and citation markers
/// never reach the output.
pub fn clean_article(html: &str) -> AppResult<ScrapedArticle> {
    let document = Html::parse_document(html);

    let title = extract_title(&document)
        .ok_or_else(|| AppError::ScrapeFailed("page has no recognizable title".to_string()))?;

    let content = select_first(&document, "#mw-content-text .mw-parser-output")
        .or_else(|| select_first(&document, "body"))
        .ok_or_else(|| AppError::ScrapeFailed("page has no article body".to_string()))?;

    let mut parts: Vec<String> = Vec::new();
    for node in content.children().filter_map(ElementRef::wrap) {
        match node.value().name() {
            "p" => {
                let text = element_text(&node);
                if !text.is_empty() {
                    parts.push(text);
                }
            }
            "ul" | "ol" => {
                let items: Vec<String> = node
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|li| li.value().name() == "li")
                    .map(|li| element_text(&li))
                    .filter(|text| !text.is_empty())
                    .map(|text| format!("\u{2022} {text}"))
                    .collect();
                if !items.is_empty() {
                    parts.push(items.join("\n"));
                }
            }
            "h2" | "h3" => {
                let heading = element_text(&node).to_lowercase();
                if STOP_HEADINGS.iter().any(|stop| heading.contains(stop)) {
                    break;
                }
            }
            _ => {}
        }
    }

    if parts.is_empty() {
        return Err(AppError::ScrapeFailed(
            "no readable paragraphs in article body".to_string(),
        ));
    }

    let mut text = parts.join("\n\n");
    let total_chars = text.chars().count();
    if total_chars > MAX_ARTICLE_CHARS {
        log::warn!("Article text truncated from {total_chars} to {MAX_ARTICLE_CHARS} chars");
        text = text.chars().take(MAX_ARTICLE_CHARS).collect();
    }

    Ok(ScrapedArticle { title, text })
}

fn extract_title(document: &Html) -> Option<String> {
    if let Some(heading) = select_first(document, "h1#firstHeading") {
        let title = element_text(&heading);
        if !title.is_empty() {
            return Some(title);
        }
    }

    let page_title = select_first(document, "title")?;
    let title = element_text(&page_title);
    let title = title
        .strip_suffix(" - Wikipedia")
        .unwrap_or(&title)
        .trim()
        .to_string();
    (!title.is_empty()).then_some(title)
}

fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}

/// Flattened element text with citation markers removed and whitespace
/// collapsed.
fn element_text(element: &ElementRef) -> String {
    let raw = element.text().collect::<Vec<_>>().join(" ");
    let without_citations = CITATION_RE.replace_all(&raw, "");
    without_citations
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
