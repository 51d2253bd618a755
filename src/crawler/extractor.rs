//! SEO record extraction from fetched pages

use crate::crawler::fetcher::Document;
use crate::SeoError;
use scraper::{Html, Selector};
use serde::Serialize;

/// SEO data collected for one visited page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeoRecord {
    /// Response URL (after redirects)
    pub url: String,

    /// Text of the first `<title>`
    pub title: String,

    /// Text of the first `<h1>`
    pub h1: String,

    /// `content` of the first `<meta name="description...">`
    pub meta_description: String,

    /// HTTP status code of the response
    pub status_code: u16,
}

/// Builds an [`SeoRecord`] from a fetched page
pub trait RecordExtractor: Send + Sync {
    fn extract(&self, document: &Document) -> Result<SeoRecord, SeoError>;
}

/// [`RecordExtractor`] reading the page with CSS selectors
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRecordExtractor;

impl RecordExtractor for HtmlRecordExtractor {
    fn extract(&self, document: &Document) -> Result<SeoRecord, SeoError> {
        let failure = |message: String| SeoError::Extract {
            url: document.url.clone(),
            message,
        };

        if document.body.trim().is_empty() {
            return Err(failure("empty document".to_string()));
        }

        let html = Html::parse_document(&document.body);

        Ok(SeoRecord {
            url: document.url.clone(),
            title: first_text(&html, "title").map_err(failure)?,
            h1: first_text(&html, "h1").map_err(failure)?,
            meta_description: first_attr(&html, "meta[name^=description]", "content")
                .map_err(failure)?,
            status_code: document.status,
        })
    }
}

/// Trimmed text of the first element matching `css`, empty if none
fn first_text(html: &Html, css: &str) -> Result<String, String> {
    let selector = Selector::parse(css).map_err(|e| format!("Bad selector {}: {}", css, e))?;

    Ok(html
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default())
}

/// Attribute `attr` of the first element matching `css`, empty if none
fn first_attr(html: &Html, css: &str, attr: &str) -> Result<String, String> {
    let selector = Selector::parse(css).map_err(|e| format!("Bad selector {}: {}", css, e))?;

    Ok(html
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .unwrap_or_default())
}
