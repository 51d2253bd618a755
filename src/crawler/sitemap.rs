//! Sitemap document classification
//!
//! A fetched sitemap lists its entries in `<loc>` elements. Entries whose URL
//! contains the sitemap marker are nested sitemaps to expand further; every
//! other entry is a page for the frontier.

use crate::crawler::fetcher::Document;
use crate::SeoError;
use scraper::{Html, Selector};

/// Default substring identifying a nested sitemap URL
pub const DEFAULT_SITEMAP_MARKER: &str = ".xml";

/// Entries of one sitemap document, split by kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    /// Child sitemap URLs to expand
    pub sitemaps: Vec<String>,

    /// Page URLs to add to the frontier
    pub pages: Vec<String>,
}

/// Splits a fetched sitemap document into child sitemaps and pages
pub trait DocumentClassifier: Send + Sync {
    fn classify(&self, document: &Document) -> Result<Classified, SeoError>;
}

/// [`DocumentClassifier`] for `<urlset>` / `<sitemapindex>` documents
#[derive(Debug, Clone)]
pub struct SitemapClassifier {
    marker: String,
}

impl SitemapClassifier {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl Default for SitemapClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_SITEMAP_MARKER)
    }
}

impl DocumentClassifier for SitemapClassifier {
    fn classify(&self, document: &Document) -> Result<Classified, SeoError> {
        let locations = extract_locations(&document.body).map_err(|message| {
            SeoError::Classify {
                url: document.url.clone(),
                message,
            }
        })?;

        Ok(split_by_marker(locations, &self.marker))
    }
}

/// Extracts the trimmed text of every `<loc>` entry in a sitemap
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Entries in document order, empty ones dropped
/// * `Err(String)` - The document is not a sitemap
pub fn extract_locations(xml: &str) -> Result<Vec<String>, String> {
    let document = Html::parse_document(xml);

    let root_selector =
        Selector::parse("urlset, sitemapindex").map_err(|e| format!("Bad selector: {}", e))?;
    if document.select(&root_selector).next().is_none() {
        return Err("no <urlset> or <sitemapindex> element".to_string());
    }

    let loc_selector = Selector::parse("loc").map_err(|e| format!("Bad selector: {}", e))?;
    let locations = document
        .select(&loc_selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect();

    Ok(locations)
}

/// Classifies each URL as a nested sitemap (contains `marker`) or a page
pub fn split_by_marker(urls: Vec<String>, marker: &str) -> Classified {
    let mut classified = Classified::default();

    for url in urls {
        if url.contains(marker) {
            tracing::debug!("Found sitemap: {}", url);
            classified.sitemaps.push(url);
        } else {
            classified.pages.push(url);
        }
    }

    classified
}
