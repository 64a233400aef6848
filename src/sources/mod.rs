pub mod guardian;
pub mod news_api;
pub mod nytimes;

pub use guardian::GuardianSource;
pub use news_api::NewsApiSource;
pub use nytimes::NyTimesSource;

use crate::config::ApiKeys;
use crate::fetcher::ApiClient;
use crate::traits::NewsAdapter;
use crate::types::{Article, PLACEHOLDER_IMAGE_URL};
use chrono::NaiveDate;
use std::sync::Arc;

/// Build the full adapter set backed by one shared HTTP client.
pub fn default_adapters(keys: &ApiKeys) -> Vec<Arc<dyn NewsAdapter>> {
    let client = Arc::new(ApiClient::new());
    vec![
        Arc::new(NewsApiSource::new(Arc::clone(&client), keys.newsapi.clone())),
        Arc::new(GuardianSource::new(Arc::clone(&client), keys.guardian.clone())),
        Arc::new(NyTimesSource::new(client, keys.nytimes.clone())),
    ]
}

/// `2024-03-01` - the date encoding NewsAPI and the Guardian accept.
pub(crate) fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `20240301` - the compact encoding the NYT Article Search API accepts.
pub(crate) fn compact_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Strip the generic "By " byline prefix; an empty remainder means no author.
pub(crate) fn clean_author(raw: Option<&str>) -> Option<String> {
    // Trim the leading side only: a byline of exactly "By " must keep its
    // trailing space for the prefix match, so it strips to nothing.
    let raw = raw?.trim_start();
    let stripped = raw
        .strip_prefix("By ")
        .or_else(|| raw.strip_prefix("by "))
        .unwrap_or(raw)
        .trim();
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

/// Provider image when present and non-empty, placeholder otherwise.
pub(crate) fn image_or_placeholder(url: Option<String>) -> String {
    match url {
        Some(u) if !u.trim().is_empty() => u,
        _ => PLACEHOLDER_IMAGE_URL.to_string(),
    }
}

/// Case-insensitive substring match on the author field.
///
/// No provider accepts an author parameter, so search results are filtered
/// after normalization; articles without an author never match.
pub(crate) fn apply_author_filter(articles: Vec<Article>, author: Option<&str>) -> Vec<Article> {
    let needle = match author.map(str::trim).filter(|a| !a.is_empty()) {
        Some(a) => a.to_lowercase(),
        None => return articles,
    };

    articles
        .into_iter()
        .filter(|article| {
            article
                .author
                .as_deref()
                .map(|a| a.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
        .collect()
}
