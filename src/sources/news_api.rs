//! NewsAPI.org adapter.
//!
//! https://newsapi.org/docs/endpoints/everything
//! https://newsapi.org/docs/endpoints/top-headlines

use crate::fetcher::ApiClient;
use crate::sources::{apply_author_filter, clean_author, image_or_placeholder, iso_date};
use crate::traits::NewsAdapter;
use crate::types::{Article, FilterCriteria, NewsError, Result, SourceId};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

const NEWSAPI_BASE_URL: &str = "https://newsapi.org/v2";
const PROVIDER: &str = "NewsAPI";

#[derive(Debug, Deserialize)]
struct NewsApiEnvelope {
    status: String,
    articles: Option<Vec<NewsApiArticle>>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "urlToImage")]
    url_to_image: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

/// NewsAPI.org adapter. Keyword searches run against `/everything`;
/// everything else is served by `/top-headlines`.
pub struct NewsApiSource {
    client: Arc<ApiClient>,
    api_key: String,
}

impl NewsApiSource {
    pub fn new(client: Arc<ApiClient>, api_key: String) -> Self {
        Self { client, api_key }
    }

    fn everything_params(&self, query: &str, filters: &FilterCriteria) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", query.to_string()),
            ("sortBy", "publishedAt".to_string()),
        ];
        if let Some(from) = filters.from_date {
            params.push(("from", iso_date(from)));
        }
        if let Some(to) = filters.to_date {
            params.push(("to", iso_date(to)));
        }
        params.push(("apiKey", self.api_key.clone()));
        params
    }

    fn headlines_params(&self, category: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![("country", "us".to_string())];
        if let Some(category) = category {
            params.push(("category", category.to_string()));
        }
        params.push(("apiKey", self.api_key.clone()));
        params
    }

    async fn request(&self, url: &str, params: &[(&str, String)]) -> Result<Vec<NewsApiArticle>> {
        let envelope: NewsApiEnvelope = self.client.get_json(PROVIDER, url, params).await?;

        if envelope.status != "ok" {
            return Err(NewsError::Api {
                provider: PROVIDER,
                message: format!(
                    "{}: {}",
                    envelope.code.unwrap_or_else(|| "unknown".to_string()),
                    envelope.message.unwrap_or_else(|| "Unknown error".to_string())
                ),
            });
        }

        Ok(envelope.articles.unwrap_or_default())
    }

    /// Drop entries with no link or timestamp, and entries empty of both
    /// title and description (the search index keeps removed articles
    /// around as husks). A missing title borrows the description so the
    /// rendered list never shows a blank headline.
    fn normalize(raw: Vec<NewsApiArticle>) -> Vec<Article> {
        let source = SourceId::NewsApi.info();
        raw.into_iter()
            .filter_map(|item| {
                let url = item.url.filter(|u| !u.trim().is_empty())?;
                let published_at = item.published_at.filter(|p| !p.trim().is_empty())?;

                let title = item.title.unwrap_or_default().trim().to_string();
                let description = item.description.unwrap_or_default().trim().to_string();
                if title.is_empty() && description.is_empty() {
                    return None;
                }
                let title = if title.is_empty() {
                    description.clone()
                } else {
                    title
                };

                Some(Article {
                    // NewsAPI has no article identifier of its own.
                    id: url.clone(),
                    source: source.clone(),
                    title,
                    description,
                    url,
                    image_url: image_or_placeholder(item.url_to_image),
                    published_at,
                    author: clean_author(item.author.as_deref()),
                })
            })
            .collect()
    }
}

#[async_trait]
impl NewsAdapter for NewsApiSource {
    fn source_id(&self) -> SourceId {
        SourceId::NewsApi
    }

    async fn fetch_by_search(&self, filters: &FilterCriteria) -> Result<Vec<Article>> {
        let raw = match filters.query.as_deref() {
            Some(query) => {
                let url = format!("{}/everything", NEWSAPI_BASE_URL);
                self.request(&url, &self.everything_params(query, filters)).await?
            }
            // Date-only searches fall back to the listing endpoint: the
            // everything endpoint requires a keyword, and top-headlines
            // accepts no date bounds, so the dates are dropped here.
            None => {
                let url = format!("{}/top-headlines", NEWSAPI_BASE_URL);
                self.request(&url, &self.headlines_params(filters.category.as_deref()))
                    .await?
            }
        };

        debug!("NewsAPI search returned {} raw articles", raw.len());
        Ok(apply_author_filter(
            Self::normalize(raw),
            filters.author.as_deref(),
        ))
    }

    async fn fetch_by_topic(&self, category: Option<&str>) -> Result<Vec<Article>> {
        let url = format!("{}/top-headlines", NEWSAPI_BASE_URL);
        let raw = self.request(&url, &self.headlines_params(category)).await?;

        debug!("NewsAPI headlines returned {} raw articles", raw.len());
        Ok(Self::normalize(raw))
    }
}
