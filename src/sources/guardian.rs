use crate::fetcher::ApiClient;
use crate::sources::{apply_author_filter, clean_author, image_or_placeholder, iso_date};
use crate::traits::NewsAdapter;
use crate::types::{Article, FilterCriteria, NewsError, Result, SourceId};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

const GUARDIAN_SEARCH_URL: &str = "https://content.guardianapis.com/search";
const PROVIDER: &str = "The Guardian";
const SHOW_FIELDS: &str = "trailText,thumbnail,byline";

#[derive(Debug, Deserialize)]
struct GuardianEnvelope {
    response: GuardianResponse,
}

#[derive(Debug, Deserialize)]
struct GuardianResponse {
    status: String,
    message: Option<String>,
    results: Option<Vec<GuardianItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GuardianItem {
    id: String,
    web_title: Option<String>,
    web_url: Option<String>,
    web_publication_date: Option<String>,
    fields: Option<GuardianFields>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GuardianFields {
    trail_text: Option<String>,
    thumbnail: Option<String>,
    byline: Option<String>,
}

/// Guardian Open Platform adapter. One `/search` endpoint serves both
/// browsing and searching; keyword, section and date bounds combine as
/// independent parameters.
pub struct GuardianSource {
    client: Arc<ApiClient>,
    api_key: String,
}

impl GuardianSource {
    pub fn new(client: Arc<ApiClient>, api_key: String) -> Self {
        Self { client, api_key }
    }

    fn search_params(&self, filters: &FilterCriteria) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(query) = &filters.query {
            params.push(("q", query.clone()));
        }
        if let Some(section) = &filters.category {
            params.push(("section", section.clone()));
        }
        if let Some(from) = filters.from_date {
            params.push(("from-date", iso_date(from)));
        }
        if let Some(to) = filters.to_date {
            params.push(("to-date", iso_date(to)));
        }
        params.push(("show-fields", SHOW_FIELDS.to_string()));
        params.push(("api-key", self.api_key.clone()));
        params
    }

    async fn request(&self, params: &[(&str, String)]) -> Result<Vec<GuardianItem>> {
        let envelope: GuardianEnvelope = self
            .client
            .get_json(PROVIDER, GUARDIAN_SEARCH_URL, params)
            .await?;
        let response = envelope.response;

        if response.status != "ok" {
            return Err(NewsError::Api {
                provider: PROVIDER,
                message: response
                    .message
                    .unwrap_or_else(|| "Unknown error".to_string()),
            });
        }

        Ok(response.results.unwrap_or_default())
    }

    /// The trail text is optional on the wire, so the description may end
    /// up empty. Entries without a link, title or timestamp are skipped.
    fn normalize(raw: Vec<GuardianItem>) -> Vec<Article> {
        let source = SourceId::Guardian.info();
        raw.into_iter()
            .filter_map(|item| {
                let url = item.web_url.filter(|u| !u.trim().is_empty())?;
                let published_at = item
                    .web_publication_date
                    .filter(|p| !p.trim().is_empty())?;
                let title = item.web_title.filter(|t| !t.trim().is_empty())?;

                let fields = item.fields.unwrap_or(GuardianFields {
                    trail_text: None,
                    thumbnail: None,
                    byline: None,
                });
                let id = if item.id.trim().is_empty() {
                    url.clone()
                } else {
                    item.id
                };

                Some(Article {
                    id,
                    source: source.clone(),
                    title,
                    description: fields.trail_text.unwrap_or_default(),
                    url,
                    image_url: image_or_placeholder(fields.thumbnail),
                    published_at,
                    author: clean_author(fields.byline.as_deref()),
                })
            })
            .collect()
    }
}

#[async_trait]
impl NewsAdapter for GuardianSource {
    fn source_id(&self) -> SourceId {
        SourceId::Guardian
    }

    async fn fetch_by_search(&self, filters: &FilterCriteria) -> Result<Vec<Article>> {
        let raw = self.request(&self.search_params(filters)).await?;

        debug!("Guardian search returned {} raw results", raw.len());
        Ok(apply_author_filter(
            Self::normalize(raw),
            filters.author.as_deref(),
        ))
    }

    async fn fetch_by_topic(&self, category: Option<&str>) -> Result<Vec<Article>> {
        let filters = FilterCriteria {
            category: category.map(str::to_string),
            ..Default::default()
        };
        let raw = self.request(&self.search_params(&filters)).await?;

        debug!("Guardian listing returned {} raw results", raw.len());
        Ok(Self::normalize(raw))
    }
}
