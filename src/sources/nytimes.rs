use crate::fetcher::ApiClient;
use crate::sources::{apply_author_filter, clean_author, compact_date, image_or_placeholder};
use crate::traits::NewsAdapter;
use crate::types::{Article, FilterCriteria, NewsError, Result, SourceId};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use url::Url;

const NYT_TOP_STORIES_URL: &str = "https://api.nytimes.com/svc/topstories/v2";
const NYT_ARTICLE_SEARCH_URL: &str = "https://api.nytimes.com/svc/search/v2/articlesearch.json";
const NYT_MEDIA_BASE: &str = "https://www.nytimes.com/";
const PROVIDER: &str = "The New York Times";

#[derive(Debug, Deserialize)]
struct TopStoriesEnvelope {
    status: Option<String>,
    results: Option<Vec<TopStory>>,
}

#[derive(Debug, Deserialize)]
struct TopStory {
    uri: Option<String>,
    url: Option<String>,
    title: Option<String>,
    #[serde(rename = "abstract")]
    summary: Option<String>,
    byline: Option<String>,
    published_date: Option<String>,
    multimedia: Option<Vec<NytMedia>>,
}

#[derive(Debug, Deserialize)]
struct ArticleSearchEnvelope {
    status: Option<String>,
    response: Option<ArticleSearchBody>,
}

#[derive(Debug, Deserialize)]
struct ArticleSearchBody {
    docs: Option<Vec<SearchDoc>>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    #[serde(rename = "_id")]
    id: Option<String>,
    web_url: Option<String>,
    snippet: Option<String>,
    #[serde(rename = "abstract")]
    summary: Option<String>,
    headline: Option<SearchHeadline>,
    pub_date: Option<String>,
    byline: Option<SearchByline>,
    multimedia: Option<Vec<NytMedia>>,
}

#[derive(Debug, Deserialize)]
struct SearchHeadline {
    main: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchByline {
    original: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NytMedia {
    url: Option<String>,
}

/// New York Times adapter. Browsing goes to Top Stories; date-driven
/// searches go to Article Search with its compact `YYYYMMDD` dates and
/// different envelope. Keyword look-ups are not wired for this provider,
/// so a keyword search yields nothing here without a network call.
pub struct NyTimesSource {
    client: Arc<ApiClient>,
    api_key: String,
}

impl NyTimesSource {
    pub fn new(client: Arc<ApiClient>, api_key: String) -> Self {
        Self { client, api_key }
    }

    fn search_params(&self, filters: &FilterCriteria) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(section) = &filters.category {
            params.push(("fq", format!("section_name:(\"{}\")", capitalize(section))));
        }
        if let Some(from) = filters.from_date {
            params.push(("begin_date", compact_date(from)));
        }
        if let Some(to) = filters.to_date {
            params.push(("end_date", compact_date(to)));
        }
        params.push(("sort", "newest".to_string()));
        params.push(("api-key", self.api_key.clone()));
        params
    }

    fn check_status(status: Option<String>) -> Result<()> {
        match status {
            Some(s) if !s.eq_ignore_ascii_case("ok") => Err(NewsError::Api {
                provider: PROVIDER,
                message: format!("status {}", s),
            }),
            _ => Ok(()),
        }
    }

    fn normalize_top_stories(raw: Vec<TopStory>) -> Vec<Article> {
        let source = SourceId::NyTimes.info();
        raw.into_iter()
            .filter_map(|story| {
                let url = story.url.filter(|u| !u.trim().is_empty())?;
                let published_at = story.published_date.filter(|p| !p.trim().is_empty())?;
                let title = story.title.filter(|t| !t.trim().is_empty())?;

                Some(Article {
                    id: story
                        .uri
                        .filter(|u| !u.trim().is_empty())
                        .unwrap_or_else(|| url.clone()),
                    source: source.clone(),
                    title,
                    description: story.summary.unwrap_or_default(),
                    url,
                    image_url: image_or_placeholder(first_media_url(story.multimedia)),
                    published_at,
                    author: clean_author(story.byline.as_deref()),
                })
            })
            .collect()
    }

    fn normalize_search_docs(raw: Vec<SearchDoc>) -> Vec<Article> {
        let source = SourceId::NyTimes.info();
        raw.into_iter()
            .filter_map(|doc| {
                let url = doc.web_url.filter(|u| !u.trim().is_empty())?;
                let published_at = doc.pub_date.filter(|p| !p.trim().is_empty())?;
                let title = doc
                    .headline
                    .and_then(|h| h.main)
                    .filter(|t| !t.trim().is_empty())?;

                let description = doc
                    .snippet
                    .filter(|s| !s.trim().is_empty())
                    .or(doc.summary)
                    .unwrap_or_default();

                Some(Article {
                    id: doc
                        .id
                        .filter(|i| !i.trim().is_empty())
                        .unwrap_or_else(|| url.clone()),
                    source: source.clone(),
                    title,
                    description,
                    url,
                    image_url: image_or_placeholder(first_media_url(doc.multimedia)),
                    published_at,
                    author: clean_author(doc.byline.and_then(|b| b.original).as_deref()),
                })
            })
            .collect()
    }
}

#[async_trait]
impl NewsAdapter for NyTimesSource {
    fn source_id(&self) -> SourceId {
        SourceId::NyTimes
    }

    async fn fetch_by_search(&self, filters: &FilterCriteria) -> Result<Vec<Article>> {
        if filters.query.is_some() {
            debug!("NYT adapter skips keyword searches");
            return Ok(Vec::new());
        }

        let envelope: ArticleSearchEnvelope = self
            .client
            .get_json(PROVIDER, NYT_ARTICLE_SEARCH_URL, &self.search_params(filters))
            .await?;
        Self::check_status(envelope.status)?;

        let docs = envelope.response.and_then(|r| r.docs).unwrap_or_default();
        debug!("NYT article search returned {} docs", docs.len());
        Ok(apply_author_filter(
            Self::normalize_search_docs(docs),
            filters.author.as_deref(),
        ))
    }

    async fn fetch_by_topic(&self, category: Option<&str>) -> Result<Vec<Article>> {
        let section = category
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "home".to_string());
        let url = format!("{}/{}.json", NYT_TOP_STORIES_URL, section);
        let params = vec![("api-key", self.api_key.clone())];

        let envelope: TopStoriesEnvelope = self.client.get_json(PROVIDER, &url, &params).await?;
        Self::check_status(envelope.status)?;

        let results = envelope.results.unwrap_or_default();
        debug!("NYT top stories returned {} results", results.len());
        Ok(Self::normalize_top_stories(results))
    }
}

/// Article Search media URLs come back site-relative; Top Stories URLs are
/// already absolute. Joining against the site base handles both.
fn first_media_url(media: Option<Vec<NytMedia>>) -> Option<String> {
    let raw = media?
        .into_iter()
        .find_map(|m| m.url.filter(|u| !u.trim().is_empty()))?;
    Url::parse(NYT_MEDIA_BASE)
        .and_then(|base| base.join(&raw))
        .map(|joined| joined.to_string())
        .ok()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
