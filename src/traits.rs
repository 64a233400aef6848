use crate::types::{Article, FilterCriteria, Result, SourceId};
use async_trait::async_trait;

/// Trait for fetching articles from one news provider.
///
/// Each adapter owns its provider's endpoints, parameter names, and response
/// envelope, and translates everything into the normalized `Article` shape.
#[async_trait]
pub trait NewsAdapter: Send + Sync {
    /// Which provider this adapter speaks for.
    fn source_id(&self) -> SourceId;

    /// Fetch articles for search intent (a keyword and/or a date range).
    ///
    /// Adapters route to their provider's search endpoint when a keyword is
    /// present and to the listing endpoint otherwise; a provider without
    /// keyword search returns an empty list without a network call.
    async fn fetch_by_search(&self, filters: &FilterCriteria) -> Result<Vec<Article>>;

    /// Fetch top articles for browsing intent, optionally within a category.
    async fn fetch_by_topic(&self, category: Option<&str>) -> Result<Vec<Article>>;
}
