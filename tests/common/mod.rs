// Shared canned adapter and fixtures for the aggregation tests.
use async_trait::async_trait;
use news_aggregator::{
    Article, FilterCriteria, NewsAdapter, NewsError, Result, SourceId, PLACEHOLDER_IMAGE_URL,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Canned adapter standing in for one provider.
pub struct MockSource {
    id: SourceId,
    articles: Vec<Article>,
    fail: bool,
    panic_on_fetch: bool,
    search_calls: AtomicUsize,
    topic_calls: AtomicUsize,
}

impl MockSource {
    pub fn with_articles(id: SourceId, articles: Vec<Article>) -> Self {
        Self {
            id,
            articles,
            fail: false,
            panic_on_fetch: false,
            search_calls: AtomicUsize::new(0),
            topic_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(id: SourceId) -> Self {
        let mut source = Self::with_articles(id, Vec::new());
        source.fail = true;
        source
    }

    /// Panics inside the fetch, to exercise the aggregation task failing
    /// as a whole rather than one source erroring.
    pub fn panicking(id: SourceId) -> Self {
        let mut source = Self::with_articles(id, Vec::new());
        source.panic_on_fetch = true;
        source
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn topic_calls(&self) -> usize {
        self.topic_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.search_calls() + self.topic_calls()
    }

    fn respond(&self) -> Result<Vec<Article>> {
        if self.panic_on_fetch {
            panic!("mock source asked to panic");
        }
        if self.fail {
            return Err(NewsError::Api {
                provider: self.id.display_name(),
                message: "mock failure".to_string(),
            });
        }
        Ok(self.articles.clone())
    }
}

#[async_trait]
impl NewsAdapter for MockSource {
    fn source_id(&self) -> SourceId {
        self.id
    }

    async fn fetch_by_search(&self, _filters: &FilterCriteria) -> Result<Vec<Article>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.respond()
    }

    async fn fetch_by_topic(&self, _category: Option<&str>) -> Result<Vec<Article>> {
        self.topic_calls.fetch_add(1, Ordering::SeqCst);
        self.respond()
    }
}

pub fn article(source: SourceId, id: &str, published_at: &str) -> Article {
    Article {
        id: id.to_string(),
        source: source.info(),
        title: format!("Title {}", id),
        description: format!("Description {}", id),
        url: format!("https://example.com/{}", id),
        image_url: PLACEHOLDER_IMAGE_URL.to_string(),
        published_at: published_at.to_string(),
        author: Some("Jane Doe".to_string()),
    }
}
