use crate::aggregator::NewsAggregator;
use crate::types::{Article, FilterCriteria, NewsError, Result, SourceId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// How long a cached query result stays fresh.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Merged outcome of one query across the selected sources.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedNews {
    pub articles: Vec<Article>,
    pub failed_sources: Vec<SourceId>,
    pub has_partial_data: bool,
    pub from_cache: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct QueryKey {
    sources: Vec<SourceId>,
    filters: FilterCriteria,
}

struct CacheEntry {
    articles: Vec<Article>,
    failed_sources: Vec<SourceId>,
    has_partial_data: bool,
    fetched_at: Instant,
}

/// Runs queries against the aggregator, reusing fresh results for
/// identical `(sources, filters)` pairs.
pub struct NewsOrchestrator {
    aggregator: Arc<NewsAggregator>,
    cache: Arc<RwLock<HashMap<QueryKey, CacheEntry>>>,
    freshness: Duration,
}

impl NewsOrchestrator {
    pub fn new(aggregator: NewsAggregator) -> Self {
        Self::with_freshness(aggregator, FRESHNESS_WINDOW)
    }

    pub fn with_freshness(aggregator: NewsAggregator, freshness: Duration) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            cache: Arc::new(RwLock::new(HashMap::new())),
            freshness,
        }
    }

    /// Run one query: serve it from the cache while fresh, otherwise fan
    /// out, cache, and return.
    ///
    /// `Err` means the merge task itself failed. Per-source fetch failures
    /// never surface here; they are reflected in `failed_sources`.
    pub async fn fetch(
        &self,
        selected: &[SourceId],
        filters: &FilterCriteria,
    ) -> Result<CombinedNews> {
        let sources = normalize_selection(selected);
        let key = QueryKey {
            sources: sources.clone(),
            filters: filters.clone(),
        };

        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&key) {
                if entry.fetched_at.elapsed() <= self.freshness {
                    debug!("Serving query from cache");
                    return Ok(CombinedNews {
                        articles: entry.articles.clone(),
                        failed_sources: entry.failed_sources.clone(),
                        has_partial_data: entry.has_partial_data,
                        from_cache: true,
                    });
                }
            }
        }

        let aggregator = Arc::clone(&self.aggregator);
        let task_sources = sources.clone();
        let task_filters = filters.clone();
        let outcome =
            tokio::spawn(async move { aggregator.aggregate(&task_sources, &task_filters).await })
                .await
                .map_err(|e| NewsError::Aggregation(e.to_string()))?;

        let has_partial_data = !outcome.articles.is_empty()
            && !outcome.failed_sources.is_empty()
            && outcome.failed_sources.len() < sources.len();

        if !outcome.failed_sources.is_empty() {
            let names: Vec<&str> = outcome
                .failed_sources
                .iter()
                .map(|s| s.display_name())
                .collect();
            warn!("Sources failed: {}", names.join(", "));
        }

        {
            let mut cache = self.cache.write().await;
            cache.insert(
                key,
                CacheEntry {
                    articles: outcome.articles.clone(),
                    failed_sources: outcome.failed_sources.clone(),
                    has_partial_data,
                    fetched_at: Instant::now(),
                },
            );
        }

        info!("Query resolved with {} articles", outcome.articles.len());
        Ok(CombinedNews {
            articles: outcome.articles,
            failed_sources: outcome.failed_sources,
            has_partial_data,
            from_cache: false,
        })
    }

    /// Drop every cached result, forcing the next queries to refetch.
    pub async fn invalidate(&self) {
        self.cache.write().await.clear();
    }
}

/// Empty selection means every source. Order and duplicates do not affect
/// the merged result, so the selection is canonicalized for the cache key.
pub fn normalize_selection(selected: &[SourceId]) -> Vec<SourceId> {
    let mut sources = if selected.is_empty() {
        SourceId::all()
    } else {
        selected.to_vec()
    };
    sources.sort();
    sources.dedup();
    sources
}
