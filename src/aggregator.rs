use crate::config::ApiKeys;
use crate::sources;
use crate::traits::NewsAdapter;
use crate::types::{Article, FilterCriteria, SourceId};
use chrono::DateTime;
use futures::future::join_all;
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of one fan-out: the merged list plus the sources whose fetch
/// failed outright. A source that succeeded with zero articles appears in
/// neither.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOutcome {
    pub articles: Vec<Article>,
    pub failed_sources: Vec<SourceId>,
}

/// Fans one request out to every selected provider and merges the results.
pub struct NewsAggregator {
    adapters: Vec<Arc<dyn NewsAdapter>>,
}

impl NewsAggregator {
    pub fn new(adapters: Vec<Arc<dyn NewsAdapter>>) -> Self {
        Self { adapters }
    }

    pub fn with_default_sources(keys: &ApiKeys) -> Self {
        Self::new(sources::default_adapters(keys))
    }

    pub fn adapter_count(&self) -> usize {
        self.adapters.len()
    }

    /// Fetch from every selected source concurrently and merge.
    ///
    /// A failing source logs a warning, contributes nothing, and is recorded
    /// in `failed_sources`; the other sources are unaffected. The merge
    /// itself cannot fail, and an empty list is a valid outcome.
    pub async fn aggregate(
        &self,
        selected: &[SourceId],
        filters: &FilterCriteria,
    ) -> AggregateOutcome {
        let searching = filters.is_searching();

        let futures = self
            .adapters
            .iter()
            .filter(|adapter| selected.contains(&adapter.source_id()))
            .map(|adapter| {
                let adapter = Arc::clone(adapter);
                let filters = filters.clone();
                async move {
                    let source = adapter.source_id();
                    let outcome = if searching {
                        adapter.fetch_by_search(&filters).await
                    } else {
                        adapter.fetch_by_topic(filters.category.as_deref()).await
                    };
                    (source, outcome)
                }
            });

        // join_all keeps registration order, so the concatenation is the
        // same no matter which request settles first.
        let mut articles = Vec::new();
        let mut failed_sources = Vec::new();
        for (source, outcome) in join_all(futures).await {
            match outcome {
                Ok(list) => {
                    debug!("{} contributed {} articles", source, list.len());
                    articles.extend(list);
                }
                Err(e) => {
                    warn!("{} fetch failed: {}", source, e);
                    failed_sources.push(source);
                }
            }
        }

        failed_sources.sort();
        sort_by_published_desc(&mut articles);
        AggregateOutcome {
            articles,
            failed_sources,
        }
    }
}

/// Stable descending sort on the publication timestamp. Each string is
/// parsed once; anything unparsable sinks to the end, and ties keep their
/// concatenation order.
pub fn sort_by_published_desc(articles: &mut [Article]) {
    articles.sort_by_cached_key(|article| Reverse(published_ts(&article.published_at)));
}

// Providers disagree on offset spelling: `Z`, `+05:00`, and the NYT's
// colonless `+0000` all appear.
fn published_ts(raw: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
        .map(|dt| dt.timestamp())
}
