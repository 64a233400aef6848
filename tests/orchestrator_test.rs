mod common;

use common::{article, MockSource};
use news_aggregator::{FilterCriteria, NewsAggregator, NewsError, NewsOrchestrator, SourceId};
use std::sync::Arc;
use std::sync::Once;
use std::time::Duration;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .try_init()
            .ok();
    });
}

#[tokio::test]
async fn identical_queries_inside_the_window_reuse_the_cache() {
    init_tracing();

    let mock = Arc::new(MockSource::with_articles(
        SourceId::Guardian,
        vec![article(SourceId::Guardian, "g1", "2024-03-01T10:00:00Z")],
    ));
    let orchestrator = NewsOrchestrator::new(NewsAggregator::new(vec![mock.clone()]));
    let filters = FilterCriteria::default();

    let first = orchestrator
        .fetch(&[SourceId::Guardian], &filters)
        .await
        .unwrap();
    let second = orchestrator
        .fetch(&[SourceId::Guardian], &filters)
        .await
        .unwrap();

    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(first.articles, second.articles);
    assert_eq!(mock.total_calls(), 1);
}

#[tokio::test]
async fn changing_any_filter_field_issues_new_calls() {
    init_tracing();

    let mock = Arc::new(MockSource::with_articles(
        SourceId::Guardian,
        vec![article(SourceId::Guardian, "g1", "2024-03-01T10:00:00Z")],
    ));
    let orchestrator = NewsOrchestrator::new(NewsAggregator::new(vec![mock.clone()]));

    orchestrator
        .fetch(&[SourceId::Guardian], &FilterCriteria::default())
        .await
        .unwrap();

    let changed = FilterCriteria {
        category: Some("sport".to_string()),
        ..Default::default()
    };
    let result = orchestrator
        .fetch(&[SourceId::Guardian], &changed)
        .await
        .unwrap();

    assert!(!result.from_cache);
    assert_eq!(mock.total_calls(), 2);
}

#[tokio::test]
async fn selection_order_and_duplicates_share_one_cache_entry() {
    init_tracing();

    let newsapi = Arc::new(MockSource::with_articles(
        SourceId::NewsApi,
        vec![article(SourceId::NewsApi, "n1", "2024-03-01T10:00:00Z")],
    ));
    let guardian = Arc::new(MockSource::with_articles(
        SourceId::Guardian,
        vec![article(SourceId::Guardian, "g1", "2024-03-01T11:00:00Z")],
    ));
    let orchestrator =
        NewsOrchestrator::new(NewsAggregator::new(vec![newsapi.clone(), guardian.clone()]));
    let filters = FilterCriteria::default();

    orchestrator
        .fetch(&[SourceId::Guardian, SourceId::NewsApi], &filters)
        .await
        .unwrap();
    let second = orchestrator
        .fetch(
            &[SourceId::NewsApi, SourceId::Guardian, SourceId::NewsApi],
            &filters,
        )
        .await
        .unwrap();

    assert!(second.from_cache);
    assert_eq!(newsapi.total_calls(), 1);
    assert_eq!(guardian.total_calls(), 1);
}

#[tokio::test]
async fn empty_selection_queries_every_source() {
    init_tracing();

    let newsapi = Arc::new(MockSource::with_articles(
        SourceId::NewsApi,
        vec![article(SourceId::NewsApi, "n1", "2024-03-01T10:00:00Z")],
    ));
    let guardian = Arc::new(MockSource::with_articles(
        SourceId::Guardian,
        vec![article(SourceId::Guardian, "g1", "2024-03-01T11:00:00Z")],
    ));
    let nytimes = Arc::new(MockSource::with_articles(
        SourceId::NyTimes,
        vec![article(SourceId::NyTimes, "t1", "2024-03-01T12:00:00Z")],
    ));
    let orchestrator = NewsOrchestrator::new(NewsAggregator::new(vec![
        newsapi.clone(),
        guardian.clone(),
        nytimes.clone(),
    ]));

    let combined = orchestrator
        .fetch(&[], &FilterCriteria::default())
        .await
        .unwrap();

    assert_eq!(combined.articles.len(), 3);
    assert!(combined.failed_sources.is_empty());
    assert!(!combined.has_partial_data);
    assert_eq!(newsapi.total_calls(), 1);
    assert_eq!(guardian.total_calls(), 1);
    assert_eq!(nytimes.total_calls(), 1);
}

#[tokio::test]
async fn a_failing_source_is_reported_and_flagged_partial() {
    init_tracing();

    let newsapi = Arc::new(MockSource::with_articles(
        SourceId::NewsApi,
        vec![article(SourceId::NewsApi, "n1", "2024-03-01T10:00:00Z")],
    ));
    let guardian = Arc::new(MockSource::failing(SourceId::Guardian));
    let nytimes = Arc::new(MockSource::with_articles(
        SourceId::NyTimes,
        vec![article(SourceId::NyTimes, "t1", "2024-03-01T12:00:00Z")],
    ));
    let orchestrator = NewsOrchestrator::new(NewsAggregator::new(vec![
        newsapi, guardian, nytimes,
    ]));

    let combined = orchestrator
        .fetch(&[], &FilterCriteria::default())
        .await
        .unwrap();

    assert_eq!(combined.articles.len(), 2);
    assert_eq!(combined.failed_sources, vec![SourceId::Guardian]);
    assert!(combined.has_partial_data);
}

#[tokio::test]
async fn a_source_with_zero_articles_is_not_a_failure() {
    init_tracing();

    let newsapi = Arc::new(MockSource::with_articles(
        SourceId::NewsApi,
        vec![article(SourceId::NewsApi, "n1", "2024-03-01T10:00:00Z")],
    ));
    let guardian = Arc::new(MockSource::with_articles(SourceId::Guardian, Vec::new()));
    let orchestrator = NewsOrchestrator::new(NewsAggregator::new(vec![newsapi, guardian]));

    let combined = orchestrator
        .fetch(&[SourceId::NewsApi, SourceId::Guardian], &FilterCriteria::default())
        .await
        .unwrap();

    // Empty-but-successful is not an outage and raises no partial warning.
    assert_eq!(combined.articles.len(), 1);
    assert!(combined.failed_sources.is_empty());
    assert!(!combined.has_partial_data);
}

#[tokio::test]
async fn an_entirely_failed_query_is_empty_but_not_an_error() {
    init_tracing();

    let orchestrator = NewsOrchestrator::new(NewsAggregator::new(vec![
        Arc::new(MockSource::failing(SourceId::NewsApi)),
        Arc::new(MockSource::failing(SourceId::Guardian)),
        Arc::new(MockSource::failing(SourceId::NyTimes)),
    ]));

    let combined = orchestrator
        .fetch(&[], &FilterCriteria::default())
        .await
        .unwrap();

    assert!(combined.articles.is_empty());
    assert_eq!(combined.failed_sources, SourceId::all());
    assert!(!combined.has_partial_data);
}

#[tokio::test]
async fn a_panicking_merge_surfaces_as_an_aggregation_error() {
    init_tracing();

    let orchestrator = NewsOrchestrator::new(NewsAggregator::new(vec![Arc::new(
        MockSource::panicking(SourceId::Guardian),
    )]));

    let err = orchestrator
        .fetch(&[SourceId::Guardian], &FilterCriteria::default())
        .await
        .unwrap_err();
    assert!(matches!(err, NewsError::Aggregation(_)));
}

#[tokio::test]
async fn an_expired_window_refetches() {
    init_tracing();

    let mock = Arc::new(MockSource::with_articles(
        SourceId::Guardian,
        vec![article(SourceId::Guardian, "g1", "2024-03-01T10:00:00Z")],
    ));
    let orchestrator = NewsOrchestrator::with_freshness(
        NewsAggregator::new(vec![mock.clone()]),
        Duration::from_millis(1),
    );
    let filters = FilterCriteria::default();

    orchestrator
        .fetch(&[SourceId::Guardian], &filters)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    let second = orchestrator
        .fetch(&[SourceId::Guardian], &filters)
        .await
        .unwrap();

    assert!(!second.from_cache);
    assert_eq!(mock.total_calls(), 2);
}

#[tokio::test]
async fn invalidate_drops_cached_results() {
    init_tracing();

    let mock = Arc::new(MockSource::with_articles(
        SourceId::Guardian,
        vec![article(SourceId::Guardian, "g1", "2024-03-01T10:00:00Z")],
    ));
    let orchestrator = NewsOrchestrator::new(NewsAggregator::new(vec![mock.clone()]));
    let filters = FilterCriteria::default();

    orchestrator
        .fetch(&[SourceId::Guardian], &filters)
        .await
        .unwrap();
    orchestrator.invalidate().await;
    let second = orchestrator
        .fetch(&[SourceId::Guardian], &filters)
        .await
        .unwrap();

    assert!(!second.from_cache);
    assert_eq!(mock.total_calls(), 2);
}
