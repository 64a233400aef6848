pub mod aggregator;
pub mod config;
pub mod fetcher;
pub mod orchestrator;
pub mod sources;
pub mod state;
pub mod store;
pub mod traits;
pub mod types;

pub use aggregator::{AggregateOutcome, NewsAggregator};
pub use config::ApiKeys;
pub use fetcher::ApiClient;
pub use orchestrator::{CombinedNews, NewsOrchestrator, FRESHNESS_WINDOW};
pub use sources::{GuardianSource, NewsApiSource, NyTimesSource};
pub use state::AppState;
pub use store::{PreferenceStore, UserPreferences};
pub use traits::NewsAdapter;
pub use types::*;
