use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use news_aggregator::{
    ApiKeys, AppState, CombinedNews, NewsAggregator, NewsOrchestrator, PreferenceStore, SourceId,
    UserPreferences,
};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "news-aggregator",
    about = "One merged news list from NewsAPI, The Guardian and The New York Times",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Browse top articles, optionally within a category
    Top {
        #[arg(long)]
        category: Option<String>,
        /// Comma-separated source tags (newsapi, guardian, nytimes)
        #[arg(long, value_delimiter = ',')]
        sources: Vec<SourceId>,
    },
    /// Search articles by keyword, date range and author
    Search {
        /// Keyword to search for
        query: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Earliest publication date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest publication date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Keep only articles whose author matches this text
        #[arg(long)]
        author: Option<String>,
        /// Comma-separated source tags (newsapi, guardian, nytimes)
        #[arg(long, value_delimiter = ',')]
        sources: Vec<SourceId>,
    },
    /// List the available sources
    Sources,
    /// Show or change stored preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
    /// Toggle the color scheme and persist it
    Theme,
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Print the stored preference record
    Show,
    /// Replace the stored preference record
    Save {
        /// Preferred categories, comma-separated
        #[arg(long, value_delimiter = ',')]
        categories: Vec<String>,
        /// Preferred author filter text
        #[arg(long, default_value = "")]
        author: String,
        /// Preferred source tags, comma-separated
        #[arg(long, value_delimiter = ',')]
        sources: Vec<SourceId>,
        /// Apply the stored preferences on every startup
        #[arg(long)]
        apply_immediately: bool,
    },
    /// Delete the stored preference record
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let store = PreferenceStore::open_default().context("opening preference store")?;

    match cli.command {
        Command::Top { category, sources } => {
            let mut state = AppState::from_store(&store);
            if category.is_some() {
                state.set_category(category);
            }
            if !sources.is_empty() {
                state.set_sources(sources);
            }
            run_query(&state).await?;
        }
        Command::Search {
            query,
            category,
            from,
            to,
            author,
            sources,
        } => {
            let mut state = AppState::from_store(&store);
            state.set_query(query);
            if category.is_some() {
                state.set_category(category);
            }
            if from.is_some() || to.is_some() {
                state.set_date_range(from, to);
            }
            if author.is_some() {
                state.set_author(author);
            }
            if !sources.is_empty() {
                state.set_sources(sources);
            }
            run_query(&state).await?;
        }
        Command::Sources => {
            for id in SourceId::all() {
                println!("{:<10}{}", id.as_str(), id.display_name());
            }
        }
        Command::Prefs { action } => run_prefs(&store, action)?,
        Command::Theme => {
            let mut state = AppState::from_store(&store);
            let theme = state.toggle_theme();
            store.save_theme(theme)?;
            println!("Theme is now {}.", theme);
        }
    }

    Ok(())
}

async fn run_query(state: &AppState) -> anyhow::Result<()> {
    let keys = ApiKeys::from_env().context("reading API keys from the environment")?;
    let orchestrator = NewsOrchestrator::new(NewsAggregator::with_default_sources(&keys));

    info!("Theme: {}", state.theme());
    let combined = orchestrator
        .fetch(state.sources(), state.filters())
        .await
        .context("news fetch failed, run the command again to retry")?;

    render(&combined);
    Ok(())
}

fn render(combined: &CombinedNews) {
    if combined.articles.is_empty() {
        println!("No articles found.");
        return;
    }

    for article in &combined.articles {
        println!(
            "{}  [{}]  {}",
            article.published_at, article.source.name, article.title
        );
        if let Some(author) = &article.author {
            println!("    by {}", author);
        }
        if !article.description.is_empty() {
            println!("    {}", article.description);
        }
        println!("    {}", article.url);
    }

    println!();
    println!("{} articles.", combined.articles.len());

    if combined.has_partial_data {
        let names: Vec<&str> = combined
            .failed_sources
            .iter()
            .map(|s| s.display_name())
            .collect();
        println!(
            "Warning: {} failed. Showing what the other sources returned.",
            names.join(", ")
        );
    }
}

fn run_prefs(store: &PreferenceStore, action: PrefsAction) -> anyhow::Result<()> {
    match action {
        PrefsAction::Show => {
            match store.load_preferences()? {
                Some(prefs) => {
                    println!("categories:        {}", prefs.categories.join(", "));
                    println!("author filter:     {}", prefs.author_filter);
                    println!("sources:           {}", prefs.sources.join(", "));
                }
                None => println!("No stored preferences."),
            }
            println!("apply immediately: {}", store.load_apply_immediately()?);
            println!("theme:             {}", store.load_theme()?);
        }
        PrefsAction::Save {
            categories,
            author,
            sources,
            apply_immediately,
        } => {
            let prefs = UserPreferences {
                categories,
                author_filter: author,
                sources: sources.iter().map(|s| s.as_str().to_string()).collect(),
            };
            store.save_preferences(&prefs)?;
            store.save_apply_immediately(apply_immediately)?;
            println!("Preferences saved.");
        }
        PrefsAction::Clear => {
            store.clear_preferences()?;
            println!("Preferences cleared.");
        }
    }
    Ok(())
}
