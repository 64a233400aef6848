use crate::store::{PreferenceStore, UserPreferences};
use crate::types::{FilterCriteria, SourceId, Theme};
use chrono::NaiveDate;
use tracing::warn;

/// Session state shared by the presentation layer: selected sources,
/// active filter criteria, and the color scheme.
///
/// Filters and source selection are ephemeral. Only preferences and the
/// theme persist, through `PreferenceStore`.
#[derive(Debug, Clone)]
pub struct AppState {
    sources: Vec<SourceId>,
    filters: FilterCriteria,
    theme: Theme,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            sources: SourceId::all(),
            filters: FilterCriteria::default(),
            theme: Theme::default(),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build session state from the store: the stored theme always
    /// applies, the stored preferences only when the apply-immediately
    /// flag is set. Store failures degrade to the defaults.
    pub fn from_store(store: &PreferenceStore) -> Self {
        let mut state = Self::new();

        match store.load_theme() {
            Ok(theme) => state.theme = theme,
            Err(e) => warn!("Could not load stored theme: {}", e),
        }

        match store.load_apply_immediately() {
            Ok(true) => match store.load_preferences() {
                Ok(Some(prefs)) => state.apply_preferences(&prefs),
                Ok(None) => {}
                Err(e) => warn!("Could not load stored preferences: {}", e),
            },
            Ok(false) => {}
            Err(e) => warn!("Could not load apply-immediately flag: {}", e),
        }

        state
    }

    pub fn sources(&self) -> &[SourceId] {
        &self.sources
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Deselecting everything falls back to all sources.
    pub fn set_sources(&mut self, mut sources: Vec<SourceId>) {
        sources.sort();
        sources.dedup();
        self.sources = if sources.is_empty() {
            SourceId::all()
        } else {
            sources
        };
    }

    pub fn set_query(&mut self, query: Option<String>) {
        self.filters.query = normalize_text(query);
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.filters.category = normalize_text(category);
    }

    pub fn set_date_range(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.filters.from_date = from;
        self.filters.to_date = to;
    }

    pub fn set_author(&mut self, author: Option<String>) {
        self.filters.author = normalize_text(author);
    }

    pub fn reset_filters(&mut self) {
        self.filters = FilterCriteria::default();
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggle();
        self.theme
    }

    /// Map a stored preference record onto the session: preferred sources
    /// replace the selection, the author filter becomes the author
    /// criterion, and the first preferred category becomes the category
    /// criterion. Unknown source tags are skipped with a warning.
    pub fn apply_preferences(&mut self, prefs: &UserPreferences) {
        let mut sources = Vec::new();
        for tag in &prefs.sources {
            match tag.parse::<SourceId>() {
                Ok(id) => sources.push(id),
                Err(_) => warn!("Ignoring unknown source tag in preferences: {}", tag),
            }
        }
        self.set_sources(sources);
        self.set_author(Some(prefs.author_filter.clone()));
        self.set_category(prefs.categories.first().cloned());
    }
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_all_sources_and_light_theme() {
        let state = AppState::new();
        assert_eq!(state.sources(), SourceId::all());
        assert_eq!(state.theme(), Theme::Light);
        assert!(state.filters().is_empty());
    }

    #[test]
    fn deselecting_every_source_falls_back_to_all() {
        let mut state = AppState::new();
        state.set_sources(vec![SourceId::Guardian]);
        assert_eq!(state.sources(), [SourceId::Guardian]);

        state.set_sources(Vec::new());
        assert_eq!(state.sources(), SourceId::all());
    }

    #[test]
    fn blank_text_criteria_normalize_to_none() {
        let mut state = AppState::new();
        state.set_query(Some("  ".to_string()));
        state.set_author(Some(String::new()));
        assert_eq!(state.filters().query, None);
        assert_eq!(state.filters().author, None);

        state.set_query(Some(" rust ".to_string()));
        assert_eq!(state.filters().query.as_deref(), Some("rust"));
    }

    #[test]
    fn reset_clears_every_criterion() {
        let mut state = AppState::new();
        state.set_query(Some("rust".to_string()));
        state.set_category(Some("technology".to_string()));
        state.set_date_range(NaiveDate::from_ymd_opt(2024, 3, 1), None);
        state.reset_filters();
        assert!(state.filters().is_empty());
    }

    #[test]
    fn preferences_map_onto_sources_author_and_category() {
        let mut state = AppState::new();
        let prefs = UserPreferences {
            categories: vec!["business".to_string(), "sport".to_string()],
            author_filter: "Jane Doe".to_string(),
            sources: vec!["guardian".to_string(), "bogus".to_string()],
        };
        state.apply_preferences(&prefs);

        assert_eq!(state.sources(), [SourceId::Guardian]);
        assert_eq!(state.filters().author.as_deref(), Some("Jane Doe"));
        assert_eq!(state.filters().category.as_deref(), Some("business"));
    }

    #[test]
    fn empty_preference_record_resets_to_defaults() {
        let mut state = AppState::new();
        state.set_author(Some("Someone".to_string()));
        state.apply_preferences(&UserPreferences::default());

        assert_eq!(state.sources(), SourceId::all());
        assert_eq!(state.filters().author, None);
        assert_eq!(state.filters().category, None);
    }

    #[test]
    fn theme_toggle_flips_and_reports() {
        let mut state = AppState::new();
        assert_eq!(state.toggle_theme(), Theme::Dark);
        assert_eq!(state.toggle_theme(), Theme::Light);
    }
}
