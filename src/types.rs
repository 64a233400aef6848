use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Substituted whenever a provider delivers no usable image URL.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/440x220?text=No+Image";

/// Identifier for one of the supported news providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    NewsApi,
    Guardian,
    NyTimes,
}

impl SourceId {
    /// Canonical tag used in persisted records and CLI flags.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::NewsApi => "newsapi",
            SourceId::Guardian => "guardian",
            SourceId::NyTimes => "nytimes",
        }
    }

    /// Human-readable name shown wherever the source is rendered.
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceId::NewsApi => "NewsAPI",
            SourceId::Guardian => "The Guardian",
            SourceId::NyTimes => "The New York Times",
        }
    }

    pub fn all() -> Vec<SourceId> {
        vec![SourceId::NewsApi, SourceId::Guardian, SourceId::NyTimes]
    }

    pub fn info(&self) -> SourceInfo {
        SourceInfo {
            id: *self,
            name: self.display_name().to_string(),
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SourceId {
    type Err = NewsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "newsapi" => Ok(SourceId::NewsApi),
            "guardian" => Ok(SourceId::Guardian),
            "nytimes" => Ok(SourceId::NyTimes),
            other => Err(NewsError::UnknownSource(other.to_string())),
        }
    }
}

/// Provenance attached to every normalized article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub id: SourceId,
    pub name: String,
}

/// Normalized article shape shared by every provider.
///
/// `published_at` stays the ISO-8601 string the provider delivered; it is
/// parsed only when two articles are compared for ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub source: SourceInfo,
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: String,
    pub published_at: String,
    pub author: Option<String>,
}

/// Active filter criteria. All fields optional; blank means unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterCriteria {
    pub query: Option<String>,
    pub category: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub author: Option<String>,
}

impl FilterCriteria {
    /// True when the criteria call for the search endpoints instead of the
    /// listing endpoints. A category alone still counts as browsing.
    pub fn is_searching(&self) -> bool {
        self.query.is_some() || self.from_date.is_some() || self.to_date.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_none()
            && self.category.is_none()
            && self.from_date.is_none()
            && self.to_date.is_none()
            && self.author.is_none()
    }
}

/// Color scheme flag, persisted across sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{provider} API error: {message}")]
    Api {
        provider: &'static str,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing API key: set {0}")]
    MissingApiKey(&'static str),

    #[error("Unknown source: {0}")]
    UnknownSource(String),

    #[error("Aggregation failed: {0}")]
    Aggregation(String),
}

pub type Result<T> = std::result::Result<T, NewsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_id_round_trips_through_tag() {
        for id in SourceId::all() {
            assert_eq!(id.as_str().parse::<SourceId>().unwrap(), id);
        }
    }

    #[test]
    fn source_id_parse_is_case_insensitive() {
        assert_eq!("NewsAPI".parse::<SourceId>().unwrap(), SourceId::NewsApi);
        assert_eq!(" Guardian ".parse::<SourceId>().unwrap(), SourceId::Guardian);
    }

    #[test]
    fn source_id_rejects_unknown_tag() {
        assert!(matches!(
            "reuters".parse::<SourceId>(),
            Err(NewsError::UnknownSource(_))
        ));
    }

    #[test]
    fn display_names_match_canonical_table() {
        assert_eq!(SourceId::NewsApi.display_name(), "NewsAPI");
        assert_eq!(SourceId::Guardian.display_name(), "The Guardian");
        assert_eq!(SourceId::NyTimes.display_name(), "The New York Times");
    }

    #[test]
    fn category_alone_is_browsing() {
        let filters = FilterCriteria {
            category: Some("business".to_string()),
            ..Default::default()
        };
        assert!(!filters.is_searching());
    }

    #[test]
    fn any_of_query_or_dates_is_searching() {
        let query = FilterCriteria {
            query: Some("rust".to_string()),
            ..Default::default()
        };
        let from = FilterCriteria {
            from_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        let to = FilterCriteria {
            to_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            ..Default::default()
        };
        assert!(query.is_searching());
        assert!(from.is_searching());
        assert!(to.is_searching());
        assert!(!FilterCriteria::default().is_searching());
    }

    #[test]
    fn theme_toggles_and_defaults_to_light() {
        assert_eq!(Theme::default(), Theme::Light);
        assert_eq!(Theme::Light.toggle(), Theme::Dark);
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
    }
}
