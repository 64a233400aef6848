use crate::types::{Result, Theme};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::info;

pub const PREFERENCES_KEY: &str = "user_preferences";
pub const APPLY_IMMEDIATELY_KEY: &str = "apply_immediately";
pub const THEME_KEY: &str = "theme";

/// Stored user preference record. Serialized camelCase, matching the
/// records written by earlier releases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub author_filter: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

/// On-disk shape, including the retired plural `authors` field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPreferences {
    #[serde(default)]
    categories: Vec<String>,
    author_filter: Option<String>,
    authors: Option<Vec<String>>,
    #[serde(default)]
    sources: Vec<String>,
}

/// Key-value store holding one JSON file per fixed key. Reads happen on
/// demand; writes only on explicit save actions.
pub struct PreferenceStore {
    dir: PathBuf,
}

impl PreferenceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the platform data directory.
    pub fn open_default() -> Result<Self> {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("news-aggregator");
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn read_key<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_key<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let raw = serde_json::to_string_pretty(value)?;
        fs::write(self.path_for(key), raw)?;
        Ok(())
    }

    /// Load the stored preference record, migrating the retired plural
    /// `authors` field to `authorFilter` (first entry wins). The migrated
    /// record is written back, so the legacy field disappears after one
    /// load. When both fields are present the singular one wins and the
    /// record is left alone.
    pub fn load_preferences(&self) -> Result<Option<UserPreferences>> {
        let stored = match self.read_key::<StoredPreferences>(PREFERENCES_KEY)? {
            Some(stored) => stored,
            None => return Ok(None),
        };

        let legacy = stored.author_filter.is_none() && stored.authors.is_some();
        let author_filter = stored
            .author_filter
            .or_else(|| stored.authors.and_then(|authors| authors.into_iter().next()))
            .unwrap_or_default();

        let prefs = UserPreferences {
            categories: stored.categories,
            author_filter,
            sources: stored.sources,
        };

        if legacy {
            info!("Migrating legacy authors field to authorFilter");
            self.save_preferences(&prefs)?;
        }

        Ok(Some(prefs))
    }

    pub fn save_preferences(&self, prefs: &UserPreferences) -> Result<()> {
        self.write_key(PREFERENCES_KEY, prefs)
    }

    pub fn clear_preferences(&self) -> Result<()> {
        match fs::remove_file(self.path_for(PREFERENCES_KEY)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Absent flag reads as false.
    pub fn load_apply_immediately(&self) -> Result<bool> {
        Ok(self.read_key(APPLY_IMMEDIATELY_KEY)?.unwrap_or(false))
    }

    pub fn save_apply_immediately(&self, apply: bool) -> Result<()> {
        self.write_key(APPLY_IMMEDIATELY_KEY, &apply)
    }

    /// Absent theme reads as the default (light).
    pub fn load_theme(&self) -> Result<Theme> {
        Ok(self.read_key(THEME_KEY)?.unwrap_or_default())
    }

    pub fn save_theme(&self, theme: Theme) -> Result<()> {
        self.write_key(THEME_KEY, &theme)
    }
}
