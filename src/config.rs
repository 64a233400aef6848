use crate::types::{NewsError, Result};
use std::env;

pub const NEWSAPI_KEY_VAR: &str = "NEWSAPI_API_KEY";
pub const GUARDIAN_KEY_VAR: &str = "GUARDIAN_API_KEY";
pub const NYTIMES_KEY_VAR: &str = "NYTIMES_API_KEY";

/// API keys for the three providers, read from the environment.
#[derive(Debug, Clone)]
pub struct ApiKeys {
    pub newsapi: String,
    pub guardian: String,
    pub nytimes: String,
}

impl ApiKeys {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            newsapi: read_key(NEWSAPI_KEY_VAR)?,
            guardian: read_key(GUARDIAN_KEY_VAR)?,
            nytimes: read_key(NYTIMES_KEY_VAR)?,
        })
    }
}

fn read_key(var: &'static str) -> Result<String> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(NewsError::MissingApiKey(var)),
    }
}
