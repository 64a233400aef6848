use crate::types::{NewsError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const USER_AGENT: &str = "news-aggregator/0.1";

/// Thin wrapper around a shared `reqwest::Client` used by every adapter.
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    pub fn new() -> Self {
        // No explicit timeout; the transport default applies.
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Issue a GET with the given query pairs and decode the JSON body.
    ///
    /// Non-2xx statuses become `NewsError::Api` before the body is decoded.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        provider: &'static str,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        debug!("GET {}", url);

        let response = self.client.get(url).query(params).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!("{} responded HTTP {} for {}", provider, status.as_u16(), url);
            return Err(NewsError::Api {
                provider,
                message: format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            });
        }

        let body = response.text().await?;
        let decoded = serde_json::from_str(&body)?;
        Ok(decoded)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
