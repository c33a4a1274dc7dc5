//! HTTP client for the select handler

use super::index::SearchIndex;
use super::models::{SelectPage, SelectRequest, SelectResponse};
use crate::config::SourceConfig;
use crate::domain::{IcesiumError, Result, SearchIndexError};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use url::Url;

/// Select-handler client over HTTP
///
/// # Example
///
/// ```no_run
/// use icesium::adapters::solr::{SearchIndex, SelectRequest, SolrClient};
/// use icesium::config::SourceConfig;
///
/// # async fn example() -> icesium::domain::Result<()> {
/// let client = SolrClient::new(&SourceConfig::default())?;
/// let page = client
///     .select(&SelectRequest {
///         query: "*:*".to_string(),
///         filter: None,
///         sort: None,
///         fields: vec!["id".to_string()],
///         start: 0,
///         rows: 10,
///     })
///     .await?;
/// println!("{} matches", page.num_found);
/// # Ok(())
/// # }
/// ```
pub struct SolrClient {
    select_url: Url,
    client: Client,
}

impl SolrClient {
    /// Create a client for the configured index
    ///
    /// The select URL is `select_path` resolved against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL cannot be built, or if the
    /// HTTP client cannot be initialized.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let select_url = Url::parse(&config.base_url)
            .and_then(|base| base.join(&config.select_path))
            .map_err(|e| {
                IcesiumError::Configuration(format!(
                    "Invalid search index URL {}{}: {}",
                    config.base_url, config.select_path, e
                ))
            })?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()
            .map_err(|e| {
                IcesiumError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self { select_url, client })
    }
}

#[async_trait]
impl SearchIndex for SolrClient {
    async fn select(&self, request: &SelectRequest) -> Result<SelectPage> {
        let params = request.to_params();

        tracing::debug!(
            url = %self.select_url,
            start = request.start,
            rows = request.rows,
            filter = request.filter.as_deref().unwrap_or(""),
            "Requesting page"
        );

        let response = self
            .client
            .get(self.select_url.clone())
            .header(ACCEPT, "application/json")
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchIndexError::Timeout(e.to_string())
                } else {
                    SearchIndexError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchIndexError::QueryFailed {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchIndexError::InvalidResponse(e.to_string()))?;

        let parsed: SelectResponse = serde_json::from_str(&body)
            .map_err(|e| SearchIndexError::InvalidResponse(e.to_string()))?;

        Ok(parsed.into())
    }

    fn endpoint(&self) -> &str {
        self.select_url.as_str()
    }
}
