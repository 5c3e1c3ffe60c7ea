//! HTTP client for the bio.agents registry API.
//!
//! Requests are issued strictly one after another; a paginated listing
//! waits for each page before asking for the next.

use crate::registry::types::{ListingPage, RawRecord};
use crate::registry::{FetchProgress, RegistryFilter};
use crate::types::{BioAgentsError, Result};
use crate::utils::toml_config::RegistryConfig;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Default registry API root.
pub const DEFAULT_REGISTRY_URL: &str = "https://bio.agents/api";

/// Client for the bio.agents registry.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl RegistryClient {
    /// Create a client for the given API root (e.g. `https://bio.agents/api`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err(|e| {
            BioAgentsError::Configuration(format!("Invalid registry URL '{}': {}", base_url, e))
        })?;
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BioAgentsError::Configuration(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Create a client from the `[registry]` configuration section.
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// API root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch agents one by one, in the order given.
    ///
    /// The first failing request aborts the whole fetch.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn fetch_by_id<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<RawRecord>> {
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            let url = self.record_url(id.as_ref())?;
            let record: RawRecord = self.get_json(url).await?;
            debug!(id = %record.bioagents_id, "Fetched agent");
            records.push(record);
        }
        info!(count = records.len(), "Agents fetched");
        Ok(records)
    }

    /// Read a JSON array of agent ids from disk and fetch each of them.
    pub async fn fetch_from_list_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<RawRecord>> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let ids: Vec<String> = serde_json::from_str(&content).map_err(|e| {
            BioAgentsError::Configuration(format!(
                "Agent list {} is not a JSON array of ids: {}",
                path.display(),
                e
            ))
        })?;
        self.fetch_by_id(&ids).await
    }

    /// Fetch every agent matching `filter`, following `next` links until
    /// the registry stops sending one.
    #[instrument(skip(self, progress))]
    pub async fn fetch_by_filter(
        &self,
        filter: &RegistryFilter,
        progress: &dyn FetchProgress,
    ) -> Result<Vec<RawRecord>> {
        let listing = self.listing_url(filter)?;
        let mut url = listing.clone();
        let mut records = Vec::new();
        let mut page_no = 0;

        loop {
            let page: ListingPage = self.get_json(url).await?;
            page_no += 1;
            debug!(
                page = page_no,
                records = page.list.len(),
                total = ?page.count,
                "Fetched listing page"
            );
            progress.page_fetched(page_no, page.list.len());
            records.extend(page.list);

            match page.next.as_deref().filter(|n| !n.is_empty()) {
                Some(next) => url = next_page_url(&listing, next)?,
                None => break,
            }
        }

        progress.finished(records.len());
        info!(pages = page_no, count = records.len(), "Agents fetched");
        Ok(records)
    }

    fn record_url(&self, id: &str) -> Result<Url> {
        let mut url = self.endpoint(id)?;
        url.query_pairs_mut().append_pair("format", "json");
        Ok(url)
    }

    fn listing_url(&self, filter: &RegistryFilter) -> Result<Url> {
        let mut url = self.endpoint("t")?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(domain) = filter.domain.as_deref().filter(|d| !d.is_empty()) {
                query.append_pair("domain", domain);
            }
            if let Some(topic) = filter.topic.as_deref().filter(|t| !t.is_empty()) {
                query.append_pair("topicID", &format!("\"{}\"", topic));
            }
            query.append_pair("format", "json");
        }
        Ok(url)
    }

    fn endpoint(&self, segment: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                BioAgentsError::Configuration(format!(
                    "Registry URL {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| BioAgentsError::Transport(format!("{}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(BioAgentsError::Network {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| BioAgentsError::Transport(format!("{}: {}", url, e)))?;

        serde_json::from_str(&body)
            .map_err(|e| BioAgentsError::MalformedResponse(format!("{}: {}", url, e)))
    }
}

/// Merge the query pairs of a continuation token (`?page=2`, or a full
/// URL) into the listing URL, keeping the original filter.
fn next_page_url(listing: &Url, next: &str) -> Result<Url> {
    let token = listing
        .join(next)
        .map_err(|e| BioAgentsError::MalformedResponse(format!("Bad next link '{}': {}", next, e)))?;

    let mut pairs: Vec<(String, String)> = listing
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    for (key, value) in token.query_pairs() {
        match pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value.into_owned(),
            None => pairs.push((key.into_owned(), value.into_owned())),
        }
    }

    let mut url = listing.clone();
    url.query_pairs_mut().clear().extend_pairs(pairs);
    Ok(url)
}
