//! bio.agents registry access.
//!
//! Agents can be fetched by explicit id list, or through the paginated
//! listing endpoint filtered by domain or EDAM topic:
//!
//! ```ignore
//! let client = RegistryClient::new("https://bio.agents/api", Duration::from_secs(60))?;
//! let agents = client
//!     .fetch_by_filter(&RegistryFilter::topic("topic_3538"), &NoProgress)
//!     .await?;
//! ```

pub mod client;
pub mod types;

pub use client::{RegistryClient, DEFAULT_REGISTRY_URL};
pub use types::{RawFunction, RawParameter, RawRecord, RawTerm};

/// Filter for the listing endpoint. An empty filter lists the whole
/// registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryFilter {
    pub domain: Option<String>,
    pub topic: Option<String>,
}

impl RegistryFilter {
    /// Agents of a bio.agents domain (e.g. `proteomics`).
    pub fn domain(name: impl Into<String>) -> Self {
        Self {
            domain: Some(name.into()),
            topic: None,
        }
    }

    /// Agents annotated with an EDAM topic (e.g. `topic_3538`).
    pub fn topic(id: impl Into<String>) -> Self {
        Self {
            domain: None,
            topic: Some(id.into()),
        }
    }
}

/// Observer for paginated fetches.
pub trait FetchProgress {
    /// Called once per page, after it has been decoded.
    fn page_fetched(&self, page: usize, records: usize);

    /// Called once when the last page has been fetched.
    fn finished(&self, _total: usize) {}
}

/// Progress observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl FetchProgress for NoProgress {
    fn page_fetched(&self, _page: usize, _records: usize) {}
}
