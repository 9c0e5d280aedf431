//! Price catalog sources
//!
//! A source turns a region name into the raw price document for that region.
//! The only production source walks the public AWS price list.

pub mod aws;

use async_trait::async_trait;
use domain_pricing::PriceDocument;
use std::path::PathBuf;
use thiserror::Error;

pub use aws::AwsPriceListClient;

/// Error type for catalog source operations
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("GET {url} returned status {status}\n{body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Failed to parse {document}: {source}")]
    ParseError {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Service offer '{0}' not found in the price index")]
    MissingOffer(String),

    #[error("Region '{0}' not found in the region index")]
    MissingRegion(String),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Source of a region's price document
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Fetch and decode the price document for a region
    async fn fetch_catalog(&self, region: &str) -> ProviderResult<PriceDocument>;
}
