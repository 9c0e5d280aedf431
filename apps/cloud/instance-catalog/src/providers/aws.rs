//! AWS Price List client
//!
//! Walks the public bulk price list in three steps:
//! price index -> service region index -> regional price document.
//! https://docs.aws.amazon.com/awsaccountbilling/latest/aboutv2/using-ppslong.html

use async_trait::async_trait;
use domain_pricing::{PriceDocument, PriceIndex, RegionIndex};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use super::{CatalogSource, ProviderError, ProviderResult};
use crate::config::PriceListConfig;

/// AWS Pricing API base URL
pub const DEFAULT_BASE_URL: &str = "https://pricing.us-east-1.amazonaws.com";
pub const DEFAULT_INDEX_PATH: &str = "/offers/v1.0/aws/index.json";
pub const DEFAULT_SERVICE_CODE: &str = "AmazonEC2";

pub const INDEX_FILE: &str = "ec2-price-index.json";
pub const REGION_INDEX_FILE: &str = "ec2-price-region-index.json";
pub const PRICE_FILE: &str = "ec2-price.json";

/// One of the three documents fetched per run
#[derive(Debug, Clone, Copy)]
struct Document {
    label: &'static str,
    tee_file: &'static str,
}

const PRICE_INDEX: Document = Document {
    label: "price index",
    tee_file: INDEX_FILE,
};
const REGION_INDEX: Document = Document {
    label: "region index",
    tee_file: REGION_INDEX_FILE,
};
const PRICE_DOCUMENT: Document = Document {
    label: "price document",
    tee_file: PRICE_FILE,
};

/// Client for the AWS bulk price list
pub struct AwsPriceListClient {
    client: Client,
    base_url: String,
    index_path: String,
    service_code: String,
    tee_dir: Option<PathBuf>,
}

impl AwsPriceListClient {
    pub fn new(config: &PriceListConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(config.http.timeout)
            .read_timeout(config.http.read_timeout)
            .connect_timeout(config.http.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            index_path: config.index_path.clone(),
            service_code: config.service_code.clone(),
            tee_dir: config.tee_dir.clone(),
        })
    }

    /// Catalog documents reference each other by host-relative paths.
    fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    async fn get_document<T: DeserializeOwned>(
        &self,
        path: &str,
        document: Document,
    ) -> ProviderResult<T> {
        let url = self.resolve(path);
        debug!(url = %url, document = document.label, "Fetching price list document");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        info!(
            document = document.label,
            bytes = bytes.len(),
            "Downloaded price list document"
        );

        if let Some(dir) = &self.tee_dir {
            write_tee(&dir.join(document.tee_file), &bytes).await?;
        }

        serde_json::from_slice(&bytes).map_err(|source| ProviderError::ParseError {
            document: document.label,
            source,
        })
    }
}

async fn write_tee(path: &Path, bytes: &[u8]) -> ProviderResult<()> {
    let io_err = |source: std::io::Error| ProviderError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    tokio::fs::write(path, bytes).await.map_err(io_err)?;

    info!(path = %path.display(), "wrote {}", path.display());
    Ok(())
}

#[async_trait]
impl CatalogSource for AwsPriceListClient {
    fn name(&self) -> &'static str {
        "aws-price-list"
    }

    #[instrument(skip(self), fields(service = %self.service_code))]
    async fn fetch_catalog(&self, region: &str) -> ProviderResult<PriceDocument> {
        let index: PriceIndex = self.get_document(&self.index_path, PRICE_INDEX).await?;

        let region_index_url = index
            .offers
            .get(&self.service_code)
            .map(|offer| offer.current_region_index_url.as_str())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ProviderError::MissingOffer(self.service_code.clone()))?;

        let region_index: RegionIndex = self.get_document(region_index_url, REGION_INDEX).await?;

        let version_url = region_index
            .regions
            .get(region)
            .map(|entry| entry.current_version_url.as_str())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ProviderError::MissingRegion(region.to_string()))?;

        let document: PriceDocument = self.get_document(version_url, PRICE_DOCUMENT).await?;

        info!(
            publication_date = %document.publication_date,
            products = document.products.len(),
            "Fetched price document"
        );

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Mock, ServerGuard};
    use serde_json::json;

    const REGION_INDEX_PATH: &str = "/offers/v1.0/aws/AmazonEC2/current/region_index.json";
    const US_EAST_PATH: &str = "/offers/v1.0/aws/AmazonEC2/20240101000000/us-east-1/index.json";

    fn client_for(server: &ServerGuard, tee_dir: Option<PathBuf>) -> AwsPriceListClient {
        let config = PriceListConfig {
            base_url: server.url(),
            tee_dir,
            ..PriceListConfig::default()
        };
        AwsPriceListClient::new(&config).unwrap()
    }

    async fn mock_json(server: &mut ServerGuard, path: &str, body: serde_json::Value) -> Mock {
        server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    async fn mock_index(server: &mut ServerGuard) -> Mock {
        mock_json(
            server,
            DEFAULT_INDEX_PATH,
            json!({
                "formatVersion": "v1.0",
                "offers": {
                    "AmazonEC2": {
                        "offerCode": "AmazonEC2",
                        "currentRegionIndexUrl": REGION_INDEX_PATH
                    }
                }
            }),
        )
        .await
    }

    async fn mock_region_index(server: &mut ServerGuard) -> Mock {
        mock_json(
            server,
            REGION_INDEX_PATH,
            json!({
                "regions": {
                    "us-east-1": {
                        "regionCode": "us-east-1",
                        "currentVersionUrl": US_EAST_PATH
                    }
                }
            }),
        )
        .await
    }

    async fn mock_prices(server: &mut ServerGuard) -> Mock {
        mock_json(
            server,
            US_EAST_PATH,
            json!({
                "offerCode": "AmazonEC2",
                "publicationDate": "2024-01-01T00:00:00Z",
                "products": {
                    "SKU1": {
                        "sku": "SKU1",
                        "attributes": { "instanceType": "m5.large" }
                    }
                },
                "terms": { "OnDemand": {}, "Reserved": {} }
            }),
        )
        .await
    }

    #[tokio::test]
    async fn test_fetch_catalog_follows_index_chain() {
        let mut server = mockito::Server::new_async().await;
        let index = mock_index(&mut server).await;
        let region_index = mock_region_index(&mut server).await;
        let prices = mock_prices(&mut server).await;

        let client = client_for(&server, None);
        let doc = client.fetch_catalog("us-east-1").await.unwrap();

        assert_eq!(doc.publication_date, "2024-01-01T00:00:00Z");
        assert_eq!(doc.products["SKU1"].attributes.instance_type, "m5.large");

        index.assert_async().await;
        region_index.assert_async().await;
        prices.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_fatal_with_body() {
        let mut server = mockito::Server::new_async().await;
        let _index = server
            .mock("GET", DEFAULT_INDEX_PATH)
            .with_status(503)
            .with_body("SlowDown")
            .create_async()
            .await;

        let client = client_for(&server, None);
        let err = client.fetch_catalog("us-east-1").await.unwrap_err();

        match &err {
            ProviderError::Status { status, body, .. } => {
                assert_eq!(*status, 503);
                assert_eq!(body, "SlowDown");
            }
            other => panic!("expected status error, got {other:?}"),
        }
        assert!(err.to_string().contains("SlowDown"));
    }

    #[tokio::test]
    async fn test_unknown_region_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _index = mock_index(&mut server).await;
        let _region_index = mock_region_index(&mut server).await;

        let client = client_for(&server, None);
        let err = client.fetch_catalog("mars-north-1").await.unwrap_err();

        assert!(matches!(err, ProviderError::MissingRegion(ref r) if r == "mars-north-1"));
    }

    #[tokio::test]
    async fn test_missing_service_offer_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _index = mock_json(&mut server, DEFAULT_INDEX_PATH, json!({ "offers": {} })).await;

        let client = client_for(&server, None);
        let err = client.fetch_catalog("us-east-1").await.unwrap_err();

        assert!(matches!(err, ProviderError::MissingOffer(ref s) if s == "AmazonEC2"));
    }

    #[tokio::test]
    async fn test_malformed_document_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _index = server
            .mock("GET", DEFAULT_INDEX_PATH)
            .with_status(200)
            .with_body("{ not json")
            .create_async()
            .await;

        let client = client_for(&server, None);
        let err = client.fetch_catalog("us-east-1").await.unwrap_err();

        assert!(matches!(
            err,
            ProviderError::ParseError {
                document: "price index",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_tee_writes_raw_documents() {
        let mut server = mockito::Server::new_async().await;
        let _index = mock_index(&mut server).await;
        let _region_index = mock_region_index(&mut server).await;
        let _prices = mock_prices(&mut server).await;

        let dir = tempfile::tempdir().unwrap();
        let client = client_for(&server, Some(dir.path().to_path_buf()));

        client.fetch_catalog("us-east-1").await.unwrap();

        for file in [INDEX_FILE, REGION_INDEX_FILE, PRICE_FILE] {
            let path = dir.path().join(file);
            let raw = std::fs::read_to_string(&path).unwrap();
            let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
            assert!(value.is_object(), "{file} should hold the raw JSON document");
        }

        let raw_prices = std::fs::read_to_string(dir.path().join(PRICE_FILE)).unwrap();
        assert!(raw_prices.contains("m5.large"));
    }

    #[test]
    fn test_resolve_relative_and_absolute_urls() {
        let config = PriceListConfig {
            base_url: "https://pricing.example.com/".to_string(),
            ..PriceListConfig::default()
        };
        let client = AwsPriceListClient::new(&config).unwrap();

        assert_eq!(
            client.resolve("/offers/v1.0/aws/index.json"),
            "https://pricing.example.com/offers/v1.0/aws/index.json"
        );
        assert_eq!(
            client.resolve("https://mirror.example.com/index.json"),
            "https://mirror.example.com/index.json"
        );
    }
}
