//! Catalog Collector
//!
//! Fetches one region's price document and turns it into a sorted instance
//! table plus the family cross-check.

use chrono::{DateTime, Utc};
use domain_pricing::{
    CatalogSnapshot, FamilyCheck, NormalizeOptions, Normalizer, Taxonomy, check_families,
};
use eyre::{Result, WrapErr};
use tracing::{info, instrument, warn};

use crate::providers::CatalogSource;

/// Result of one collection run
#[derive(Debug, Clone)]
pub struct CatalogReport {
    pub region: String,
    pub snapshot: CatalogSnapshot,
    /// Discovered families looked up in the taxonomy, sorted by code
    pub checks: Vec<FamilyCheck>,
    pub duration_ms: u64,
    pub collected_at: DateTime<Utc>,
}

impl CatalogReport {
    pub fn missing_families(&self) -> impl Iterator<Item = &str> {
        self.checks
            .iter()
            .filter(|check| check.is_missing())
            .map(FamilyCheck::code)
    }
}

/// Drives a catalog source through normalization
pub struct CatalogCollector<S: CatalogSource> {
    source: S,
    taxonomy: Taxonomy,
    normalizer: Normalizer,
}

impl<S: CatalogSource> CatalogCollector<S> {
    pub fn new(source: S, taxonomy: Taxonomy, options: NormalizeOptions) -> Self {
        Self {
            source,
            taxonomy,
            normalizer: Normalizer::new(options),
        }
    }

    /// Run a one-time collection for a region
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn collect(&self, region: &str) -> Result<CatalogReport> {
        let start = std::time::Instant::now();

        let document = self
            .source
            .fetch_catalog(region)
            .await
            .wrap_err_with(|| format!("Failed to fetch the {region} price catalog"))?;

        let snapshot = self.normalizer.normalize(&document);
        let checks = check_families(&snapshot.families, &self.taxonomy);

        let report = CatalogReport {
            region: region.to_string(),
            snapshot,
            checks,
            duration_ms: start.elapsed().as_millis() as u64,
            collected_at: Utc::now(),
        };

        for family in report.missing_families() {
            warn!(family, "Instance family missing from taxonomy");
        }

        info!(
            instances = report.snapshot.instances.len(),
            families = report.snapshot.families.len(),
            missing = report.missing_families().count(),
            duration_ms = report.duration_ms,
            "Collection complete"
        );

        Ok(report)
    }
}
