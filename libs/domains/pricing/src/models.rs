use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::manufacturer::CpuManufacturer;

// ============================================================================
// Raw catalog documents
// ============================================================================

/// Top-level offer index (`/offers/v1.0/aws/index.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceIndex {
    pub disclaimer: String,
    pub format_version: String,
    pub publication_date: String,
    /// Offers keyed by service code (e.g., "AmazonEC2")
    pub offers: HashMap<String, Offer>,
}

/// One service's entry in the offer index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Offer {
    pub offer_code: String,
    pub current_region_index_url: String,
    pub current_version_url: String,
    pub version_index_url: String,
}

/// Per-service region index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegionIndex {
    pub disclaimer: String,
    pub format_version: String,
    pub publication_date: String,
    /// Regions keyed by region code (e.g., "us-east-1")
    pub regions: HashMap<String, RegionEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegionEntry {
    pub region_code: String,
    pub current_version_url: String,
}

/// Region price document: products plus their price terms
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceDocument {
    pub format_version: String,
    pub disclaimer: String,
    pub offer_code: String,
    pub version: String,
    pub publication_date: String,
    /// Products keyed by SKU
    pub products: BTreeMap<String, Product>,
    pub terms: Terms,
}

/// On-demand and reserved terms, each keyed by SKU then by term code
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Terms {
    #[serde(rename = "OnDemand")]
    pub on_demand: HashMap<String, TermMap>,
    #[serde(rename = "Reserved")]
    pub reserved: HashMap<String, TermMap>,
}

/// Terms of a single SKU keyed by term code
pub type TermMap = BTreeMap<String, Term>;

/// A priced offering variant for a SKU
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Term {
    pub sku: String,
    pub offer_term_code: String,
    pub effective_date: String,
    /// Price dimensions keyed by rate code
    pub price_dimensions: BTreeMap<String, PriceDimension>,
    pub term_attributes: TermAttributes,
}

/// Reserved term qualifiers (empty for on-demand terms)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TermAttributes {
    pub lease_contract_length: String,
    pub offering_class: String,
    pub purchase_option: String,
}

/// A single rate within a term
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceDimension {
    pub rate_code: String,
    pub description: String,
    pub begin_range: String,
    pub end_range: String,
    /// Unit of the rate (e.g., "Hrs", "Quantity")
    pub unit: String,
    /// Amount per unit keyed by currency code, as decimal text
    pub price_per_unit: BTreeMap<String, String>,
}

impl PriceDimension {
    /// USD amount per unit; missing or malformed amounts count as zero
    pub fn usd(&self) -> f64 {
        self.price_per_unit
            .get("USD")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or_default()
    }
}

/// One catalog SKU
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub sku: String,
    pub product_family: String,
    pub attributes: ProductAttributes,
}

/// Product attributes as published upstream; absent fields are empty strings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductAttributes {
    pub instance_type: String,
    pub instance_family: String,
    pub current_generation: String,
    pub vcpu: String,
    pub memory: String,
    pub storage: String,
    pub network_performance: String,
    pub physical_processor: String,
    pub operating_system: String,
    #[serde(rename = "usagetype")]
    pub usage_type: String,
    pub operation: String,
    pub tenancy: String,
    pub location: String,
    #[serde(rename = "capacitystatus")]
    pub capacity_status: String,
    pub pre_installed_sw: String,
    pub license_model: String,
}

// ============================================================================
// Normalized values
// ============================================================================

/// Locally attached storage layout.
///
/// A count of zero means the instance only has network-attached (EBS) storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Disk {
    pub count: u32,
    pub per_disk_gb: u32,
    pub ssd: bool,
    pub nvme: bool,
}

impl Disk {
    pub fn is_ebs_only(&self) -> bool {
        self.count == 0
    }

    /// Total attached capacity in GB
    pub fn total_gb(&self) -> u64 {
        u64::from(self.count) * u64::from(self.per_disk_gb)
    }
}

impl fmt::Display for Disk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ebs_only() {
            return f.write_str("EBS");
        }

        let mut total = self.total_gb();
        let unit = if total > 1_000_000 {
            total /= 1_000_000;
            "PB"
        } else if total > 1_000 {
            total /= 1_000;
            "TB"
        } else {
            "GB"
        };

        let kind = if self.nvme {
            "NVMe"
        } else if self.ssd {
            "SSD"
        } else {
            "HDD"
        };

        write!(f, "{total}{unit}-{kind}")
    }
}

/// Network bandwidth ceiling
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkPerf {
    /// Bandwidth ceiling in gigabits per second
    pub cap_gb: f64,
    /// True when the ceiling is a burst cap rather than a sustained guarantee
    pub bursting: bool,
}

impl fmt::Display for NetworkPerf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.cap_gb)?;
        if self.bursting {
            f.write_str("*")?;
        }
        Ok(())
    }
}

/// One normalized, priced instance type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedInstance {
    /// Instance type, abbreviated when short names are requested
    pub name: String,
    /// Family code (the part of the full instance type before the first `.`)
    pub family: String,
    /// vCPU count as published (upstream does not guarantee integer text)
    pub vcpu: String,
    pub memory_gib: f64,
    pub disk: Disk,
    pub cpu_manufacturer: CpuManufacturer,
    pub network_perf: NetworkPerf,
    /// On-demand hourly rate in USD
    pub hourly: f64,
    pub on_demand_annual: f64,
    /// 1yr no-upfront convertible reserved cost, zero when not offered
    pub reserved_annual: f64,
}

/// What was last observed for a family code during normalization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyAggregate {
    pub instance_family: String,
    pub physical_processor: String,
    pub cpu_manufacturer: CpuManufacturer,
    pub current_generation: bool,
}
