//! Pricing Domain
//!
//! Normalizes the EC2 price list into a sortable table of instance offerings
//! and classifies instance family codes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Pipeline   │  ← filter, price terms, attribute parsing per product
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Checker   │  ← discovered families vs. taxonomy
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← raw catalog documents, normalized records
//! └─────────────┘
//! ```

pub mod checker;
pub mod error;
pub mod filter;
pub mod manufacturer;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod taxonomy;
pub mod terms;

// Re-export commonly used types
pub use checker::{FamilyCheck, check_families};
pub use error::{PricingError, PricingResult};
pub use filter::is_in_scope;
pub use manufacturer::CpuManufacturer;
pub use models::{
    Disk, FamilyAggregate, NetworkPerf, NormalizedInstance, Offer, PriceDimension, PriceDocument,
    PriceIndex, Product, ProductAttributes, RegionEntry, RegionIndex, Term, TermAttributes,
    TermMap, Terms,
};
pub use parsers::{parse_memory, parse_net_perf, parse_storage};
pub use pipeline::{CatalogSnapshot, NormalizeOptions, Normalizer, family_code, short_type};
pub use taxonomy::{FAMILIES, FamilyEntry, PrefixCategory, SuffixFlags, Taxonomy, find_duplicates};
pub use terms::{HOURS_PER_YEAR, PricePoints, resolve_prices};
