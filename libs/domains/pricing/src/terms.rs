//! Price term resolution for a single SKU.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{TermAttributes, TermMap};

/// Hours in a (non-leap) year
pub const HOURS_PER_YEAR: f64 = 24.0 * 365.0;

const RESERVED_LEASE: &str = "1yr";
const RESERVED_PURCHASE_OPTION: &str = "No Upfront";
const RESERVED_OFFERING_CLASS: &str = "convertible";
const HOURLY_UNIT: &str = "Hrs";

/// Resolved prices for one SKU, in USD
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PricePoints {
    pub hourly: f64,
    pub on_demand_annual: f64,
    pub reserved_annual: f64,
}

/// Hourly on-demand rate for a SKU.
///
/// In-scope SKUs carry exactly one on-demand term with one dimension. If a SKU
/// ever carries more, the first dimension in (term code, rate code) order is
/// used and a warning is logged.
pub fn resolve_on_demand(sku: &str, terms: Option<&TermMap>) -> Option<f64> {
    let terms = terms?;
    let mut dimensions = terms.values().flat_map(|t| t.price_dimensions.values());
    let first = dimensions.next()?;

    let extra = dimensions.count();
    if extra > 0 {
        warn!(
            sku = sku,
            dimensions = extra + 1,
            rate_code = %first.rate_code,
            "Multiple on-demand price dimensions, using the first"
        );
    }

    Some(first.usd())
}

/// Hourly rate of the 1yr / No Upfront / convertible reserved term.
///
/// Only the first matching term is considered; if it has no hourly dimension
/// there is no reserved rate.
pub fn resolve_reserved(terms: Option<&TermMap>) -> Option<f64> {
    let term = terms?
        .values()
        .find(|t| is_convertible_no_upfront_1yr(&t.term_attributes))?;

    term.price_dimensions
        .values()
        .find(|d| d.unit == HOURLY_UNIT)
        .map(|d| d.usd())
}

/// Resolve hourly and annualized prices; unavailable prices are zero.
pub fn resolve_prices(
    sku: &str,
    on_demand: Option<&TermMap>,
    reserved: Option<&TermMap>,
) -> PricePoints {
    let hourly = resolve_on_demand(sku, on_demand).unwrap_or_default();
    let reserved_hourly = resolve_reserved(reserved).unwrap_or_default();

    PricePoints {
        hourly,
        on_demand_annual: hourly * HOURS_PER_YEAR,
        reserved_annual: reserved_hourly * HOURS_PER_YEAR,
    }
}

fn is_convertible_no_upfront_1yr(attrs: &TermAttributes) -> bool {
    attrs.lease_contract_length == RESERVED_LEASE
        && attrs.purchase_option == RESERVED_PURCHASE_OPTION
        && attrs.offering_class == RESERVED_OFFERING_CLASS
}
