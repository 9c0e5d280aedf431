//! Normalization of a region price document into sorted instance records.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::filter::is_in_scope;
use crate::manufacturer::CpuManufacturer;
use crate::models::{
    Disk, FamilyAggregate, NetworkPerf, NormalizedInstance, PriceDocument, ProductAttributes,
    TermMap,
};
use crate::parsers::{parse_memory, parse_net_perf, parse_storage};
use crate::terms::resolve_prices;

/// Size words and their abbreviations for short type names
const SIZE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("large", "l"),
    ("medium", "m"),
    ("metal", "⛁"),
    ("micro", "μ"),
    ("nano", "n"),
    ("small", "s"),
];

/// Options controlling how products are normalized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Abbreviate size words in instance names (`m5.2xlarge` -> `m5.2xl`)
    pub short_names: bool,
}

/// Result of normalizing one price document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogSnapshot {
    pub publication_date: String,
    /// In-scope instances sorted by ascending on-demand annual cost
    pub instances: Vec<NormalizedInstance>,
    /// Last observed details per family code
    pub families: BTreeMap<String, FamilyAggregate>,
    pub products_seen: usize,
    pub products_skipped: usize,
    /// Attribute fields that failed to parse and were zeroed
    pub parse_warnings: usize,
}

impl CatalogSnapshot {
    /// Discovered family codes in alphabetical order
    pub fn family_codes(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }
}

/// Turns raw catalog products into [`NormalizedInstance`] records
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Normalize every in-scope product of a price document.
    ///
    /// Products are visited in SKU order, so the output for a given document
    /// is always the same.
    pub fn normalize(&self, doc: &PriceDocument) -> CatalogSnapshot {
        let mut snapshot = CatalogSnapshot {
            publication_date: doc.publication_date.clone(),
            ..Default::default()
        };

        for (sku, product) in &doc.products {
            snapshot.products_seen += 1;

            let attrs = &product.attributes;
            if !is_in_scope(attrs) {
                snapshot.products_skipped += 1;
                continue;
            }

            let (instance, warnings) = self.normalize_product(
                sku,
                attrs,
                doc.terms.on_demand.get(sku),
                doc.terms.reserved.get(sku),
            );
            snapshot.parse_warnings += warnings;

            snapshot.families.insert(
                instance.family.clone(),
                FamilyAggregate {
                    instance_family: attrs.instance_family.clone(),
                    physical_processor: attrs.physical_processor.clone(),
                    cpu_manufacturer: instance.cpu_manufacturer,
                    current_generation: attrs.current_generation == "Yes",
                },
            );
            snapshot.instances.push(instance);
        }

        sort_instances(&mut snapshot.instances);

        info!(
            products = snapshot.products_seen,
            skipped = snapshot.products_skipped,
            instances = snapshot.instances.len(),
            families = snapshot.families.len(),
            parse_warnings = snapshot.parse_warnings,
            "Normalized price document"
        );

        snapshot
    }

    /// Build one record; the count is the number of fields zeroed by parse errors.
    fn normalize_product(
        &self,
        sku: &str,
        attrs: &ProductAttributes,
        on_demand: Option<&TermMap>,
        reserved: Option<&TermMap>,
    ) -> (NormalizedInstance, usize) {
        let mut warnings = 0;
        let prices = resolve_prices(sku, on_demand, reserved);

        let disk = parse_storage(&attrs.storage).unwrap_or_else(|e| {
            warn!(sku = sku, error = %e, "parse storage err");
            warnings += 1;
            Disk::default()
        });

        let network_perf = parse_net_perf(&attrs.network_performance).unwrap_or_else(|e| {
            warn!(sku = sku, error = %e, "parse network performance err");
            warnings += 1;
            NetworkPerf::default()
        });

        let name = if self.options.short_names {
            short_type(&attrs.instance_type)
        } else {
            attrs.instance_type.clone()
        };

        let instance = NormalizedInstance {
            name,
            family: family_code(&attrs.instance_type).to_string(),
            vcpu: attrs.vcpu.clone(),
            memory_gib: parse_memory(&attrs.memory),
            disk,
            cpu_manufacturer: CpuManufacturer::from_processor(&attrs.physical_processor),
            network_perf,
            hourly: prices.hourly,
            on_demand_annual: prices.on_demand_annual,
            reserved_annual: prices.reserved_annual,
        };

        (instance, warnings)
    }
}

/// Family code of an instance type: everything before the first `.`
pub fn family_code(instance_type: &str) -> &str {
    instance_type
        .split_once('.')
        .map_or(instance_type, |(family, _)| family)
}

/// Abbreviate the size words of an instance type.
///
/// Only the part after the first `.` is rewritten. It is split on `.` and `-`
/// into tokens of an optional multiplier (`2x`, `x`) and a size word; a size
/// word is replaced only when it matches a known word exactly.
pub fn short_type(instance_type: &str) -> String {
    let Some((family, size)) = instance_type.split_once('.') else {
        return instance_type.to_string();
    };

    let mut out = String::with_capacity(instance_type.len());
    out.push_str(family);
    out.push('.');

    let mut token_start = 0;
    for (i, ch) in size.char_indices() {
        if ch == '.' || ch == '-' {
            out.push_str(&abbreviate_token(&size[token_start..i]));
            out.push(ch);
            token_start = i + ch.len_utf8();
        }
    }
    out.push_str(&abbreviate_token(&size[token_start..]));

    out
}

fn abbreviate_token(token: &str) -> String {
    let digits = token.len() - token.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let split = if token[digits..].starts_with('x') {
        digits + 1
    } else {
        digits
    };
    let (multiplier, word) = token.split_at(split);

    match SIZE_ABBREVIATIONS.iter().find(|(long, _)| *long == word) {
        Some((_, short)) => format!("{multiplier}{short}"),
        None => token.to_string(),
    }
}

/// Ascending on-demand annual cost, then family code, then name
fn sort_instances(instances: &mut [NormalizedInstance]) {
    instances.sort_by(compare_instances);
}

fn compare_instances(a: &NormalizedInstance, b: &NormalizedInstance) -> Ordering {
    a.on_demand_annual
        .total_cmp(&b.on_demand_annual)
        .then_with(|| a.family.cmp(&b.family))
        .then_with(|| a.name.cmp(&b.name))
}
