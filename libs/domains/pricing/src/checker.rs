use std::collections::BTreeMap;
use std::fmt;

use crate::models::FamilyAggregate;
use crate::taxonomy::{FamilyEntry, Taxonomy};

/// Outcome of looking up one discovered family in the taxonomy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FamilyCheck {
    Known(&'static FamilyEntry),
    Missing(String),
}

impl FamilyCheck {
    pub fn code(&self) -> &str {
        match self {
            FamilyCheck::Known(entry) => entry.code,
            FamilyCheck::Missing(code) => code,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FamilyCheck::Missing(_))
    }
}

impl fmt::Display for FamilyCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FamilyCheck::Known(entry) => write!(f, "{entry}"),
            FamilyCheck::Missing(code) => write!(f, "!!!missing {code}"),
        }
    }
}

/// Cross-reference discovered families against the taxonomy, sorted by code.
pub fn check_families(
    families: &BTreeMap<String, FamilyAggregate>,
    taxonomy: &Taxonomy,
) -> Vec<FamilyCheck> {
    families
        .keys()
        .map(|code| match taxonomy.lookup(code) {
            Some(entry) => FamilyCheck::Known(entry),
            None => FamilyCheck::Missing(code.clone()),
        })
        .collect()
}
