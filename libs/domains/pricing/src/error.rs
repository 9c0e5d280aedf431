use thiserror::Error;

/// Result type for pricing catalog operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors that can occur while normalizing the pricing catalog
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Storage description did not match any known layout
    #[error("parse storage fail for {raw:?}")]
    StorageParse { raw: String },

    /// Network performance description did not match any known form
    #[error("failed to parse network perf: {raw:?}")]
    NetworkPerfParse { raw: String },

    /// The same family code appears more than once in the taxonomy table
    #[error("Duplicate family type found: {0}")]
    DuplicateFamily(String),
}

impl PricingError {
    /// Raw input that failed to parse, if this is a parse error
    pub fn raw_input(&self) -> Option<&str> {
        match self {
            PricingError::StorageParse { raw } | PricingError::NetworkPerfParse { raw } => {
                Some(raw)
            }
            PricingError::DuplicateFamily(_) => None,
        }
    }
}
