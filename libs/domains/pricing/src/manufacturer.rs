use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// CPU vendor derived from the catalog's processor description
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
pub enum CpuManufacturer {
    #[strum(serialize = "int")]
    Intel,
    #[strum(serialize = "amd")]
    Amd,
    /// AWS-designed Graviton (Arm) processors
    #[strum(serialize = "arm")]
    Aws,
    #[default]
    #[strum(serialize = "unk")]
    Unknown,
}

impl CpuManufacturer {
    /// Classify a processor description such as "Intel Xeon Platinum 8175".
    ///
    /// Vendor tokens are checked in order Intel, AMD, AWS; the first hit wins.
    pub fn from_processor(description: &str) -> Self {
        if description.contains("Intel") {
            CpuManufacturer::Intel
        } else if description.contains("AMD") {
            CpuManufacturer::Amd
        } else if description.contains("AWS") {
            CpuManufacturer::Aws
        } else {
            CpuManufacturer::Unknown
        }
    }
}
