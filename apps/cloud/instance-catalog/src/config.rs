//! Configuration for the instance catalog

use core_config::http::HttpClientConfig;
use core_config::{ConfigError, FromEnv, env_optional, env_or_default};
use std::path::PathBuf;

use crate::providers::aws::{DEFAULT_BASE_URL, DEFAULT_INDEX_PATH, DEFAULT_SERVICE_CODE};

pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Clone)]
pub struct Config {
    pub price_list: PriceListConfig,
    /// Region whose price document is fetched, unless overridden on the command line
    pub region: String,
}

#[derive(Debug, Clone)]
pub struct PriceListConfig {
    /// Scheme and host every catalog path is resolved against
    pub base_url: String,
    pub index_path: String,
    /// Offer code looked up in the price index
    pub service_code: String,
    pub http: HttpClientConfig,
    /// Directory the raw documents are copied to while downloading
    pub tee_dir: Option<PathBuf>,
}

impl Default for PriceListConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            index_path: DEFAULT_INDEX_PATH.to_string(),
            service_code: DEFAULT_SERVICE_CODE.to_string(),
            http: HttpClientConfig::default(),
            tee_dir: None,
        }
    }
}

impl FromEnv for PriceListConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env_or_default("PRICING_BASE_URL", DEFAULT_BASE_URL),
            index_path: env_or_default("PRICING_INDEX_PATH", DEFAULT_INDEX_PATH),
            service_code: env_or_default("PRICING_SERVICE_CODE", DEFAULT_SERVICE_CODE),
            http: HttpClientConfig::from_env_prefixed("PRICING")?,
            tee_dir: env_optional("PRICING_TEE_DIR").map(PathBuf::from),
        })
    }
}

impl FromEnv for Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            price_list: PriceListConfig::from_env()?,
            region: env_or_default("AWS_REGION", DEFAULT_REGION),
        })
    }
}
