use crate::{ConfigError, FromEnv, env_parse};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 1800;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Timeouts for outbound HTTP clients
///
/// `timeout` bounds the whole request including the body, so it caps the
/// slowest download that can still succeed. `read_timeout` catches a stalled
/// transfer long before that.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Whole-request deadline, including reading the body
    pub timeout: Duration,
    /// Longest gap allowed between two reads of the response
    pub read_timeout: Duration,
    pub connect_timeout: Duration,
}

impl HttpClientConfig {
    pub fn new(timeout: Duration, read_timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            timeout,
            read_timeout,
            connect_timeout,
        }
    }

    /// Same as [`FromEnv::from_env`] with every variable name prefixed,
    /// e.g. `PRICING_HTTP_TIMEOUT_SECS` for prefix `PRICING`.
    pub fn from_env_prefixed(prefix: &str) -> Result<Self, ConfigError> {
        let key = |name: &str| {
            if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}_{name}")
            }
        };

        let timeout = env_parse(&key("HTTP_TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS)?;
        let read_timeout = env_parse(&key("HTTP_READ_TIMEOUT_SECS"), DEFAULT_READ_TIMEOUT_SECS)?;
        let connect_timeout =
            env_parse(&key("HTTP_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS)?;

        Ok(Self::new(
            Duration::from_secs(timeout),
            Duration::from_secs(read_timeout),
            Duration::from_secs(connect_timeout),
        ))
    }
}

impl FromEnv for HttpClientConfig {
    /// Reads from environment variables with defaults sized for large
    /// downloads:
    /// - HTTP_TIMEOUT_SECS: defaults to 1800
    /// - HTTP_READ_TIMEOUT_SECS: defaults to 60
    /// - HTTP_CONNECT_TIMEOUT_SECS: defaults to 30
    fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_prefixed("")
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }
}
