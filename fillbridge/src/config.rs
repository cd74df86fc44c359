//! Service configuration read from environment variables.

use std::fmt;
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Deserialize, Clone)]
/// Settings for one pipeline run.
pub(crate) struct ServiceConfig {
    /// BigBelly asset API URL (`BIGBELLY_API`).
    pub(crate) bigbelly_api: String,

    /// BigBelly API key (`XTOKEN`).
    pub(crate) xtoken: String,

    /// Ingestion endpoint receiving SenML packs (`DIWISE_API`).
    pub(crate) diwise_api: String,

    /// Log level used when `RUST_LOG` is unset (`LOG_LEVEL`).
    #[serde(default = "default_log_level")]
    pub(crate) log_level: String,

    /// Per-request HTTP timeout in seconds (`REQUEST_TIMEOUT_SECS`).
    #[serde(default = "default_request_timeout_secs")]
    pub(crate) request_timeout_secs: u64,
}

/// Log level used when neither `RUST_LOG` nor `LOG_LEVEL` is set.
pub(crate) const DEFAULT_LOG_LEVEL: &str = "info";

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_owned()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl ServiceConfig {
    /// Load from the process environment.
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::default())
    }

    fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    pub(crate) fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// The API key stays out of logs.
impl fmt::Debug for ServiceConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ServiceConfig")
            .field("bigbelly_api", &self.bigbelly_api)
            .field("xtoken", &"<redacted>")
            .field("diwise_api", &self.diwise_api)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
