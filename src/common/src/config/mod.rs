use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "helios.toml";

/// Prefix for environment overrides, e.g. `HELIOS__BACKEND__URL`
pub const ENV_PREFIX: &str = "HELIOS__";

/// Window used for range (matrix) queries
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RangeConfig {
    /// How far back from "now" the range starts
    #[serde(with = "humantime_serde")]
    pub lookback: Duration,
    /// Resolution step between points
    #[serde(with = "humantime_serde")]
    pub step: Duration,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            lookback: Duration::from_secs(60 * 60),
            step: Duration::from_secs(60),
        }
    }
}

/// Connection settings for the Prometheus-compatible backend
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BackendConfig {
    /// Base URL of the backend, without the `/api/v1` suffix
    pub url: String,
    /// Upper bound for a single backend call
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    pub range: RangeConfig,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::from("http://localhost:9090"),
            timeout: Duration::from_secs(10),
            range: RangeConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: String::from("0.0.0.0"),
            port: 8081,
        }
    }
}

/// Metric identifier lookup settings
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct MetricsConfig {
    /// Reject identifiers that are not part of the catalog
    pub strict: bool,
    /// Extra alias -> metric name mappings on top of the built-in OVS metrics
    pub aliases: HashMap<String, String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Configuration {
    /// Monitoring backend the queries are sent to
    pub backend: BackendConfig,
    /// HTTP API listener
    pub server: ServerConfig,
    /// Known metric identifiers
    pub metrics: MetricsConfig,
}

impl Configuration {
    /// Load defaults, then `helios.toml`, then `HELIOS__*` environment variables
    pub fn load() -> Result<Self, Box<figment::Error>> {
        Self::figment(Toml::file(DEFAULT_CONFIG_FILE))
            .extract()
            .map_err(Box::new)
    }

    /// Same layering as [`Configuration::load`] with an explicit file
    pub fn load_from_path(path: &Path) -> Result<Self, Box<figment::Error>> {
        Self::figment(Toml::file(path)).extract().map_err(Box::new)
    }

    fn figment(file: figment::providers::Data<Toml>) -> Figment {
        Figment::from(Serialized::defaults(Configuration::default()))
            .merge(file)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}
