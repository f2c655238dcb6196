//! Platform configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};

use crate::errors::Error;

/// Name the accessories are registered under with the host.
pub const PLUGIN_NAME: &str = "homebridge-key-light";
/// Platform identifier used in the host's configuration file.
pub const PLATFORM_NAME: &str = "key-light";
/// DNS-SD service type Key Lights announce themselves with.
pub const SERVICE_TYPE: &str = "elg";

/// Configuration block for the Key Light platform.
///
/// # Example
///
/// ```
/// use keylight_rs::PlatformConfig;
///
/// let config = PlatformConfig::from_json(r#"{"platform": "key-light", "requestTimeoutMs": 2500}"#).unwrap();
/// assert_eq!(config.service_type, "elg");
/// assert_eq!(config.request_timeout.map(|t| t.as_millis()), Some(2500));
/// ```
#[serde_as]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformConfig {
    pub platform: String,
    /// Optional display name the host shows for the platform.
    pub name: Option<String>,
    pub service_type: String,
    /// Per-request timeout. `None` leaves the HTTP client's default in place.
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    #[serde(rename = "requestTimeoutMs")]
    pub request_timeout: Option<Duration>,
    /// Clamp out-of-range color temperatures instead of rejecting them.
    pub clamp_temperature: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        PlatformConfig {
            platform: PLATFORM_NAME.to_string(),
            name: None,
            service_type: SERVICE_TYPE.to_string(),
            request_timeout: None,
            clamp_temperature: true,
        }
    }
}

impl PlatformConfig {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(Error::JsonLoad)
    }
}
