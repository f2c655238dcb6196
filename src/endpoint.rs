//! Device endpoint resolution and identity derivation.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::errors::Error;

/// Base URL of one Key Light's lighting control resource.
///
/// The endpoint string is the identity seed of an accessory: the same
/// address and port always resolve to the same endpoint, and therefore to
/// the same [`Uuid`].
///
/// # Example
///
/// ```
/// use std::net::{IpAddr, Ipv4Addr};
/// use keylight_rs::Endpoint;
///
/// let endpoint = Endpoint::resolve(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 50)), 9123);
/// assert_eq!(endpoint.as_str(), "http://192.168.1.50:9123/elgato/lights");
/// assert_eq!(endpoint.identity(), endpoint.clone().identity());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint(String);

impl Endpoint {
    /// Well-known path of the lighting resource on every device.
    pub const LIGHTS_PATH: &'static str = "/elgato/lights";

    /// IPv6 addresses are bracketed. There is no scope id, so link-local
    /// IPv6 addresses are not supported.
    pub fn resolve(address: IpAddr, port: u16) -> Self {
        let socket = SocketAddr::new(address, port);
        Endpoint(format!("http://{socket}{}", Self::LIGHTS_PATH))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stable accessory identity for this endpoint (UUID v5, URL namespace).
    pub fn identity(&self) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_URL, self.0.as_bytes())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(s).map_err(|e| Error::InvalidEndpoint(format!("{s}: {e}")))?;
        if url.scheme() != "http" || url.host().is_none() {
            return Err(Error::InvalidEndpoint(s.to_string()));
        }
        // Keep the caller's spelling; identities are derived from it verbatim.
        Ok(Endpoint(s.to_string()))
    }
}

impl TryFrom<String> for Endpoint {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.0
    }
}
