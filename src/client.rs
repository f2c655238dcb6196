//! HTTP client for the Key Light REST API.

use log::debug;

use crate::command::{DeviceCommand, LightsBody};
use crate::config::PlatformConfig;
use crate::endpoint::Endpoint;
use crate::errors::{Error, UnreachableCause};
use crate::status::{DeviceStatus, LightState};

type Result<T> = std::result::Result<T, Error>;

/// Issues status reads and command writes against device endpoints.
///
/// Every failure, whether a refused connection, a non-success HTTP status
/// or a reply of the wrong shape, comes back as
/// [`Error::DeviceUnreachable`]. Nothing is retried.
///
/// Cloning is cheap; clones share the same connection pool.
#[derive(Debug, Clone, Default)]
pub struct DeviceClient {
    http: reqwest::Client,
}

impl DeviceClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing `reqwest` client.
    pub fn with_client(http: reqwest::Client) -> Self {
        DeviceClient { http }
    }

    /// Build a client honouring the configured request timeout.
    pub fn from_config(config: &PlatformConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(Error::HttpClient)?;
        Ok(DeviceClient { http })
    }

    /// Reads the current state of the first light behind `endpoint`.
    pub async fn fetch_status(&self, endpoint: &Endpoint) -> Result<DeviceStatus> {
        let body: LightsBody<LightState> = self
            .http
            .get(endpoint.as_str())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Error::unreachable(endpoint, e))?
            .json()
            .await
            .map_err(|e| Error::unreachable(endpoint, e))?;

        debug!("GET {endpoint}: {body:?}");
        DeviceStatus::from_body(&body)
            .ok_or_else(|| Error::unreachable(endpoint, UnreachableCause::NoLights))
    }

    /// Applies a sparse command to the light behind `endpoint`.
    pub async fn send_command(&self, endpoint: &Endpoint, command: &DeviceCommand) -> Result<()> {
        if !command.is_valid() {
            return Err(Error::EmptyCommand);
        }

        let body = LightsBody::single(command);
        debug!("PUT {endpoint}: {command:?}");
        self.http
            .put(endpoint.as_str())
            .json(&body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Error::unreachable(endpoint, e))?;
        Ok(())
    }
}
