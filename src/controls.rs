//! Per-accessory control handlers.

use std::fmt;
use std::sync::Weak;

use log::warn;
use uuid::Uuid;

use crate::accessory::AccessoryRecord;
use crate::client::DeviceClient;
use crate::command::DeviceCommand;
use crate::endpoint::Endpoint;
use crate::errors::Error;
use crate::registry::Shared;
use crate::status::DeviceStatus;
use crate::types::{Brightness, Property, PropertyValue, Temperature};

type Result<T> = std::result::Result<T, Error>;

/// Read and write handlers for one accessory's power, brightness and
/// color temperature.
///
/// Every read fetches fresh status from the device. Any
/// [`Error::DeviceUnreachable`] evicts the accessory from its registry (and
/// so from the host) before the error is handed back.
#[derive(Clone)]
pub struct LightControls {
    identity: Uuid,
    endpoint: Endpoint,
    generation: u64,
    client: DeviceClient,
    clamp_temperature: bool,
    registry: Weak<Shared>,
}

impl fmt::Debug for LightControls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LightControls")
            .field("identity", &self.identity)
            .field("endpoint", &self.endpoint)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl LightControls {
    pub(crate) fn new(
        record: &AccessoryRecord,
        generation: u64,
        client: DeviceClient,
        clamp_temperature: bool,
        registry: Weak<Shared>,
    ) -> Self {
        LightControls {
            identity: record.identity(),
            endpoint: record.endpoint().clone(),
            generation,
            client,
            clamp_temperature,
            registry,
        }
    }

    pub fn identity(&self) -> Uuid {
        self.identity
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn read_power(&self) -> Result<bool> {
        Ok(self.status().await?.on())
    }

    pub async fn write_power(&self, on: bool) -> Result<()> {
        self.write(PropertyValue::Power(on)).await
    }

    pub async fn read_brightness(&self) -> Result<Brightness> {
        Ok(self.status().await?.brightness())
    }

    pub async fn write_brightness(&self, brightness: Brightness) -> Result<()> {
        self.write(PropertyValue::Brightness(brightness)).await
    }

    pub async fn read_temperature(&self) -> Result<Temperature> {
        Ok(self.status().await?.temperature())
    }

    pub async fn write_temperature(&self, temperature: Temperature) -> Result<()> {
        self.write(PropertyValue::Temperature(temperature)).await
    }

    /// Read any one property.
    pub async fn read(&self, property: Property) -> Result<PropertyValue> {
        Ok(self.status().await?.get(property))
    }

    /// Write a single property; nothing else on the device changes.
    pub async fn write(&self, value: PropertyValue) -> Result<()> {
        let command = DeviceCommand::from(value);
        self.client
            .send_command(&self.endpoint, &command)
            .await
            .map_err(|e| self.on_failure(e))
    }

    /// Write a property from the host's integer representation.
    ///
    /// Out-of-range values are rejected with [`Error::InvalidValue`] before
    /// any request is made; they do not evict the accessory.
    pub async fn write_raw(&self, property: Property, raw: i64) -> Result<()> {
        let value = PropertyValue::from_raw(property, raw, self.clamp_temperature)
            .ok_or_else(|| Error::invalid_value(property, raw))?;
        self.write(value).await
    }

    async fn status(&self) -> Result<DeviceStatus> {
        self.client
            .fetch_status(&self.endpoint)
            .await
            .map_err(|e| self.on_failure(e))
    }

    fn on_failure(&self, err: Error) -> Error {
        if err.is_unreachable() {
            warn!("{err}; evicting accessory {}", self.identity);
            if let Some(registry) = self.registry.upgrade() {
                registry.remove(self.identity, Some(self.generation));
            }
        }
        err
    }
}
