//! Light status snapshots.

use serde::{Deserialize, Serialize};

use crate::command::LightsBody;
use crate::types::{Brightness, Property, PropertyValue, Temperature};

/// Current state of a light, fetched fresh from the device.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct DeviceStatus {
    on: bool,
    brightness: Brightness,
    temperature: Temperature,
}

impl DeviceStatus {
    pub fn new(on: bool, brightness: Brightness, temperature: Temperature) -> Self {
        DeviceStatus {
            on,
            brightness,
            temperature,
        }
    }

    /// Check if the light is emitting.
    pub fn on(&self) -> bool {
        self.on
    }

    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    /// Pick the value of one property out of this snapshot.
    pub fn get(&self, property: Property) -> PropertyValue {
        match property {
            Property::Power => PropertyValue::Power(self.on),
            Property::Brightness => PropertyValue::Brightness(self.brightness),
            Property::Temperature => PropertyValue::Temperature(self.temperature),
        }
    }

    /// Status of the first light in a GET reply, if there is one.
    pub(crate) fn from_body(body: &LightsBody<LightState>) -> Option<Self> {
        body.lights.first().map(DeviceStatus::from)
    }
}

/// One light entry as reported by the device.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub(crate) struct LightState {
    pub on: u8,
    pub brightness: Brightness,
    pub temperature: Temperature,
}

impl From<&LightState> for DeviceStatus {
    fn from(light: &LightState) -> Self {
        DeviceStatus {
            on: light.on != 0,
            brightness: light.brightness,
            temperature: light.temperature,
        }
    }
}
