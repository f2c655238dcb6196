//! Sparse command bodies sent to Key Lights.

use serde::{Deserialize, Serialize};

use crate::types::{Brightness, PropertyValue, Temperature};

/// A desired change to one light.
///
/// Only the attributes that were set are serialized, so the device leaves
/// everything else untouched.
///
/// # Creating Commands
///
/// 1. **From a single value** using the [`From`] trait:
///    ```
///    use keylight_rs::{Brightness, DeviceCommand};
///    let command = DeviceCommand::from(Brightness::create(40).unwrap());
///    assert!(command.is_valid());
///    ```
///
/// 2. **Builder pattern** for combining attributes:
///    ```
///    use keylight_rs::{DeviceCommand, Temperature};
///    let mut command = DeviceCommand::new();
///    command.power(true);
///    command.temperature(&Temperature::create(300).unwrap());
///    ```
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DeviceCommand {
    pub(crate) on: Option<u8>,
    pub(crate) brightness: Option<u8>,
    pub(crate) temperature: Option<u16>,
}

impl DeviceCommand {
    /// Create a new empty command.
    ///
    /// # Examples
    ///
    /// ```
    /// use keylight_rs::DeviceCommand;
    ///
    /// let command = DeviceCommand::new();
    /// assert_eq!(command.is_valid(), false);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if this command changes at least one attribute.
    pub fn is_valid(&self) -> bool {
        self.on.is_some() || self.brightness.is_some() || self.temperature.is_some()
    }

    pub fn power(&mut self, on: bool) {
        self.on = Some(u8::from(on));
    }

    pub fn brightness(&mut self, brightness: &Brightness) {
        self.brightness = Some(brightness.value);
    }

    pub fn temperature(&mut self, temperature: &Temperature) {
        self.temperature = Some(temperature.mireds);
    }
}

impl From<PropertyValue> for DeviceCommand {
    fn from(value: PropertyValue) -> Self {
        let mut c = DeviceCommand::new();
        match value {
            PropertyValue::Power(on) => c.power(on),
            PropertyValue::Brightness(b) => c.brightness(&b),
            PropertyValue::Temperature(t) => c.temperature(&t),
        }
        c
    }
}

impl From<Brightness> for DeviceCommand {
    fn from(brightness: Brightness) -> Self {
        PropertyValue::Brightness(brightness).into()
    }
}

impl From<Temperature> for DeviceCommand {
    fn from(temperature: Temperature) -> Self {
        PropertyValue::Temperature(temperature).into()
    }
}

/// The `{numberOfLights, lights}` envelope used by both GET and PUT.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LightsBody<T> {
    pub number_of_lights: usize,
    pub lights: Vec<T>,
}

impl<T> LightsBody<T> {
    pub fn single(light: T) -> Self {
        LightsBody {
            number_of_lights: 1,
            lights: vec![light],
        }
    }
}
