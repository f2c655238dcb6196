//! Controllable properties of an accessory.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use super::{Brightness, Temperature};

/// One of the three properties each accessory exposes to the host.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Property {
    Power,
    Brightness,
    Temperature,
}

/// A value read from, or written to, a [`Property`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyValue {
    Power(bool),
    Brightness(Brightness),
    Temperature(Temperature),
}

impl PropertyValue {
    /// The property this value belongs to.
    pub fn property(&self) -> Property {
        match self {
            PropertyValue::Power(_) => Property::Power,
            PropertyValue::Brightness(_) => Property::Brightness,
            PropertyValue::Temperature(_) => Property::Temperature,
        }
    }

    /// Build a value from the integer representation hosts usually carry.
    ///
    /// Power treats any non-zero value as on. Brightness and temperature are
    /// range checked; temperature is clamped when `clamp_temperature` is set.
    pub fn from_raw(property: Property, raw: i64, clamp_temperature: bool) -> Option<Self> {
        match property {
            Property::Power => Some(PropertyValue::Power(raw != 0)),
            Property::Brightness => u8::try_from(raw)
                .ok()
                .and_then(Brightness::create)
                .map(PropertyValue::Brightness),
            Property::Temperature => {
                let mireds = u16::try_from(raw).ok()?;
                if clamp_temperature {
                    Some(PropertyValue::Temperature(Temperature::clamped(mireds)))
                } else {
                    Temperature::create(mireds).map(PropertyValue::Temperature)
                }
            }
        }
    }
}
