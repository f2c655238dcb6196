//! Color temperature control.

use serde::{Deserialize, Serialize};

/// Color temperature in mireds, as the Key Light API expresses it.
///
/// The device accepts 143 (about 7000K) to 344 (about 2900K). Higher mired
/// values are warmer.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct Temperature {
    pub(crate) mireds: u16,
}

impl Default for Temperature {
    fn default() -> Self {
        Self::new()
    }
}

impl Temperature {
    const MIN: u16 = 143;
    const MAX: u16 = 344;

    /// Create a new Temperature with the coolest value (143 mireds).
    ///
    /// # Examples
    ///
    /// ```
    /// use keylight_rs::Temperature;
    ///
    /// assert_eq!(Temperature::new().mireds(), 143);
    /// ```
    pub fn new() -> Self {
        Temperature { mireds: Self::MIN }
    }

    pub fn mireds(&self) -> u16 {
        self.mireds
    }

    /// Approximate color temperature in Kelvin.
    pub fn kelvin(&self) -> u32 {
        1_000_000 / u32::from(self.mireds.max(1))
    }

    /// Create a new Temperature with the given value.
    ///
    /// Returns `None` if value is outside the valid range (143-344).
    ///
    /// # Examples
    ///
    /// ```
    /// use keylight_rs::Temperature;
    ///
    /// assert!(Temperature::create(142).is_none());
    /// assert!(Temperature::create(143).is_some());
    /// assert!(Temperature::create(344).is_some());
    /// assert!(Temperature::create(345).is_none());
    /// ```
    pub fn create(mireds: u16) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&mireds) {
            Some(Temperature { mireds })
        } else {
            None
        }
    }

    /// Clamp an arbitrary mired value into the device range.
    ///
    /// Hosts commonly advertise 140-500 mireds; this maps such values onto
    /// the nearest value the light supports.
    pub fn clamped(mireds: u16) -> Self {
        Temperature {
            mireds: mireds.clamp(Self::MIN, Self::MAX),
        }
    }
}
