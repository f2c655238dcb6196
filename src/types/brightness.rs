//! Brightness control for Key Lights.

use serde::{Deserialize, Serialize};

/// Brightness level from 0 to 100 percent.
///
/// Values read back from a device are taken as reported; only values
/// built with [`Brightness::create`] are range checked.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct Brightness {
    pub(crate) value: u8,
}

impl Default for Brightness {
    fn default() -> Self {
        Self::new()
    }
}

impl Brightness {
    const MAX: u8 = 100;

    /// Full brightness.
    pub fn new() -> Self {
        Brightness { value: Self::MAX }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Returns `None` above 100.
    ///
    /// # Examples
    ///
    /// ```
    /// use keylight_rs::Brightness;
    ///
    /// assert_eq!(Brightness::create(40).map(|b| b.value()), Some(40));
    /// assert!(Brightness::create(101).is_none());
    /// ```
    pub fn create(value: u8) -> Option<Self> {
        if Self::is_valid(value) {
            Some(Brightness { value })
        } else {
            None
        }
    }

    fn is_valid(value: u8) -> bool {
        value <= Self::MAX
    }
}
