//! Value types for light control parameters.

mod brightness;
mod property;
mod temperature;

pub use brightness::Brightness;
pub use property::{Property, PropertyValue};
pub use temperature::Temperature;
