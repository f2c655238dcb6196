use crate::endpoint::Endpoint;
use crate::types::Property;

/// All error types that can occur while managing Key Light accessories.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A request to a device failed, or its reply did not have the expected shape.
    ///
    /// Raising this from a control handler evicts the accessory.
    #[error("device at {endpoint} is unreachable: {cause}")]
    DeviceUnreachable {
        endpoint: Endpoint,
        #[source]
        cause: UnreachableCause,
    },

    /// A persisted accessory context lacks a field needed to rebuild the record.
    #[error("persisted accessory is missing the `{0}` field")]
    MissingField(&'static str),

    /// A persisted endpoint is not a usable `http` URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The discovery subsystem could not start a subscription.
    #[error("discovery error: {0}")]
    Discovery(String),

    /// Failed to deserialize JSON data.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// Attempted to send a [`crate::DeviceCommand`] with no attributes set.
    #[error("invalid command; no attributes set")]
    EmptyCommand,

    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    HttpClient(reqwest::Error),

    /// A host supplied a value outside the property's valid range.
    #[error("invalid {property} value: {value}")]
    InvalidValue { property: Property, value: i64 },
}

/// Why a device was considered unreachable.
#[derive(Debug, thiserror::Error)]
pub enum UnreachableCause {
    /// Connection, HTTP status or body decoding failure.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The status reply carried no light entry.
    #[error("status reply contains no lights")]
    NoLights,
}

impl Error {
    /// Create a new device unreachable error
    pub fn unreachable(endpoint: &Endpoint, cause: impl Into<UnreachableCause>) -> Self {
        Error::DeviceUnreachable {
            endpoint: endpoint.clone(),
            cause: cause.into(),
        }
    }

    /// Create a new invalid value error
    pub fn invalid_value(property: Property, value: impl Into<i64>) -> Self {
        Error::InvalidValue {
            property,
            value: value.into(),
        }
    }

    /// Whether this error means the device should be treated as gone.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Error::DeviceUnreachable { .. })
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_unreachable_display_names_endpoint() {
        let endpoint = Endpoint::resolve(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)), 9123);
        let err = Error::unreachable(&endpoint, UnreachableCause::NoLights);
        assert!(err.is_unreachable());
        assert_eq!(
            err.to_string(),
            "device at http://10.0.0.7:9123/elgato/lights is unreachable: status reply contains no lights"
        );
    }

    #[test]
    fn test_missing_field_is_not_unreachable() {
        let err = Error::MissingField("endpoint");
        assert!(!err.is_unreachable());
        assert_eq!(err, Error::MissingField("endpoint"));
    }
}
