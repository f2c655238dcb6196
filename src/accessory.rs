//! Accessory records and their persisted form.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::controls::LightControls;
use crate::discovery::DiscoveryHandle;
use crate::endpoint::Endpoint;
use crate::errors::Error;

/// One discovered Key Light as the host sees it.
///
/// Name and endpoint are fixed for the lifetime of the record; a device that
/// moves to a new address becomes a new accessory.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessoryRecord {
    identity: Uuid,
    name: String,
    endpoint: Endpoint,
    handle: Option<DiscoveryHandle>,
}

impl AccessoryRecord {
    pub fn new(name: &str, endpoint: Endpoint, handle: Option<DiscoveryHandle>) -> Self {
        AccessoryRecord {
            identity: endpoint.identity(),
            name: name.to_string(),
            endpoint,
            handle,
        }
    }

    pub fn identity(&self) -> Uuid {
        self.identity
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn handle(&self) -> Option<&DiscoveryHandle> {
        self.handle.as_ref()
    }

    /// The state a host persists to restore this record after a restart.
    pub fn context(&self) -> AccessoryContext {
        AccessoryContext {
            endpoint: Some(self.endpoint.to_string()),
            name: Some(self.name.clone()),
            handle: self.handle.clone(),
        }
    }
}

/// Host-persisted accessory state, as loosely typed as it comes off disk.
///
/// Convert with [`AccessoryRecord::try_from`] to validate it.
///
/// # Example
///
/// ```
/// use keylight_rs::{AccessoryContext, AccessoryRecord};
///
/// let context: AccessoryContext = serde_json::from_str(
///     r#"{"endpoint": "http://10.0.0.9:9123/elgato/lights", "name": "Key Light"}"#,
/// ).unwrap();
/// let record = AccessoryRecord::try_from(context).unwrap();
/// assert_eq!(record.name(), "Key Light");
/// assert!(record.handle().is_none());
/// ```
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryContext {
    pub endpoint: Option<String>,
    pub name: Option<String>,
    pub handle: Option<DiscoveryHandle>,
}

impl TryFrom<AccessoryContext> for AccessoryRecord {
    type Error = Error;

    fn try_from(context: AccessoryContext) -> Result<Self, Self::Error> {
        let endpoint: Endpoint = context
            .endpoint
            .ok_or(Error::MissingField("endpoint"))?
            .parse()?;
        let name = context
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or(Error::MissingField("name"))?;
        Ok(AccessoryRecord::new(&name, endpoint, context.handle))
    }
}

/// A registered accessory: its record plus the handlers bound to it.
///
/// Cloning is cheap and every clone drives the same registration.
#[derive(Debug, Clone)]
pub struct Accessory {
    record: Arc<AccessoryRecord>,
    controls: LightControls,
}

impl Accessory {
    pub(crate) fn new(record: AccessoryRecord, controls: LightControls) -> Self {
        Accessory {
            record: Arc::new(record),
            controls,
        }
    }

    pub fn identity(&self) -> Uuid {
        self.record.identity
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.record.endpoint
    }

    pub fn record(&self) -> &AccessoryRecord {
        &self.record
    }

    pub fn controls(&self) -> &LightControls {
        &self.controls
    }

    pub fn context(&self) -> AccessoryContext {
        self.record.context()
    }

    pub(crate) fn generation(&self) -> u64 {
        self.controls.generation()
    }
}
