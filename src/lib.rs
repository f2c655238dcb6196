//! # keylight_rs
//!
//! Discovers Elgato Key Lights on the local network and exposes each one as a
//! controllable accessory (power, brightness, color temperature) to a
//! home-automation host.
//!
//! The crate owns the lifecycle between the two sides: service announcements
//! come in through a [`Discovery`] feed, the [`DiscoveryBridge`] turns them
//! into [`Registry`] updates, and every registered [`Accessory`] carries
//! [`LightControls`] that translate host reads and writes into HTTP calls
//! against the light's REST API.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use keylight_rs::{ChannelDiscovery, DiscoveryBridge, PlatformConfig, Registry};
//!
//! async fn run(host: Arc<dyn keylight_rs::Host>) -> Result<(), keylight_rs::Error> {
//!     let config = PlatformConfig::default();
//!     let registry = Registry::from_config(host, &config)?;
//!
//!     // Forward what your mDNS browser sees through `sender`, and let it
//!     // forget the services that come back on `removals`.
//!     let (discovery, sender, removals) = ChannelDiscovery::new();
//!     DiscoveryBridge::new(registry.clone(), Arc::new(discovery), &config)
//!         .run()
//!         .await
//! }
//! ```
//!
//! ## Failure policy
//!
//! A light that fails a single request is treated as gone: the accessory is
//! removed from the registry and unregistered from the host, and the error is
//! returned to the caller. Nothing is retried. The light comes back the next
//! time discovery announces it.
//!
//! ## Communication
//!
//! Lights are controlled over HTTP at `http://{address}:{port}/elgato/lights`.
//! Reads are `GET`, writes are a sparse `PUT` that only carries the fields
//! being changed.

mod accessory;
mod client;
mod command;
mod config;
mod controls;
mod discovery;
mod endpoint;
mod errors;
mod host;
mod registry;
mod status;
mod types;

// Re-export public API
pub use accessory::{Accessory, AccessoryContext, AccessoryRecord};
pub use client::DeviceClient;
pub use command::DeviceCommand;
pub use config::{PLATFORM_NAME, PLUGIN_NAME, PlatformConfig, SERVICE_TYPE};
pub use controls::LightControls;
pub use discovery::{
    Announcement, ChannelDiscovery, Discovery, DiscoveryBridge, DiscoveryEvent, DiscoveryHandle,
    DiscoverySender, ServiceRemovals, ServiceRemoved,
};
pub use endpoint::Endpoint;
pub use errors::{Error, UnreachableCause};
pub use host::Host;
pub use registry::Registry;
pub use status::DeviceStatus;
pub use types::{Brightness, Property, PropertyValue, Temperature};
