//! The process-wide index of registered accessories.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info};
use uuid::Uuid;

use crate::accessory::{Accessory, AccessoryContext, AccessoryRecord};
use crate::client::DeviceClient;
use crate::config::PlatformConfig;
use crate::controls::LightControls;
use crate::discovery::{Discovery, DiscoveryHandle};
use crate::endpoint::Endpoint;
use crate::errors::Error;
use crate::host::Host;

type Result<T> = std::result::Result<T, Error>;

/// Maps accessory identities to live registrations and keeps the host in step.
///
/// At most one accessory exists per identity, and an accessory is
/// unregistered from the host exactly when it leaves the registry. Every
/// operation is idempotent: adding a known endpoint or removing an unknown
/// identity does nothing.
///
/// Construct one per process and hand clones to the discovery bridge; the
/// control handlers of each accessory hold a weak link back to it.
#[derive(Clone)]
pub struct Registry {
    shared: Arc<Shared>,
}

pub(crate) struct Shared {
    host: Arc<dyn Host>,
    client: DeviceClient,
    clamp_temperature: bool,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    accessories: HashMap<Uuid, Accessory>,
    discovery: Option<Arc<dyn Discovery>>,
    next_generation: u64,
}

impl Registry {
    pub fn new(host: Arc<dyn Host>, client: DeviceClient) -> Self {
        Self::build(host, client, PlatformConfig::default().clamp_temperature)
    }

    /// Build a registry whose device client follows `config`.
    pub fn from_config(host: Arc<dyn Host>, config: &PlatformConfig) -> Result<Self> {
        let client = DeviceClient::from_config(config)?;
        Ok(Self::build(host, client, config.clamp_temperature))
    }

    fn build(host: Arc<dyn Host>, client: DeviceClient, clamp_temperature: bool) -> Self {
        Registry {
            shared: Arc::new(Shared {
                host,
                client,
                clamp_temperature,
                state: Mutex::new(State::default()),
            }),
        }
    }

    /// Let removals notify the discovery subsystem from now on.
    pub fn attach_discovery(&self, discovery: Arc<dyn Discovery>) {
        self.shared.lock().discovery = Some(discovery);
    }

    /// Re-admit an accessory the host persisted in an earlier run.
    ///
    /// The host already knows the accessory, so it is not registered again.
    /// Restoring an identity that is already present returns the existing
    /// accessory without wiring a second set of handlers.
    pub fn restore(&self, context: AccessoryContext) -> Result<Accessory> {
        let record = AccessoryRecord::try_from(context)?;
        let mut state = self.shared.lock();

        if let Some(existing) = state.accessories.get(&record.identity()) {
            debug!("{} is already restored", existing.name());
            return Ok(existing.clone());
        }

        let accessory = self.shared.wire(&mut state, record);
        info!("Restored {} at {}", accessory.name(), accessory.endpoint());
        state
            .accessories
            .insert(accessory.identity(), accessory.clone());
        Ok(accessory)
    }

    /// Register a discovered device, unless its endpoint is already known.
    ///
    /// Returns the identity either way. Duplicate announcements (e.g. the
    /// same light seen on two interfaces) leave the existing record as is.
    pub fn add(&self, name: &str, endpoint: Endpoint, handle: Option<DiscoveryHandle>) -> Uuid {
        let identity = endpoint.identity();
        let mut state = self.shared.lock();

        if state.accessories.contains_key(&identity) {
            debug!("Ignoring duplicate announcement of {name} at {endpoint}");
            return identity;
        }

        let record = AccessoryRecord::new(name, endpoint, handle);
        let accessory = self.shared.wire(&mut state, record);
        info!("Discovered {} at {}", accessory.name(), accessory.endpoint());
        state.accessories.insert(identity, accessory.clone());
        self.shared.host.register(&accessory);
        identity
    }

    pub fn remove_by_endpoint(&self, endpoint: &Endpoint) -> bool {
        self.remove_by_identity(endpoint.identity())
    }

    /// Drop an accessory, unregister it from the host and tell discovery.
    ///
    /// Returns whether anything was removed.
    pub fn remove_by_identity(&self, identity: Uuid) -> bool {
        self.shared.remove(identity, None)
    }

    pub fn get(&self, identity: Uuid) -> Option<Accessory> {
        self.shared.lock().accessories.get(&identity).cloned()
    }

    pub fn get_by_endpoint(&self, endpoint: &Endpoint) -> Option<Accessory> {
        self.get(endpoint.identity())
    }

    pub fn contains(&self, identity: Uuid) -> bool {
        self.shared.lock().accessories.contains_key(&identity)
    }

    pub fn identities(&self) -> Vec<Uuid> {
        self.shared.lock().accessories.keys().copied().collect()
    }

    pub fn accessories(&self) -> Vec<Accessory> {
        self.shared.lock().accessories.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.shared.lock().accessories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.lock().accessories.is_empty()
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wire(self: &Arc<Self>, state: &mut State, record: AccessoryRecord) -> Accessory {
        state.next_generation += 1;
        let controls = LightControls::new(
            &record,
            state.next_generation,
            self.client.clone(),
            self.clamp_temperature,
            Arc::downgrade(self),
        );
        Accessory::new(record, controls)
    }

    /// Remove `identity`; with a `generation`, only if it is still that registration.
    pub(crate) fn remove(&self, identity: Uuid, generation: Option<u64>) -> bool {
        let mut state = self.lock();

        let Some(current) = state.accessories.get(&identity) else {
            debug!("No accessory {identity} to remove");
            return false;
        };
        if generation.is_some_and(|g| g != current.generation()) {
            debug!("Stale eviction of {identity} ignored");
            return false;
        }
        let Some(accessory) = state.accessories.remove(&identity) else {
            return false;
        };

        info!("{} ({}) disconnected", accessory.name(), accessory.endpoint());
        self.host.unregister(&accessory);

        if let (Some(discovery), Some(handle)) = (&state.discovery, accessory.record().handle()) {
            discovery.notify_service_removed(accessory.name(), handle);
        }
        true
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::discovery::ChannelDiscovery;
    use futures::{FutureExt, StreamExt};
    use serde_json::json;
    use std::net::{IpAddr, Ipv4Addr};

    /// Host double that records every call.
    #[derive(Default)]
    pub(crate) struct RecordingHost {
        pub registered: Mutex<Vec<Uuid>>,
        pub unregistered: Mutex<Vec<Uuid>>,
    }

    impl Host for RecordingHost {
        fn register(&self, accessory: &Accessory) {
            self.registered.lock().unwrap().push(accessory.identity());
        }

        fn unregister(&self, accessory: &Accessory) {
            self.unregistered.lock().unwrap().push(accessory.identity());
        }
    }

    impl RecordingHost {
        pub fn registered(&self) -> usize {
            self.registered.lock().unwrap().len()
        }

        pub fn unregistered(&self) -> usize {
            self.unregistered.lock().unwrap().len()
        }
    }

    fn setup() -> (Arc<RecordingHost>, Registry) {
        let host = Arc::new(RecordingHost::default());
        let registry = Registry::new(host.clone(), DeviceClient::new());
        (host, registry)
    }

    fn endpoint(last: u8) -> Endpoint {
        Endpoint::resolve(IpAddr::V4(Ipv4Addr::new(192, 168, 1, last)), 9123)
    }

    #[test]
    fn test_add_is_idempotent() {
        let (host, registry) = setup();
        let first = registry.add("Desk Light", endpoint(50), None);
        let second = registry.add("Desk Light", endpoint(50), None);

        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
        assert_eq!(host.registered(), 1);
    }

    #[test]
    fn test_later_up_does_not_rename() {
        let (_host, registry) = setup();
        let id = registry.add("Desk Light", endpoint(50), None);
        registry.add("Other Name", endpoint(50), None);
        assert_eq!(registry.get(id).unwrap().name(), "Desk Light");
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (host, registry) = setup();
        assert!(!registry.remove_by_identity(endpoint(1).identity()));
        assert_eq!(host.unregistered(), 0);
    }

    #[test]
    fn test_remove_twice_unregisters_once() {
        let (host, registry) = setup();
        registry.add("Desk Light", endpoint(50), None);
        assert!(registry.remove_by_endpoint(&endpoint(50)));
        assert!(!registry.remove_by_endpoint(&endpoint(50)));
        assert!(registry.is_empty());
        assert_eq!(host.unregistered(), 1);
    }

    #[test]
    fn test_restore_then_remove() {
        let (host, registry) = setup();
        let record = AccessoryRecord::new("Key Light", endpoint(9), None);

        let restored = registry.restore(record.context()).unwrap();
        assert_eq!(restored.identity(), record.identity());
        assert_eq!(host.registered(), 0);

        registry.remove_by_endpoint(record.endpoint());
        assert!(registry.is_empty());
        assert_eq!(host.unregistered(), 1);
    }

    #[test]
    fn test_restore_twice_wires_once() {
        let (_host, registry) = setup();
        let context = AccessoryRecord::new("Key Light", endpoint(9), None).context();

        let first = registry.restore(context.clone()).unwrap();
        let second = registry.restore(context).unwrap();
        assert_eq!(first.generation(), second.generation());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_restore_rejects_incomplete_context() {
        let (_host, registry) = setup();
        let err = registry.restore(AccessoryContext::default()).unwrap_err();
        assert_eq!(err, Error::MissingField("endpoint"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_add_after_restore_is_noop() {
        let (host, registry) = setup();
        let record = AccessoryRecord::new("Key Light", endpoint(9), None);
        registry.restore(record.context()).unwrap();

        registry.add("Key Light", endpoint(9), None);
        assert_eq!(registry.len(), 1);
        assert_eq!(host.registered(), 0);
    }

    #[test]
    fn test_removal_notifies_discovery_when_attached() {
        let (_host, registry) = setup();
        let (discovery, _sender, mut removals) = ChannelDiscovery::new();
        let discovery = Arc::new(discovery);
        let handle = DiscoveryHandle(json!({"id": "h1"}));

        registry.add("Desk Light", endpoint(50), Some(handle.clone()));
        registry.add("No Handle", endpoint(51), None);
        registry.attach_discovery(discovery.clone());

        registry.remove_by_endpoint(&endpoint(50));
        registry.remove_by_endpoint(&endpoint(51));
        let removed = removals.next().now_or_never().flatten().unwrap();
        assert_eq!(removed.service_name, "Desk Light");
        assert_eq!(removed.handle, handle);
        assert!(removals.next().now_or_never().is_none());
    }

    #[test]
    fn test_removal_without_discovery_attached() {
        let (host, registry) = setup();
        registry.add("Desk Light", endpoint(50), Some(DiscoveryHandle(json!("h1"))));
        assert!(registry.remove_by_endpoint(&endpoint(50)));
        assert_eq!(host.unregistered(), 1);
    }

    #[test]
    fn test_stale_generation_is_ignored() {
        let (host, registry) = setup();
        let id = registry.add("Desk Light", endpoint(50), None);
        let old = registry.get(id).unwrap().generation();
        registry.remove_by_identity(id);
        registry.add("Desk Light", endpoint(50), None);

        assert!(!registry.shared.remove(id, Some(old)));
        assert!(registry.contains(id));
        assert_eq!(host.unregistered(), 1);
    }
}
