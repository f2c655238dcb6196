#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use futures::{FutureExt, StreamExt};
use keylight_rs::{Accessory, DeviceClient, Endpoint, Host, Registry, ServiceRemovals, ServiceRemoved};
use uuid::Uuid;
use wiremock::MockServer;

/// Host double that records registrations in call order.
#[derive(Default)]
pub struct RecordingHost {
    registered: Mutex<Vec<Uuid>>,
    unregistered: Mutex<Vec<Uuid>>,
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
    pub fn registered(&self) -> Vec<Uuid> {
        self.registered.lock().unwrap().clone()
    }

    pub fn unregistered(&self) -> Vec<Uuid> {
        self.unregistered.lock().unwrap().clone()
    }
}

pub fn registry() -> (Arc<RecordingHost>, Registry) {
    let host = Arc::new(RecordingHost::default());
    let registry = Registry::new(host.clone(), DeviceClient::new());
    (host, registry)
}

pub fn endpoint_for(server: &MockServer) -> Endpoint {
    let address = server.address();
    Endpoint::resolve(address.ip(), address.port())
}

/// Removal notifications delivered so far, without waiting for more.
pub fn drain(removals: &mut ServiceRemovals) -> Vec<ServiceRemoved> {
    let mut seen = Vec::new();
    while let Some(Some(removed)) = removals.next().now_or_never() {
        seen.push(removed);
    }
    seen
}
