//! Discovery feed and the bridge that turns announcements into registry updates.

use std::net::IpAddr;
use std::sync::{Arc, Mutex, PoisonError};

use futures::StreamExt;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::PlatformConfig;
use crate::endpoint::Endpoint;
use crate::errors::Error;
use crate::registry::Registry;

type Result<T> = std::result::Result<T, Error>;

/// Opaque data the discovery subsystem needs to forget a service later.
///
/// Stored with each accessory and persisted by the host, so it must
/// round-trip through JSON untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscoveryHandle(pub Value);

/// A single service announcement as emitted by the discovery subsystem.
///
/// Only the address and port are kept, so an IPv6 scope id is lost: a
/// link-local (`fe80::/10`) announcement resolves to an endpoint nothing can
/// reach. Browsers should prefer a routable address when a light announces
/// several.
#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub service_name: String,
    pub address: IpAddr,
    pub port: u16,
    pub handle: DiscoveryHandle,
}

impl Announcement {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::resolve(self.address, self.port)
    }
}

/// Service appeared or went away.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryEvent {
    Up(Announcement),
    Down(Announcement),
}

/// An mDNS/DNS-SD browser, or anything that behaves like one.
pub trait Discovery: Send + Sync {
    /// Start listening for announcements of `service_type`.
    fn subscribe(&self, service_type: &str)
    -> BoxFuture<'_, Result<BoxStream<'static, DiscoveryEvent>>>;

    /// Tell the subsystem a remote service is gone. Fire-and-forget.
    fn notify_service_removed(&self, service_name: &str, handle: &DiscoveryHandle);
}

/// A service the registry forgot, handed back to the embedder's browser.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRemoved {
    pub service_name: String,
    pub handle: DiscoveryHandle,
}

/// Receiving half of the removal notifications of a [`ChannelDiscovery`].
///
/// Dropping it is fine; notifications are then discarded.
pub type ServiceRemovals = UnboundedReceiver<ServiceRemoved>;

/// In-process [`Discovery`] fed through a channel.
///
/// Useful when the embedding host already runs its own mDNS browser and
/// just needs to forward what it sees. Removal notifications flow back the
/// other way on [`ServiceRemovals`].
pub struct ChannelDiscovery {
    receiver: Mutex<Option<UnboundedReceiver<DiscoveryEvent>>>,
    removals: UnboundedSender<ServiceRemoved>,
}

/// Sending half of a [`ChannelDiscovery`].
#[derive(Debug, Clone)]
pub struct DiscoverySender(UnboundedSender<DiscoveryEvent>);

impl ChannelDiscovery {
    pub fn new() -> (Self, DiscoverySender, ServiceRemovals) {
        let (tx, rx) = mpsc::unbounded();
        let (removals_tx, removals_rx) = mpsc::unbounded();
        let discovery = ChannelDiscovery {
            receiver: Mutex::new(Some(rx)),
            removals: removals_tx,
        };
        (discovery, DiscoverySender(tx), removals_rx)
    }
}

impl Discovery for ChannelDiscovery {
    fn subscribe(
        &self,
        service_type: &str,
    ) -> BoxFuture<'_, Result<BoxStream<'static, DiscoveryEvent>>> {
        let receiver = self
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let service_type = service_type.to_string();
        Box::pin(async move {
            debug!("Subscribing to _{service_type}._tcp announcements");
            receiver
                .map(|rx| rx.boxed())
                .ok_or_else(|| Error::Discovery("channel feed already subscribed".to_string()))
        })
    }

    fn notify_service_removed(&self, service_name: &str, handle: &DiscoveryHandle) {
        let removed = ServiceRemoved {
            service_name: service_name.to_string(),
            handle: handle.clone(),
        };
        if self.removals.unbounded_send(removed).is_err() {
            debug!("Removal of {service_name} dropped, nobody is listening");
        }
    }
}

impl DiscoverySender {
    /// Forward an event. Returns `false` once the feed has been dropped.
    pub fn send(&self, event: DiscoveryEvent) -> bool {
        self.0.unbounded_send(event).is_ok()
    }

    pub fn up(&self, service_name: &str, address: IpAddr, port: u16, handle: DiscoveryHandle) -> bool {
        self.send(DiscoveryEvent::Up(Announcement {
            service_name: service_name.to_string(),
            address,
            port,
            handle,
        }))
    }

    pub fn down(&self, service_name: &str, address: IpAddr, port: u16, handle: DiscoveryHandle) -> bool {
        self.send(DiscoveryEvent::Down(Announcement {
            service_name: service_name.to_string(),
            address,
            port,
            handle,
        }))
    }

    /// End the feed; a running bridge returns once it drains.
    pub fn close(&self) {
        self.0.close_channel();
    }
}

/// Applies discovery events to a [`Registry`] in the order they arrive.
///
/// There is no sequencing token: when a `Down` and an `Up` for the same
/// endpoint race, whichever is processed last determines the outcome.
pub struct DiscoveryBridge {
    registry: Registry,
    discovery: Arc<dyn Discovery>,
    service_type: String,
}

impl DiscoveryBridge {
    pub fn new(registry: Registry, discovery: Arc<dyn Discovery>, config: &PlatformConfig) -> Self {
        DiscoveryBridge {
            registry,
            discovery,
            service_type: config.service_type.clone(),
        }
    }

    pub fn handle_event(&self, event: DiscoveryEvent) {
        match event {
            DiscoveryEvent::Up(announcement) => {
                let endpoint = announcement.endpoint();
                self.registry.add(
                    &announcement.service_name,
                    endpoint,
                    Some(announcement.handle),
                );
            }
            DiscoveryEvent::Down(announcement) => {
                self.registry.remove_by_endpoint(&announcement.endpoint());
            }
        }
    }

    /// Subscribe and apply events until the feed ends.
    pub async fn run(self) -> Result<()> {
        let mut events = self.discovery.subscribe(&self.service_type).await?;
        self.registry.attach_discovery(Arc::clone(&self.discovery));
        info!("Listening for {} announcements", self.service_type);

        while let Some(event) = events.next().await {
            self.handle_event(event);
        }

        info!("Discovery feed for {} ended", self.service_type);
        Ok(())
    }

    /// Run the bridge on a tokio task.
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(self.run())
    }
}
