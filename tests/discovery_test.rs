#![allow(clippy::unwrap_used)]
// Discovery-to-registry lifecycle tests driven through a channel feed.

mod common;

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use keylight_rs::{
    AccessoryRecord, ChannelDiscovery, Discovery, DiscoveryBridge, DiscoveryHandle, Endpoint,
    PlatformConfig, ServiceRemoved,
};

use common::{drain, endpoint_for, registry};

const DESK: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 50));

fn h1() -> DiscoveryHandle {
    DiscoveryHandle(json!({"referrer": {"address": "192.168.1.50"}, "id": "h1"}))
}

#[tokio::test]
async fn test_up_registers_desk_light() {
    let (host, registry) = registry();
    let (discovery, sender, _removals) = ChannelDiscovery::new();
    let bridge = DiscoveryBridge::new(
        registry.clone(),
        Arc::new(discovery),
        &PlatformConfig::default(),
    );

    sender.up("Desk Light", DESK, 9123, h1());
    sender.close();
    bridge.run().await.unwrap();

    let accessories = registry.accessories();
    assert_eq!(accessories.len(), 1);
    assert_eq!(accessories[0].name(), "Desk Light");
    assert_eq!(
        accessories[0].endpoint().as_str(),
        "http://192.168.1.50:9123/elgato/lights"
    );
    assert_eq!(host.registered(), vec![accessories[0].identity()]);
}

#[tokio::test]
async fn test_duplicate_up_registers_once() {
    let (host, registry) = registry();
    let (discovery, sender, _removals) = ChannelDiscovery::new();
    let bridge = DiscoveryBridge::new(
        registry.clone(),
        Arc::new(discovery),
        &PlatformConfig::default(),
    );

    sender.up("Desk Light", DESK, 9123, h1());
    sender.up("Desk Light", DESK, 9123, h1());
    sender.close();
    bridge.run().await.unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(host.registered().len(), 1);
}

#[tokio::test]
async fn test_down_removes_and_notifies_discovery() {
    let (host, registry) = registry();
    let (discovery, sender, mut removals) = ChannelDiscovery::new();
    let bridge = DiscoveryBridge::new(
        registry.clone(),
        Arc::new(discovery),
        &PlatformConfig::default(),
    );

    sender.up("Desk Light", DESK, 9123, h1());
    sender.down("Desk Light", DESK, 9123, h1());
    sender.down("Desk Light", DESK, 9123, h1());
    sender.close();
    bridge.run().await.unwrap();

    let identity = Endpoint::resolve(DESK, 9123).identity();
    assert!(registry.is_empty());
    assert_eq!(host.unregistered(), vec![identity]);
    assert_eq!(
        drain(&mut removals),
        vec![ServiceRemoved {
            service_name: "Desk Light".to_string(),
            handle: h1(),
        }]
    );
}

#[tokio::test]
async fn test_down_then_up_last_event_wins() {
    let (_host, registry) = registry();
    let (discovery, sender, _removals) = ChannelDiscovery::new();
    let bridge = DiscoveryBridge::new(
        registry.clone(),
        Arc::new(discovery),
        &PlatformConfig::default(),
    );

    sender.up("Desk Light", DESK, 9123, h1());
    sender.down("Desk Light", DESK, 9123, h1());
    sender.up("Desk Light", DESK, 9123, h1());
    sender.close();
    bridge.run().await.unwrap();

    assert!(registry.contains(Endpoint::resolve(DESK, 9123).identity()));
}

#[tokio::test]
async fn test_restored_accessory_is_removed_by_down() {
    let (host, registry) = registry();
    let record = AccessoryRecord::new("Desk Light", Endpoint::resolve(DESK, 9123), Some(h1()));
    registry.restore(record.context()).unwrap();

    let (discovery, sender, mut removals) = ChannelDiscovery::new();
    let bridge = DiscoveryBridge::new(
        registry.clone(),
        Arc::new(discovery),
        &PlatformConfig::default(),
    );

    // The light is already known, so this announcement changes nothing.
    sender.up("Desk Light", DESK, 9123, h1());
    sender.down("Desk Light", DESK, 9123, h1());
    sender.close();
    bridge.run().await.unwrap();

    assert!(registry.is_empty());
    assert!(host.registered().is_empty());
    assert_eq!(host.unregistered(), vec![record.identity()]);
    assert_eq!(drain(&mut removals).len(), 1);
}

#[tokio::test]
async fn test_second_run_fails_to_subscribe() {
    let (_host, registry) = registry();
    let (discovery, sender, _removals) = ChannelDiscovery::new();
    let discovery: Arc<dyn Discovery> = Arc::new(discovery);
    let config = PlatformConfig::default();

    sender.close();
    DiscoveryBridge::new(registry.clone(), discovery.clone(), &config)
        .run()
        .await
        .unwrap();

    let result = DiscoveryBridge::new(registry, discovery, &config).run().await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_spawned_bridge_feeds_controls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "numberOfLights": 1,
            "lights": [{ "on": 0, "brightness": 12, "temperature": 250 }]
        })))
        .mount(&server)
        .await;

    let (_host, registry) = registry();
    let (discovery, sender, _removals) = ChannelDiscovery::new();
    let task = DiscoveryBridge::new(
        registry.clone(),
        Arc::new(discovery),
        &PlatformConfig::default(),
    )
    .spawn();

    let address = server.address();
    sender.up("Studio Light", address.ip(), address.port(), DiscoveryHandle::default());
    sender.close();
    task.await.unwrap().unwrap();

    let accessory = registry.get_by_endpoint(&endpoint_for(&server)).unwrap();
    assert!(!accessory.controls().read_power().await.unwrap());
    assert_eq!(accessory.controls().read_brightness().await.unwrap().value(), 12);
}

#[tokio::test]
async fn test_removals_do_not_pile_up_once_consumed() {
    let (_host, registry) = registry();
    let (discovery, sender, mut removals) = ChannelDiscovery::new();
    let task = DiscoveryBridge::new(
        registry.clone(),
        Arc::new(discovery),
        &PlatformConfig::default(),
    )
    .spawn();

    for port in 9000..9100 {
        sender.up("Key Light", DESK, port, h1());
        sender.down("Key Light", DESK, port, h1());
    }
    sender.close();
    task.await.unwrap().unwrap();

    assert!(registry.is_empty());
    assert_eq!(drain(&mut removals).len(), 100);
    assert!(drain(&mut removals).is_empty());
}
