//! The home-automation host the accessories are published to.

use crate::accessory::Accessory;

/// Registration surface of the host platform.
///
/// The registry calls these while holding its lock, so implementations must
/// not call back into the [`Registry`](crate::Registry) synchronously. They
/// are free to spawn work that does.
pub trait Host: Send + Sync {
    /// Publish a newly discovered accessory. Not called for restored ones.
    fn register(&self, accessory: &Accessory);

    /// Withdraw an accessory that was registered or restored.
    fn unregister(&self, accessory: &Accessory);
}
