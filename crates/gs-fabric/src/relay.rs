use std::time::Duration;

use async_trait::async_trait;
use gs_types::Fingerprint;
use tracing::{debug, warn};

use crate::broadcaster::{Broadcaster, Subscription};
use crate::error::{FabricError, FabricResult};

/// Pushes keys to one remote listener.
///
/// An error means the listener is unreachable; the relay never retries.
#[async_trait]
pub trait Transport: Send {
    async fn deliver(&mut self, key: &Fingerprint) -> FabricResult<()>;
}

/// Forward every key received by `subscription` to `transport`.
///
/// Each push must finish within `delivery_timeout`. On the first failed or
/// timed-out push the subscriber is unregistered from `broadcaster` and the
/// failure is returned. Returns the number of keys delivered when the
/// subscription ends on its own (unsubscribed elsewhere, or the broadcaster
/// was dropped).
pub async fn relay<T: Transport + ?Sized>(
    broadcaster: &Broadcaster,
    mut subscription: Subscription,
    transport: &mut T,
    delivery_timeout: Duration,
) -> FabricResult<u64> {
    let id = subscription.id();
    let mut delivered = 0u64;
    debug!(subscriber = %id, "relay started");

    while let Some(key) = subscription.recv().await {
        let outcome = match tokio::time::timeout(delivery_timeout, transport.deliver(&key)).await {
            Ok(result) => result,
            Err(_) => Err(FabricError::DeliveryTimeout {
                id,
                timeout: delivery_timeout,
            }),
        };
        if let Err(err) = outcome {
            broadcaster.unsubscribe(id);
            warn!(subscriber = %id, key = %key, error = %err, "listener unreachable");
            return Err(FabricError::SubscriberUnreachable {
                id,
                reason: err.to_string(),
            });
        }
        delivered += 1;
        debug!(subscriber = %id, key = %key, "sent key to listener");
    }

    debug!(subscriber = %id, delivered, "relay finished");
    Ok(delivered)
}
