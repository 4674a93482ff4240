use std::time::Duration;

use crate::broadcaster::SubscriberId;

/// Errors produced by the live-update fabric.
#[derive(Debug, thiserror::Error)]
pub enum FabricError {
    /// A subscriber could not take a notification and was unregistered.
    #[error("subscriber {id} unreachable: {reason}")]
    SubscriberUnreachable { id: SubscriberId, reason: String },

    /// The transport failed to push a key to the remote listener.
    #[error("transport error: {0}")]
    Transport(String),

    /// The transport did not finish a push within the delivery timeout.
    #[error("delivery to subscriber {id} timed out after {timeout:?}")]
    DeliveryTimeout { id: SubscriberId, timeout: Duration },
}

/// Convenience alias used throughout the fabric crate.
pub type FabricResult<T> = std::result::Result<T, FabricError>;
