use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tuning for the store actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of requests that may queue in the actor's mailbox before
    /// callers start waiting to enqueue.
    pub mailbox_capacity: usize,
    /// How long a caller waits for the actor's reply, in milliseconds.
    pub request_timeout_ms: u64,
}

impl StoreConfig {
    /// The request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 256,
            request_timeout_ms: 5_000,
        }
    }
}
