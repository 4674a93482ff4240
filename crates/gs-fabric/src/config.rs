use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the [`Broadcaster`](crate::Broadcaster) and relays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Keys that may wait in one subscriber's mailbox before it is
    /// considered unreachable.
    pub subscriber_capacity: usize,
    /// Upper bound for a single transport push, in milliseconds.
    pub delivery_timeout_ms: u64,
}

impl BroadcastConfig {
    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_millis(self.delivery_timeout_ms)
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            subscriber_capacity: 16,
            delivery_timeout_ms: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = BroadcastConfig::default();
        assert_eq!(c.subscriber_capacity, 16);
        assert_eq!(c.delivery_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn toml_override() {
        let c: BroadcastConfig = toml::from_str("subscriber_capacity = 4").unwrap();
        assert_eq!(c.subscriber_capacity, 4);
        assert_eq!(c.delivery_timeout_ms, 10_000);
    }
}
