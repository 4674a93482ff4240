use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use gs_types::Fingerprint;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::config::BroadcastConfig;
use crate::error::FabricError;

/// Process-local identity of a subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Outcome of one [`Broadcaster::publish`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Subscribers whose mailbox accepted the key.
    pub delivered: usize,
    /// Subscribers found unreachable and unregistered by this call.
    pub dropped: usize,
}

/// Registry entry: the sending half of a mailbox plus the liveness flag
/// shared with the [`Subscription`].
struct Slot {
    sender: mpsc::Sender<Fingerprint>,
    active: Arc<AtomicBool>,
}

impl Slot {
    fn retire(&self) {
        self.active.store(false, Ordering::Release);
    }
}

struct Registry {
    subscribers: Mutex<HashMap<SubscriberId, Slot>>,
    next_id: AtomicU64,
    capacity: usize,
}

impl Registry {
    fn lock(&self) -> MutexGuard<'_, HashMap<SubscriberId, Slot>> {
        // Nothing panics while the lock is held, so a poisoned map is still consistent.
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, id: SubscriberId) -> bool {
        let mut subs = self.lock();
        match subs.remove(&id) {
            Some(slot) => {
                slot.retire();
                debug!(subscriber = %id, remaining = subs.len(), "subscriber removed");
                true
            }
            None => false,
        }
    }
}

/// Fan-out of committed keys to live subscribers.
///
/// Membership changes and fan-out are serialized by one internal mutex, so
/// a subscriber added or removed concurrently with a `publish` is either
/// fully in or fully out of that publish. Cloning a `Broadcaster` yields
/// another handle to the same subscriber set.
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<Registry>,
}

impl Broadcaster {
    /// Create a broadcaster with no subscribers.
    pub fn new(config: &BroadcastConfig) -> Self {
        Self {
            registry: Arc::new(Registry {
                subscribers: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                capacity: config.subscriber_capacity.max(1),
            }),
        }
    }

    /// Register a new subscriber and return its handle immediately.
    pub fn subscribe(&self) -> Subscription {
        let id = SubscriberId(self.registry.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = mpsc::channel(self.registry.capacity);
        let active = Arc::new(AtomicBool::new(true));

        let mut subs = self.registry.lock();
        subs.insert(
            id,
            Slot {
                sender,
                active: Arc::clone(&active),
            },
        );
        debug!(subscriber = %id, total = subs.len(), "subscriber registered");

        Subscription {
            id,
            receiver,
            active,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Unregister a subscriber. Unknown or already removed ids are ignored.
    ///
    /// Returns `true` if the subscriber was registered.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.registry.remove(id)
    }

    /// Offer `key` to every registered subscriber without waiting on any of
    /// them. Subscribers that cannot take it are unregistered.
    pub fn publish(&self, key: Fingerprint) -> PublishReport {
        let mut report = PublishReport::default();
        let mut subs = self.registry.lock();
        subs.retain(|id, slot| match slot.sender.try_send(key) {
            Ok(()) => {
                report.delivered += 1;
                true
            }
            Err(err) => {
                let reason = match err {
                    TrySendError::Full(_) => "mailbox full",
                    TrySendError::Closed(_) => "receiver dropped",
                };
                let err = FabricError::SubscriberUnreachable {
                    id: *id,
                    reason: reason.into(),
                };
                warn!(key = %key, error = %err, "dropping subscriber");
                slot.retire();
                report.dropped += 1;
                false
            }
        });
        debug!(
            key = %key,
            delivered = report.delivered,
            dropped = report.dropped,
            "key published"
        );
        report
    }

    /// Current number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().len()
    }
}

impl fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broadcaster")
            .field("subscriber_count", &self.subscriber_count())
            .field("capacity", &self.registry.capacity)
            .finish()
    }
}

/// Receiving end of one subscriber registration.
///
/// Keys arrive in publish order. Once the registration is removed, by
/// [`Broadcaster::unsubscribe`], by a failed delivery, or by dropping this
/// value, `recv` returns `None` even if keys were still buffered.
pub struct Subscription {
    id: SubscriberId,
    receiver: mpsc::Receiver<Fingerprint>,
    active: Arc<AtomicBool>,
    registry: Weak<Registry>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Whether the broadcaster still counts this subscriber as a member.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Wait for the next key. `None` once the subscription has ended.
    pub async fn recv(&mut self) -> Option<Fingerprint> {
        if !self.is_active() {
            return None;
        }
        let key = self.receiver.recv().await?;
        self.is_active().then_some(key)
    }

    /// Take the next buffered key without waiting.
    pub fn try_recv(&mut self) -> Option<Fingerprint> {
        if !self.is_active() {
            return None;
        }
        let key = self.receiver.try_recv().ok()?;
        self.is_active().then_some(key)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
