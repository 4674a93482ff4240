use std::fmt;
use std::time::Duration;

use gs_types::Fingerprint;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::index::ObjectIndex;
use crate::object::StoredObject;

/// Acknowledgement of an accepted `put`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PutConfirmation {
    /// The key that was written.
    pub key: Fingerprint,
    /// `true` if the key was new, `false` if an existing entry was replaced.
    pub created: bool,
}

/// Point-in-time size of the store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of distinct keys.
    pub objects: usize,
    /// Original plus derived bytes across all objects.
    pub bytes: u64,
}

/// A request to the actor. Each carries its own single-use reply channel.
enum StoreCommand {
    Put {
        key: Fingerprint,
        object: StoredObject,
        reply: oneshot::Sender<PutConfirmation>,
    },
    Get {
        key: Fingerprint,
        reply: oneshot::Sender<Option<StoredObject>>,
    },
    All {
        reply: oneshot::Sender<Vec<Fingerprint>>,
    },
    Len {
        reply: oneshot::Sender<usize>,
    },
    Stats {
        reply: oneshot::Sender<StoreStats>,
    },
    Contains {
        key: Fingerprint,
        reply: oneshot::Sender<bool>,
    },
}

/// Start a store actor on the current tokio runtime.
///
/// The actor owns a fresh [`ObjectIndex`] and runs until every
/// [`StoreHandle`] for it has been dropped.
pub fn spawn(config: StoreConfig) -> StoreHandle {
    let (tx, rx) = mpsc::channel(config.mailbox_capacity.max(1));
    tokio::spawn(run(ObjectIndex::new(), rx));
    StoreHandle {
        tx,
        request_timeout: config.request_timeout(),
    }
}

async fn run(mut index: ObjectIndex, mut rx: mpsc::Receiver<StoreCommand>) {
    debug!("object store started");
    while let Some(command) = rx.recv().await {
        handle(&mut index, command);
    }
    debug!(objects = index.len(), "object store stopped");
}

fn handle(index: &mut ObjectIndex, command: StoreCommand) {
    // A failed reply means the caller gave up; the oneshot drops the value.
    let delivered = match command {
        StoreCommand::Put { key, object, reply } => {
            let created = index.insert(key, object);
            debug!(key = %key, created, objects = index.len(), "object committed");
            reply.send(PutConfirmation { key, created }).is_ok()
        }
        StoreCommand::Get { key, reply } => reply.send(index.get(&key).cloned()).is_ok(),
        StoreCommand::All { reply } => reply.send(index.keys().to_vec()).is_ok(),
        StoreCommand::Len { reply } => reply.send(index.len()).is_ok(),
        StoreCommand::Stats { reply } => reply
            .send(StoreStats {
                objects: index.len(),
                bytes: index.total_bytes(),
            })
            .is_ok(),
        StoreCommand::Contains { key, reply } => reply.send(index.contains(&key)).is_ok(),
    };
    if !delivered {
        trace!("caller abandoned store request; reply discarded");
    }
}

/// Cloneable handle to a running store actor.
///
/// Every method is a request/response exchange: the request is queued in the
/// actor's mailbox and the caller waits for the reply, at most
/// `request_timeout` in total.
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<StoreCommand>,
    request_timeout: Duration,
}

impl StoreHandle {
    /// Insert or overwrite `key -> object`.
    ///
    /// Once this returns, the object is visible to every later `get`/`all`.
    /// A `Timeout` does not prove the write was lost: the actor may still
    /// apply a request it had already accepted.
    pub async fn put(&self, key: Fingerprint, object: StoredObject) -> StoreResult<PutConfirmation> {
        self.request(|reply| StoreCommand::Put { key, object, reply })
            .await
    }

    /// Current object for `key`, or `None` if it was never stored.
    pub async fn get(&self, key: Fingerprint) -> StoreResult<Option<StoredObject>> {
        self.request(|reply| StoreCommand::Get { key, reply }).await
    }

    /// Snapshot of all keys in submission order.
    pub async fn all(&self) -> StoreResult<Vec<Fingerprint>> {
        self.request(|reply| StoreCommand::All { reply }).await
    }

    /// Number of distinct stored keys.
    pub async fn len(&self) -> StoreResult<usize> {
        self.request(|reply| StoreCommand::Len { reply }).await
    }

    /// Object count and byte total, read in one exchange.
    pub async fn stats(&self) -> StoreResult<StoreStats> {
        self.request(|reply| StoreCommand::Stats { reply }).await
    }

    /// Returns `true` if nothing is stored.
    pub async fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len().await? == 0)
    }

    /// Whether `key` is stored.
    pub async fn contains(&self, key: Fingerprint) -> StoreResult<bool> {
        self.request(|reply| StoreCommand::Contains { key, reply })
            .await
    }

    /// Whether the actor task is still accepting requests.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> StoreCommand,
    ) -> StoreResult<T> {
        let (reply, response) = oneshot::channel();
        let exchange = async {
            self.tx
                .send(command(reply))
                .await
                .map_err(|_| StoreError::Closed)?;
            response.await.map_err(|_| StoreError::Closed)
        };
        tokio::time::timeout(self.request_timeout, exchange)
            .await
            .map_err(|_| StoreError::Timeout(self.request_timeout))?
    }
}

impl fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreHandle")
            .field("closed", &self.is_closed())
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
