use std::sync::Arc;

use bytes::Bytes;
use gs_fabric::{BroadcastConfig, Broadcaster, SubscriberId, Subscription};
use gs_store::{StoreConfig, StoreHandle, StoredObject};
use gs_types::Fingerprint;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::codec::Codec;
use crate::error::{SdkError, SdkResult};
use crate::pipeline::IngestPipeline;

/// Configuration for a [`Hub`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub store: StoreConfig,
    pub broadcast: BroadcastConfig,
}

/// Point-in-time counters for a hub.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HubStats {
    pub objects: usize,
    /// Original plus derived bytes held by the store.
    pub bytes: u64,
    pub subscribers: usize,
}

/// One independent GifStream instance.
///
/// Owns a store actor, a broadcaster and the ingest pipeline over them.
/// Cloning is cheap and every clone talks to the same instance.
#[derive(Clone)]
pub struct Hub {
    store: StoreHandle,
    broadcaster: Broadcaster,
    pipeline: IngestPipeline,
}

impl Hub {
    /// Start a hub on the current tokio runtime.
    pub fn start(config: HubConfig, codec: Arc<dyn Codec>) -> Self {
        let store = gs_store::spawn(config.store.clone());
        let broadcaster = Broadcaster::new(&config.broadcast);
        let pipeline = IngestPipeline::new(store.clone(), broadcaster.clone(), codec);
        info!(
            mailbox_capacity = config.store.mailbox_capacity,
            subscriber_capacity = config.broadcast.subscriber_capacity,
            "hub started"
        );
        Self {
            store,
            broadcaster,
            pipeline,
        }
    }

    // ---- Writes ----

    /// Decode, store and announce a submitted payload.
    pub async fn ingest(&self, raw: impl Into<Bytes>) -> SdkResult<Fingerprint> {
        self.pipeline.ingest(raw).await
    }

    // ---- Reads ----

    /// The stored image for `key`.
    pub async fn image(&self, key: Fingerprint) -> SdkResult<StoredObject> {
        self.store
            .get(key)
            .await?
            .ok_or(SdkError::NotFound(key))
    }

    /// All keys in submission order.
    pub async fn keys(&self) -> SdkResult<Vec<Fingerprint>> {
        Ok(self.store.all().await?)
    }

    pub async fn stats(&self) -> SdkResult<HubStats> {
        let store = self.store.stats().await?;
        Ok(HubStats {
            objects: store.objects,
            bytes: store.bytes,
            subscribers: self.broadcaster.subscriber_count(),
        })
    }

    // ---- Live updates ----

    pub fn subscribe(&self) -> Subscription {
        self.broadcaster.subscribe()
    }

    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.broadcaster.unsubscribe(id)
    }

    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub")
            .field("store", &self.store)
            .field("broadcaster", &self.broadcaster)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tests::tiny_gif;
    use crate::codec::GifSnapshotCodec;
    use crate::pipeline::tests::ReverseCodec;
    use gs_crypto::fingerprint;
    use std::collections::HashSet;

    fn hub() -> Hub {
        Hub::start(HubConfig::default(), Arc::new(ReverseCodec))
    }

    #[tokio::test]
    async fn scenario_dedup_then_append() {
        let hub = hub();
        let mut watcher = hub.subscribe();

        let k1 = hub.ingest(&b"payload-one"[..]).await.unwrap();
        assert_eq!(k1, fingerprint(b"payload-one"));
        assert_eq!(hub.keys().await.unwrap(), vec![k1]);
        assert_eq!(watcher.recv().await, Some(k1));

        let again = hub.ingest(&b"payload-one"[..]).await.unwrap();
        assert_eq!(again, k1);
        assert_eq!(hub.keys().await.unwrap(), vec![k1]);

        let k2 = hub.ingest(&b"payload-two"[..]).await.unwrap();
        assert_eq!(k2, fingerprint(b"payload-two"));
        assert_eq!(hub.keys().await.unwrap(), vec![k1, k2]);
    }

    #[tokio::test]
    async fn unknown_key_is_not_found() {
        let hub = hub();
        let key = fingerprint(b"never");
        assert!(matches!(hub.image(key).await, Err(SdkError::NotFound(k)) if k == key));
    }

    #[tokio::test]
    async fn image_is_readable_right_after_ingest() {
        let hub = hub();
        let key = hub.ingest(&b"xyz"[..]).await.unwrap();
        let obj = hub.image(key).await.unwrap();
        assert_eq!(obj.original().as_ref(), b"xyz");
        assert_eq!(obj.derived().as_ref(), b"zyx");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn notified_keys_are_always_readable() {
        let hub = hub();
        let mut watcher = hub.subscribe();

        let reader_hub = hub.clone();
        let reader = tokio::spawn(async move {
            for _ in 0..10 {
                let key = watcher.recv().await.expect("subscription ended early");
                reader_hub.image(key).await.expect("notified key must be stored");
            }
        });

        let mut writers = Vec::new();
        for i in 0u8..10 {
            let hub = hub.clone();
            writers.push(tokio::spawn(async move { hub.ingest(vec![i; 4]).await }));
        }
        for w in writers {
            w.await.unwrap().unwrap();
        }
        reader.await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_ingest_lists_each_key_once() {
        let hub = hub();
        let mut tasks = Vec::new();
        for i in 0u16..40 {
            let hub = hub.clone();
            // 20 distinct payloads, each submitted twice.
            tasks.push(tokio::spawn(async move { hub.ingest((i % 20).to_be_bytes().to_vec()).await }));
        }
        let mut expected = HashSet::new();
        for t in tasks {
            expected.insert(t.await.unwrap().unwrap());
        }

        let keys = hub.keys().await.unwrap();
        assert_eq!(keys.len(), 20);
        assert_eq!(keys.iter().copied().collect::<HashSet<_>>(), expected);
    }

    #[tokio::test]
    async fn unsubscribed_watcher_sees_nothing_more() {
        let hub = hub();
        let mut watcher = hub.subscribe();
        hub.ingest(&b"before"[..]).await.unwrap();
        assert!(hub.unsubscribe(watcher.id()));
        hub.ingest(&b"after"[..]).await.unwrap();

        assert_eq!(watcher.recv().await, None);
        assert!(!hub.unsubscribe(watcher.id()));
    }

    #[tokio::test]
    async fn stalled_watcher_does_not_starve_live_one() {
        let hub = Hub::start(
            HubConfig {
                broadcast: BroadcastConfig {
                    subscriber_capacity: 1,
                    ..Default::default()
                },
                ..Default::default()
            },
            Arc::new(ReverseCodec),
        );
        let _stalled = hub.subscribe();
        let mut live = hub.subscribe();

        for payload in [&b"one"[..], b"two", b"three"] {
            let key = hub.ingest(payload).await.unwrap();
            assert_eq!(live.recv().await, Some(key));
        }
        assert_eq!(hub.stats().await.unwrap().subscribers, 1);
    }

    #[tokio::test]
    async fn gif_codec_end_to_end() {
        let hub = Hub::start(HubConfig::default(), Arc::new(GifSnapshotCodec));
        let gif = tiny_gif(42);
        let key = hub.ingest(gif.clone()).await.unwrap();
        let obj = hub.image(key).await.unwrap();
        assert_eq!(obj.original().as_ref(), gif.as_slice());
        assert!(obj.derived().starts_with(b"\x89PNG"));

        assert!(matches!(
            hub.ingest(&b"GIF-but-not-really"[..]).await,
            Err(SdkError::DecodeFailed(_))
        ));
        let stats = hub.stats().await.unwrap();
        assert_eq!(stats.objects, 1);
        assert_eq!(stats.bytes, (gif.len() + obj.derived().len()) as u64);
    }

    #[tokio::test]
    async fn hubs_are_independent() {
        let a = hub();
        let b = hub();
        a.ingest(&b"only-a"[..]).await.unwrap();
        assert_eq!(a.keys().await.unwrap().len(), 1);
        assert!(b.keys().await.unwrap().is_empty());
    }

    #[test]
    fn config_from_toml() {
        let config: HubConfig = toml::from_str(
            r#"
            [store]
            mailbox_capacity = 8

            [broadcast]
            subscriber_capacity = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.store.mailbox_capacity, 8);
        assert_eq!(config.store.request_timeout_ms, 5_000);
        assert_eq!(config.broadcast.subscriber_capacity, 2);
    }
}
