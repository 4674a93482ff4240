use std::sync::Arc;

use bytes::Bytes;
use gs_crypto::fingerprint;
use gs_fabric::Broadcaster;
use gs_store::{StoreHandle, StoredObject};
use gs_types::Fingerprint;
use tracing::{debug, info};

use crate::codec::Codec;
use crate::error::{SdkError, SdkResult};

/// Turns a submitted payload into a stored, announced image.
///
/// Steps run in a fixed order: fingerprint, derive, commit, publish. A
/// payload the codec rejects leaves no trace, and a key is only ever
/// published after the store has confirmed the commit, so a subscriber that
/// reacts to a notification always finds the image.
#[derive(Clone)]
pub struct IngestPipeline {
    store: StoreHandle,
    broadcaster: Broadcaster,
    codec: Arc<dyn Codec>,
}

impl IngestPipeline {
    pub fn new(store: StoreHandle, broadcaster: Broadcaster, codec: Arc<dyn Codec>) -> Self {
        Self {
            store,
            broadcaster,
            codec,
        }
    }

    /// Ingest `raw` and return its key.
    pub async fn ingest(&self, raw: impl Into<Bytes>) -> SdkResult<Fingerprint> {
        let raw = raw.into();
        let key = fingerprint(&raw);
        debug!(key = %key, bytes = raw.len(), "ingest started");

        let derived = self.derive(raw.clone()).await?;
        let confirmation = self.store.put(key, StoredObject::new(raw, derived)).await?;
        let report = self.broadcaster.publish(key);

        info!(
            key = %key,
            created = confirmation.created,
            notified = report.delivered,
            "image ingested"
        );
        Ok(key)
    }

    /// Decoding is CPU-bound, so it runs off the async workers.
    async fn derive(&self, raw: Bytes) -> SdkResult<Bytes> {
        let codec = Arc::clone(&self.codec);
        tokio::task::spawn_blocking(move || codec.decode_and_derive(&raw))
            .await
            .map_err(|e| SdkError::Internal(format!("codec task failed: {e}")))?
            .map_err(SdkError::from)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::codec::DecodeError;
    use gs_fabric::BroadcastConfig;
    use gs_store::StoreConfig;

    /// Accepts anything not starting with `bad`; the derived form is the
    /// input reversed.
    pub(crate) struct ReverseCodec;

    impl Codec for ReverseCodec {
        fn decode_and_derive(&self, raw: &[u8]) -> Result<Bytes, DecodeError> {
            if raw.starts_with(b"bad") {
                return Err(DecodeError::Malformed("rejected by test codec".into()));
            }
            Ok(raw.iter().rev().copied().collect())
        }
    }

    fn pipeline() -> (IngestPipeline, StoreHandle, Broadcaster) {
        let store = gs_store::spawn(StoreConfig::default());
        let broadcaster = Broadcaster::new(&BroadcastConfig::default());
        let pipeline = IngestPipeline::new(store.clone(), broadcaster.clone(), Arc::new(ReverseCodec));
        (pipeline, store, broadcaster)
    }

    #[tokio::test]
    async fn ingest_commits_original_and_derived() {
        let (pipeline, store, _) = pipeline();
        let key = pipeline.ingest(&b"abc"[..]).await.unwrap();
        assert_eq!(key, fingerprint(b"abc"));

        let obj = store.get(key).await.unwrap().unwrap();
        assert_eq!(obj.original().as_ref(), b"abc");
        assert_eq!(obj.derived().as_ref(), b"cba");
    }

    #[tokio::test]
    async fn rejected_payload_changes_nothing() {
        let (pipeline, store, broadcaster) = pipeline();
        let mut sub = broadcaster.subscribe();

        let err = pipeline.ingest(&b"bad bytes"[..]).await.unwrap_err();
        assert!(matches!(err, SdkError::DecodeFailed(_)));
        assert!(store.is_empty().await.unwrap());
        assert_eq!(sub.try_recv(), None);
    }

    #[test]
    fn store_failure_is_reported_and_nothing_is_published() {
        let store_rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let store = store_rt.block_on(async { gs_store::spawn(StoreConfig::default()) });
        drop(store_rt);

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let broadcaster = Broadcaster::new(&BroadcastConfig::default());
            let pipeline = IngestPipeline::new(store, broadcaster.clone(), Arc::new(ReverseCodec));
            let mut sub = broadcaster.subscribe();

            let err = pipeline.ingest(&b"payload"[..]).await.unwrap_err();
            assert!(matches!(err, SdkError::Store(_)));
            assert_eq!(sub.try_recv(), None);
        });
    }
}
