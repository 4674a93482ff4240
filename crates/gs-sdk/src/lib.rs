//! High-level SDK for GifStream.
//!
//! [`Hub`] is the entry point: it owns one object store actor, one
//! broadcaster and the [`IngestPipeline`] that is the only path writing to
//! both. Hubs are explicitly constructed and passed around; nothing here is
//! a process-wide global.

pub mod codec;
pub mod error;
pub mod hub;
pub mod pipeline;

pub use codec::{Codec, DecodeError, GifSnapshotCodec};
pub use error::{SdkError, SdkResult};
pub use hub::{Hub, HubConfig, HubStats};
pub use pipeline::IngestPipeline;

// Re-export key types
pub use gs_fabric::{BroadcastConfig, Broadcaster, SubscriberId, Subscription};
pub use gs_store::{StoreConfig, StoredObject};
pub use gs_types::Fingerprint;
