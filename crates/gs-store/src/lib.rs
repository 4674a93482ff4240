//! Content-addressed in-memory image storage for GifStream.
//!
//! Every submitted image is kept as an immutable [`StoredObject`] under its
//! [`Fingerprint`](gs_types::Fingerprint). The mapping and the submission
//! order live in an [`ObjectIndex`] that is owned by exactly one task, the
//! store actor. Everything else talks to it through a cloneable
//! [`StoreHandle`] by message passing.
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written.
//! 2. Only the actor task touches the index, so the index needs no locks.
//! 3. Operations are totally ordered by the order the actor accepts them.
//! 4. Resubmitting a key overwrites its object but never duplicates it in
//!    the listing.
//! 5. The store never interprets object contents.
//! 6. Nothing is ever evicted.

pub mod actor;
pub mod config;
pub mod error;
pub mod index;
pub mod object;

pub use actor::{spawn, PutConfirmation, StoreHandle, StoreStats};
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use index::ObjectIndex;
pub use object::StoredObject;
