//! Live-update fabric for GifStream.
//!
//! A [`Broadcaster`] keeps the set of active subscribers and fans every
//! newly committed key out to them. Each subscriber gets its own bounded
//! mailbox and delivery never waits on it: a subscriber whose mailbox is
//! full or closed is dropped on the spot, so one stalled consumer cannot
//! hold up the rest.
//!
//! [`relay`] connects one [`Subscription`] to a remote [`Transport`] and
//! unsubscribes it the first time a push fails.

pub mod broadcaster;
pub mod config;
pub mod error;
pub mod relay;

pub use broadcaster::{Broadcaster, PublishReport, SubscriberId, Subscription};
pub use config::BroadcastConfig;
pub use error::{FabricError, FabricResult};
pub use relay::{relay, Transport};
