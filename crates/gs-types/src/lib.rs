//! Foundation types for GifStream.
//!
//! Every other GifStream crate depends on `gs-types`. The only identity in
//! the system is the [`Fingerprint`]: a short, content-derived key naming a
//! stored image.

pub mod error;
pub mod fingerprint;

pub use error::TypeError;
pub use fingerprint::{Fingerprint, FINGERPRINT_LEN};
