//! Content key derivation for GifStream.
//!
//! Wraps BLAKE3 with a domain tag and truncates the digest to a
//! [`Fingerprint`](gs_types::Fingerprint). No custom cryptography.

pub mod hasher;

pub use hasher::{fingerprint, ContentHasher};
