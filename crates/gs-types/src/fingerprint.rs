use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Number of digest bytes kept in a [`Fingerprint`].
pub const FINGERPRINT_LEN: usize = 10;

/// Content-derived key for a stored image.
///
/// A `Fingerprint` is a truncated cryptographic digest of the submitted
/// bytes. Identical payloads always produce the same fingerprint, which is
/// what lets a resubmission land on the existing entry. Collisions of the
/// truncated digest are an accepted risk.
///
/// The textual form is 20 lowercase hex characters, used in URLs, JSON and
/// on the live-update stream.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Build from the leading bytes of a digest. Extra bytes are ignored.
    ///
    /// Returns `TypeError::InvalidLength` if `digest` is shorter than
    /// [`FINGERPRINT_LEN`].
    pub fn from_digest(digest: &[u8]) -> Result<Self, TypeError> {
        let prefix = digest
            .get(..FINGERPRINT_LEN)
            .ok_or(TypeError::InvalidLength {
                expected: FINGERPRINT_LEN,
                actual: digest.len(),
            })?;
        let mut arr = [0u8; FINGERPRINT_LEN];
        arr.copy_from_slice(prefix);
        Ok(Self(arr))
    }

    /// Create from raw bytes. Use a hasher for production code.
    pub const fn from_raw(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }

    /// The raw truncated digest.
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hex string of exactly `2 * FINGERPRINT_LEN` characters.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != FINGERPRINT_LEN {
            return Err(TypeError::InvalidLength {
                expected: FINGERPRINT_LEN,
                actual: bytes.len(),
            });
        }
        Self::from_digest(&bytes)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; FINGERPRINT_LEN]> for Fingerprint {
    fn from(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
