use gs_types::{Fingerprint, FINGERPRINT_LEN};

/// Domain-separated BLAKE3 content hasher.
///
/// The domain tag is prepended to every hash computation, so the same bytes
/// hashed for different purposes never share a key.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for submitted images.
    pub const IMAGE: Self = Self {
        domain: "gifstream-image-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Fingerprint raw bytes with domain separation.
    pub fn fingerprint(&self, data: &[u8]) -> Fingerprint {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        let digest = hasher.finalize();
        let mut prefix = [0u8; FINGERPRINT_LEN];
        prefix.copy_from_slice(&digest.as_bytes()[..FINGERPRINT_LEN]);
        Fingerprint::from_raw(prefix)
    }
}

/// Derive the store key for an image payload.
///
/// Pure and total: identical bytes always yield the identical key.
pub fn fingerprint(data: &[u8]) -> Fingerprint {
    ContentHasher::IMAGE.fingerprint(data)
}
