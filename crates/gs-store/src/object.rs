use bytes::Bytes;

/// An image as kept by the store: the submitted bytes plus the artifact
/// derived from them at ingest time.
///
/// `StoredObject` is immutable. Both halves are reference-counted
/// [`Bytes`], so cloning an object for a reader never copies image data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    original: Bytes,
    derived: Bytes,
}

impl StoredObject {
    /// Create a new stored object.
    pub fn new(original: impl Into<Bytes>, derived: impl Into<Bytes>) -> Self {
        Self {
            original: original.into(),
            derived: derived.into(),
        }
    }

    /// The bytes exactly as submitted.
    pub fn original(&self) -> &Bytes {
        &self.original
    }

    /// The derived representation (e.g. a still thumbnail).
    pub fn derived(&self) -> &Bytes {
        &self.derived
    }

    /// Total bytes held by this object.
    pub fn size(&self) -> u64 {
        (self.original.len() + self.derived.len()) as u64
    }
}
