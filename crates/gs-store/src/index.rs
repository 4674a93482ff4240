use std::collections::HashMap;

use gs_types::Fingerprint;

use crate::object::StoredObject;

/// Mapping from fingerprint to object plus the submission order of keys.
///
/// Every key in the order appears exactly once and has exactly one entry
/// in the mapping, and vice versa. The index is plain data with no interior
/// locking; it must be owned by a single task.
#[derive(Debug, Default)]
pub struct ObjectIndex {
    objects: HashMap<Fingerprint, StoredObject>,
    order: Vec<Fingerprint>,
}

impl ObjectIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`.
    ///
    /// The key is appended to the order only the first time it is seen.
    /// Returns `true` if the key was new.
    pub fn insert(&mut self, key: Fingerprint, object: StoredObject) -> bool {
        let created = self.objects.insert(key, object).is_none();
        if created {
            self.order.push(key);
        }
        created
    }

    /// Look up the current object for `key`.
    pub fn get(&self, key: &Fingerprint) -> Option<&StoredObject> {
        self.objects.get(key)
    }

    /// Whether `key` has been stored.
    pub fn contains(&self, key: &Fingerprint) -> bool {
        self.objects.contains_key(key)
    }

    /// Keys in the order they were first stored.
    pub fn keys(&self) -> &[Fingerprint] {
        &self.order
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total bytes across all stored objects.
    pub fn total_bytes(&self) -> u64 {
        self.objects.values().map(StoredObject::size).sum()
    }
}
