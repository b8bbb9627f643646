//! Key-value store seam and the in-process implementations used by the ledger.

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::error::StoreError;

/// Byte-keyed store scoped to a single module.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Deleting an absent key is not an error.
    fn delete(&self, key: &[u8]) -> Result<(), StoreError>;

    /// Apply `ops` as one write. The default applies them in order; backends
    /// with native write batches override it so that either all land or none.
    fn apply(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        for op in ops {
            match op {
                WriteOp::Put(key, value) => self.set(&key, &value)?,
                WriteOp::Delete(key) => self.delete(&key)?,
            }
        }
        Ok(())
    }
}

/// One buffered mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Put(Vec<u8>, Vec<u8>),
    Delete(Vec<u8>),
}

/// Read and decode a JSON value.
pub fn get_json<T: DeserializeOwned>(
    store: &dyn KvStore,
    key: &[u8],
) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON value.
pub fn set_json<T: Serialize>(store: &dyn KvStore, key: &[u8], value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec(value)?;
    store.set(key, &bytes)
}

/// In-memory store.
#[derive(Default)]
pub struct MemStore {
    entries: DashMap<Vec<u8>, Vec<u8>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// A parent store seen through a fixed key prefix.
///
/// Lets several key spaces share one backing store, and so one atomic write.
pub struct PrefixStore {
    parent: Arc<dyn KvStore>,
    prefix: &'static [u8],
}

impl PrefixStore {
    pub fn new(parent: Arc<dyn KvStore>, prefix: &'static [u8]) -> Self {
        Self { parent, prefix }
    }

    fn key(&self, key: &[u8]) -> Vec<u8> {
        [self.prefix, key].concat()
    }
}

impl KvStore for PrefixStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.parent.get(&self.key(key))
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.parent.set(&self.key(key), value)
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        self.parent.delete(&self.key(key))
    }

    fn apply(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        let ops = ops
            .into_iter()
            .map(|op| match op {
                WriteOp::Put(key, value) => WriteOp::Put(self.key(&key), value),
                WriteOp::Delete(key) => WriteOp::Delete(self.key(&key)),
            })
            .collect();
        self.parent.apply(ops)
    }
}

/// Write-buffering layer over a parent store.
///
/// Reads see buffered writes first. Nothing reaches the parent until
/// [`CacheStore::write`]; dropping or [`CacheStore::discard`]ing the cache
/// throws the buffered writes away.
pub struct CacheStore {
    parent: Arc<dyn KvStore>,
    /// `None` marks a buffered delete.
    pending: DashMap<Vec<u8>, Option<Vec<u8>>>,
}

impl CacheStore {
    pub fn new(parent: Arc<dyn KvStore>) -> Self {
        Self {
            parent,
            pending: DashMap::new(),
        }
    }

    /// Flush buffered writes to the parent store in a single [`KvStore::apply`].
    pub fn write(&self) -> Result<(), StoreError> {
        let mut keys: Vec<Vec<u8>> = self.pending.iter().map(|e| e.key().clone()).collect();
        keys.sort();

        let ops = keys
            .iter()
            .filter_map(|key| self.pending.remove(key))
            .map(|(key, value)| match value {
                Some(value) => WriteOp::Put(key, value),
                None => WriteOp::Delete(key),
            })
            .collect();
        self.parent.apply(ops)
    }

    /// Drop all buffered writes.
    pub fn discard(&self) {
        self.pending.clear();
    }

    /// Number of buffered writes and deletes.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl KvStore for CacheStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(entry) = self.pending.get(key) {
            return Ok(entry.value().clone());
        }
        self.parent.get(key)
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.pending.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        self.pending.insert(key.to_vec(), None);
        Ok(())
    }
}
