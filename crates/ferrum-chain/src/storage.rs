//! The storage-backend collaborator: a byte-keyed, byte-valued map with an
//! atomic batch-write primitive. [`MemoryStorage`] is the in-memory
//! reference implementation; a persistent implementation satisfies the same
//! trait and the header chain cannot tell them apart.

use std::collections::BTreeMap;

/// A single mutation staged for a [`StorageBackend::batch`] call. `Put`
/// writes a value; `Delete` removes a key if present.
#[derive(Debug, Clone)]
pub enum BatchOp {
    Put(Vec<u8>, Vec<u8>),
    Delete(Vec<u8>),
}

/// Byte-keyed map consumed by [`crate::header_chain::HeaderChain`] under the
/// persisted key layout in spec.md §6. Outside of [`StorageBackend::batch`],
/// reads observe the latest committed write; within one `batch` call, every
/// op must become visible all-or-nothing.
pub trait StorageBackend {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;
    fn put(&mut self, key: &[u8], value: Vec<u8>);
    fn delete(&mut self, key: &[u8]);
    /// Apply every op atomically: a reader must never observe a partial
    /// prefix of `ops`.
    fn batch(&mut self, ops: Vec<BatchOp>);
}

/// A plain `BTreeMap`-backed [`StorageBackend`]. Single-threaded and
/// synchronous, so `batch` applying its ops in order is already atomic from
/// every caller's perspective — there is no reader that can observe this
/// crate's internals mid-batch.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.data.get(key).cloned()
    }

    fn put(&mut self, key: &[u8], value: Vec<u8>) {
        self.data.insert(key.to_vec(), value);
    }

    fn delete(&mut self, key: &[u8]) {
        self.data.remove(key);
    }

    fn batch(&mut self, ops: Vec<BatchOp>) {
        for op in ops {
            match op {
                BatchOp::Put(key, value) => {
                    self.data.insert(key, value);
                }
                BatchOp::Delete(key) => {
                    self.data.remove(&key);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_put_delete_round_trip() {
        let mut s = MemoryStorage::new();
        assert_eq!(s.get(b"k"), None);
        s.put(b"k", b"v".to_vec());
        assert_eq!(s.get(b"k"), Some(b"v".to_vec()));
        s.delete(b"k");
        assert_eq!(s.get(b"k"), None);
    }

    #[test]
    fn batch_applies_every_op() {
        let mut s = MemoryStorage::new();
        s.put(b"keep", b"1".to_vec());
        s.batch(vec![
            BatchOp::Put(b"a".to_vec(), b"1".to_vec()),
            BatchOp::Put(b"b".to_vec(), b"2".to_vec()),
            BatchOp::Delete(b"keep".to_vec()),
        ]);
        assert_eq!(s.get(b"a"), Some(b"1".to_vec()));
        assert_eq!(s.get(b"b"), Some(b"2".to_vec()));
        assert_eq!(s.get(b"keep"), None);
    }
}
