// crates/lino-core/src/state.rs
//
// Key-value persistence contract and per-message staging.
//
// Every message executes against a `StagedStore`: reads fall through to the
// committed backend, writes accumulate in memory. A message that succeeds
// turns its staged writes into one `WriteBatch` committed atomically; a
// message that fails simply drops them, leaving the backend untouched.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::LinoError;
use crate::param::Params;

/// Committed key-value storage backend.
///
/// Implemented by lino-store (in-memory and RocksDB backends).
pub trait KvStore {
    /// Read a single key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, LinoError>;

    /// All entries whose key starts with `prefix`, in ascending key order.
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, LinoError>;

    /// Apply every operation of `batch` atomically.
    fn write_batch(&mut self, batch: WriteBatch) -> Result<(), LinoError>;
}

/// An ordered set of puts (`Some`) and deletes (`None`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.ops.insert(key, Some(value));
    }

    pub fn delete(&mut self, key: Vec<u8>) {
        self.ops.insert(key, None);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Vec<u8>, &Option<Vec<u8>>)> {
        self.ops.iter()
    }
}

impl IntoIterator for WriteBatch {
    type Item = (Vec<u8>, Option<Vec<u8>>);
    type IntoIter = std::collections::btree_map::IntoIter<Vec<u8>, Option<Vec<u8>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

/// Write-staging overlay over a committed `KvStore`.
pub struct StagedStore<'a> {
    base: &'a dyn KvStore,
    pending: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> StagedStore<'a> {
    pub fn new(base: &'a dyn KvStore) -> Self {
        Self {
            base,
            pending: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, LinoError> {
        match self.pending.get(key) {
            Some(staged) => Ok(staged.clone()),
            None => self.base.get(key),
        }
    }

    pub fn has(&self, key: &[u8]) -> Result<bool, LinoError> {
        Ok(self.get(key)?.is_some())
    }

    pub fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.pending.insert(key, Some(value));
    }

    pub fn delete(&mut self, key: Vec<u8>) {
        self.pending.insert(key, None);
    }

    /// Committed entries under `prefix` merged with staged writes.
    pub fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, LinoError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.base.scan_prefix(prefix)?.into_iter().collect();
        for (key, staged) in self
            .pending
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
        {
            match staged {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        Ok(merged.into_iter().collect())
    }

    /// Read and decode a JSON record.
    pub fn get_json<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>, LinoError> {
        match self.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Encode and stage a JSON record.
    pub fn set_json<T: Serialize>(&mut self, key: Vec<u8>, value: &T) -> Result<(), LinoError> {
        let bytes = serde_json::to_vec(value)?;
        self.set(key, bytes);
        Ok(())
    }

    /// Number of staged operations.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn into_batch(self) -> WriteBatch {
        WriteBatch { ops: self.pending }
    }
}

/// Externally supplied block header data. The only time source any
/// operation may consult.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub height: u64,
    /// Block time, unix seconds.
    pub time: i64,
}

/// Everything a single message may read or write, scoped to that message.
pub struct Context<'a> {
    pub block: BlockInfo,
    pub params: &'a Params,
    pub store: StagedStore<'a>,
}

impl<'a> Context<'a> {
    pub fn new(base: &'a dyn KvStore, params: &'a Params, block: BlockInfo) -> Self {
        Self {
            block,
            params,
            store: StagedStore::new(base),
        }
    }

    pub fn block_time(&self) -> i64 {
        self.block.time
    }

    /// Finish the message and hand back its writes for commit.
    pub fn into_batch(self) -> WriteBatch {
        self.store.into_batch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MapStore {
        map: BTreeMap<Vec<u8>, Vec<u8>>,
    }

    impl KvStore for MapStore {
        fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, LinoError> {
            Ok(self.map.get(key).cloned())
        }

        fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, LinoError> {
            Ok(self
                .map
                .iter()
                .filter(|(k, _)| k.starts_with(prefix))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect())
        }

        fn write_batch(&mut self, batch: WriteBatch) -> Result<(), LinoError> {
            for (k, v) in batch {
                match v {
                    Some(v) => self.map.insert(k, v),
                    None => self.map.remove(&k),
                };
            }
            Ok(())
        }
    }

    #[test]
    fn test_staged_reads_see_own_writes() {
        let mut base = MapStore::default();
        base.map.insert(b"a".to_vec(), b"1".to_vec());
        let mut staged = StagedStore::new(&base);
        staged.set(b"a".to_vec(), b"2".to_vec());
        staged.set(b"b".to_vec(), b"3".to_vec());
        assert_eq!(staged.get(b"a").unwrap(), Some(b"2".to_vec()));
        assert_eq!(staged.get(b"b").unwrap(), Some(b"3".to_vec()));
        assert_eq!(base.get(b"b").unwrap(), None);
    }

    #[test]
    fn test_staged_delete_hides_committed_value() {
        let mut base = MapStore::default();
        base.map.insert(b"k".to_vec(), b"v".to_vec());
        let mut staged = StagedStore::new(&base);
        staged.delete(b"k".to_vec());
        assert!(!staged.has(b"k").unwrap());
        assert!(base.get(b"k").unwrap().is_some());
    }

    #[test]
    fn test_scan_prefix_merges_pending() {
        let mut base = MapStore::default();
        base.map.insert(b"p:1".to_vec(), b"a".to_vec());
        base.map.insert(b"p:2".to_vec(), b"b".to_vec());
        base.map.insert(b"q:1".to_vec(), b"c".to_vec());
        let mut staged = StagedStore::new(&base);
        staged.delete(b"p:1".to_vec());
        staged.set(b"p:3".to_vec(), b"d".to_vec());
        staged.set(b"q:2".to_vec(), b"e".to_vec());
        let keys: Vec<Vec<u8>> = staged
            .scan_prefix(b"p:")
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![b"p:2".to_vec(), b"p:3".to_vec()]);
    }

    #[test]
    fn test_dropping_staged_store_discards_writes() {
        let mut base = MapStore::default();
        {
            let mut staged = StagedStore::new(&base);
            staged.set(b"x".to_vec(), b"1".to_vec());
        }
        assert!(base.map.is_empty());

        let batch = {
            let mut staged = StagedStore::new(&base);
            staged.set(b"x".to_vec(), b"1".to_vec());
            staged.into_batch()
        };
        base.write_batch(batch).unwrap();
        assert_eq!(base.get(b"x").unwrap(), Some(b"1".to_vec()));
    }
}
