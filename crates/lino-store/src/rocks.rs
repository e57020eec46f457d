// crates/lino-store/src/rocks.rs
//
// RocksDB-backed ledger storage.
//
// Keys are the human-readable prefixed keys produced by the ledger crates
// (`vote:voter:{account}`, `post:info:{permlink}`, ...) and values are their
// JSON records. Each message's staged writes arrive as one `WriteBatch` and are
// committed with a single RocksDB batch write, so a crash can never persist
// half a message.

use rocksdb::{DBWithThreadMode, MultiThreaded, Options, WriteBatch as RocksBatch, WriteOptions};

use lino_core::error::LinoError;
use lino_core::state::{KvStore, WriteBatch};

/// RocksDB wrapper implementing `KvStore`.
#[derive(Debug)]
pub struct RocksStore {
    db: DBWithThreadMode<MultiThreaded>,
    sync_writes: bool,
}

impl RocksStore {
    /// Open a RocksDB database at the given filesystem path.
    ///
    /// Creates the database directory if it does not exist.
    pub fn open(path: &str) -> Result<Self, LinoError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DBWithThreadMode::<MultiThreaded>::open(&opts, path)
            .map_err(|e| LinoError::Storage(format!("Failed to open RocksDB at {}: {}", path, e)))?;

        tracing::debug!("Opened RocksDB at {}", path);
        Ok(Self {
            db,
            sync_writes: false,
        })
    }

    /// fsync every committed batch.
    pub fn with_sync_writes(mut self, sync: bool) -> Self {
        self.sync_writes = sync;
        self
    }
}

impl KvStore for RocksStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, LinoError> {
        self.db
            .get(key)
            .map_err(|e| LinoError::Storage(format!("RocksDB get failed: {}", e)))
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, LinoError> {
        let mut entries = Vec::new();
        for item in self.db.prefix_iterator(prefix) {
            let (key, value) = item
                .map_err(|e| LinoError::Storage(format!("RocksDB iteration error: {}", e)))?;
            // No prefix extractor is configured, so the iterator runs past the
            // prefix; stop at the first non-matching key.
            if !key.starts_with(prefix) {
                break;
            }
            entries.push((key.to_vec(), value.to_vec()));
        }
        Ok(entries)
    }

    fn write_batch(&mut self, batch: WriteBatch) -> Result<(), LinoError> {
        let mut rocks_batch = RocksBatch::default();
        for (key, op) in batch {
            match op {
                Some(value) => rocks_batch.put(&key, &value),
                None => rocks_batch.delete(&key),
            }
        }
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.sync_writes);
        self.db
            .write_opt(rocks_batch, &write_opts)
            .map_err(|e| LinoError::Storage(format!("RocksDB batch write failed: {}", e)))
    }
}
