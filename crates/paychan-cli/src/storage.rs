//! RocksDB storage backend for the paychan devnet.

use anyhow::Result;
use paychan_ledger::{KvStore, StoreError, WriteOp, BANK_PREFIX, MODULE_PREFIX};
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Options, WriteBatch, DB};
use std::path::Path;
use std::sync::Arc;

/// Channel module key space.
const CF_PAYCHAN: &str = "paychan";
/// Account balances.
const CF_BANK: &str = "bank";
/// Host bookkeeping such as the block height.
const CF_HOST: &str = "host";

const HEIGHT_KEY: &[u8] = b"height";

/// RocksDB-backed storage with one column family per module.
pub struct Storage {
    db: Arc<DB>,
}

impl Storage {
    /// Open or create a RocksDB database at the given path with column families.
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new(CF_PAYCHAN, Options::default()),
            ColumnFamilyDescriptor::new(CF_BANK, Options::default()),
            ColumnFamilyDescriptor::new(CF_HOST, Options::default()),
        ];

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;

        Ok(Self { db: Arc::new(db) })
    }

    /// The ledger's host store. Module and bank keys land in their own
    /// column families; [`KvStore::apply`] commits both in one `WriteBatch`.
    pub fn state(&self) -> Arc<dyn KvStore> {
        Arc::new(StateStore {
            db: self.db.clone(),
        })
    }

    /// Current block height, zero on a fresh database.
    pub fn height(&self) -> Result<i64> {
        let cf = self
            .db
            .cf_handle(CF_HOST)
            .ok_or_else(|| anyhow::anyhow!("column family '{}' not found", CF_HOST))?;
        match self.db.get_cf(cf, HEIGHT_KEY)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(0),
        }
    }

    pub fn set_height(&self, height: i64) -> Result<()> {
        let cf = self
            .db
            .cf_handle(CF_HOST)
            .ok_or_else(|| anyhow::anyhow!("column family '{}' not found", CF_HOST))?;
        self.db.put_cf(cf, HEIGHT_KEY, serde_json::to_vec(&height)?)?;
        Ok(())
    }
}

struct StateStore {
    db: Arc<DB>,
}

fn backend(e: rocksdb::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

impl StateStore {
    /// Column family and in-family key for a prefixed ledger key.
    fn route<'a>(&'a self, key: &'a [u8]) -> Result<(&'a ColumnFamily, &'a [u8]), StoreError> {
        let (cf_name, rest) = if let Some(rest) = key.strip_prefix(MODULE_PREFIX) {
            (CF_PAYCHAN, rest)
        } else if let Some(rest) = key.strip_prefix(BANK_PREFIX) {
            (CF_BANK, rest)
        } else {
            return Err(StoreError::Backend(format!(
                "no column family for key '{}'",
                String::from_utf8_lossy(key)
            )));
        };
        let cf = self
            .db
            .cf_handle(cf_name)
            .ok_or_else(|| StoreError::Backend(format!("column family '{}' not found", cf_name)))?;
        Ok((cf, rest))
    }
}

impl KvStore for StateStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let (cf, key) = self.route(key)?;
        self.db.get_cf(cf, key).map_err(backend)
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let (cf, key) = self.route(key)?;
        self.db.put_cf(cf, key, value).map_err(backend)
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        let (cf, key) = self.route(key)?;
        self.db.delete_cf(cf, key).map_err(backend)
    }

    fn apply(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        let mut batch = WriteBatch::default();
        for op in &ops {
            match op {
                WriteOp::Put(key, value) => {
                    let (cf, key) = self.route(key)?;
                    batch.put_cf(cf, key, value);
                }
                WriteOp::Delete(key) => {
                    let (cf, key) = self.route(key)?;
                    batch.delete_cf(cf, key);
                }
            }
        }
        self.db.write(batch).map_err(backend)
    }
}
