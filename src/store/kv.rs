//! Row store backed by fjall.

use std::path::Path;

use fjall::{Keyspace, KeyspaceCreateOptions, PersistMode};

use crate::flat::FlatRows;
use crate::logging::{debug, info};

use super::config::StoreConfig;
use super::{RowStore, StoreError};

/// Keyspace holding store metadata.
const META_KEYSPACE: &str = "_meta";
const META_VERSION_KEY: &str = "version";

/// Keyspace holding one row set per owner.
const ROWS_KEYSPACE: &str = "rows";

/// Current store version.
const STORE_VERSION: u32 = 1;

/// Length of the CRC32 prefix on every stored row set.
const CHECKSUM_LEN: usize = 4;

/// Row store persisting each owner's rows as checksummed JSON.
pub struct FjallRowStore {
    db: fjall::Database,
    rows: Keyspace,
    sync_on_write: bool,
}

impl std::fmt::Debug for FjallRowStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FjallRowStore")
            .field("sync_on_write", &self.sync_on_write)
            .finish_non_exhaustive()
    }
}

impl FjallRowStore {
    /// Open an existing store described by `config`.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let path = config.store.path.as_path();
        if !path.exists() {
            return Err(StoreError::NotInitialized(path.display().to_string()));
        }

        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace(META_KEYSPACE, KeyspaceCreateOptions::default)?;

        let Some(stored) = meta.get(META_VERSION_KEY)? else {
            return Err(StoreError::NotInitialized(path.display().to_string()));
        };
        let version = u32::from_le_bytes(
            stored
                .as_ref()
                .try_into()
                .map_err(|_| StoreError::InvalidFormat("invalid version record".to_string()))?,
        );
        if version != STORE_VERSION {
            return Err(StoreError::InvalidFormat(format!(
                "store version mismatch: expected {}, got {}",
                STORE_VERSION, version
            )));
        }

        let rows = db.keyspace(ROWS_KEYSPACE, KeyspaceCreateOptions::default)?;
        debug!(path = %path.display(), "opened row store");
        Ok(Self {
            db,
            rows,
            sync_on_write: config.store.sync_on_write,
        })
    }

    /// Initialize a new store described by `config`.
    pub fn init(config: &StoreConfig) -> Result<Self, StoreError> {
        let path = config.store.path.as_path();
        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace(META_KEYSPACE, KeyspaceCreateOptions::default)?;
        meta.insert(META_VERSION_KEY, STORE_VERSION.to_le_bytes())?;
        let rows = db.keyspace(ROWS_KEYSPACE, KeyspaceCreateOptions::default)?;
        db.persist(PersistMode::SyncAll)?;

        info!(path = %path.display(), "initialized row store");
        Ok(Self {
            db,
            rows,
            sync_on_write: config.store.sync_on_write,
        })
    }

    /// Open the store at `path` with default settings.
    pub fn open_path(path: &Path) -> Result<Self, StoreError> {
        Self::open(&StoreConfig::at(path))
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    fn persist_if_synced(&self) -> Result<(), StoreError> {
        if self.sync_on_write {
            self.flush()?;
        }
        Ok(())
    }
}

impl RowStore for FjallRowStore {
    fn save_rows(&mut self, owner: &str, rows: &FlatRows) -> Result<(), StoreError> {
        let encoded = encode_rows(rows)?;
        debug!(owner, bytes = encoded.len(), "saving rows");
        self.rows.insert(owner, encoded)?;
        self.persist_if_synced()
    }

    fn load_rows(&self, owner: &str) -> Result<Option<FlatRows>, StoreError> {
        let Some(stored) = self.rows.get(owner)? else {
            return Ok(None);
        };
        decode_rows(owner, &stored).map(Some)
    }

    fn delete_owner(&mut self, owner: &str) -> Result<bool, StoreError> {
        if self.rows.get(owner)?.is_none() {
            return Ok(false);
        }
        self.rows.remove(owner)?;
        self.persist_if_synced()?;
        Ok(true)
    }

    fn owners(&self) -> Result<Vec<String>, StoreError> {
        let mut owners = Vec::new();
        for kv in self.rows.prefix("") {
            let Ok(key_bytes) = kv.key() else {
                continue;
            };
            owners.push(String::from_utf8_lossy(&key_bytes).into_owned());
        }
        owners.sort();
        Ok(owners)
    }
}

/// Encode rows as a little-endian CRC32 of the JSON text followed by the text.
fn encode_rows(rows: &FlatRows) -> Result<Vec<u8>, StoreError> {
    let json = serde_json::to_vec(rows)?;
    let mut buffer = Vec::with_capacity(CHECKSUM_LEN + json.len());
    buffer.extend_from_slice(&crc32fast::hash(&json).to_le_bytes());
    buffer.extend_from_slice(&json);
    Ok(buffer)
}

fn decode_rows(owner: &str, bytes: &[u8]) -> Result<FlatRows, StoreError> {
    let corrupt = |detail: String| StoreError::Corrupt {
        owner: owner.to_string(),
        detail,
    };
    let Some((checksum, json)) = bytes.split_first_chunk::<CHECKSUM_LEN>() else {
        return Err(corrupt(format!("{} bytes is too short", bytes.len())));
    };
    let expected = u32::from_le_bytes(*checksum);
    let actual = crc32fast::hash(json);
    if expected != actual {
        return Err(corrupt(format!(
            "checksum mismatch: stored {:08x}, computed {:08x}",
            expected, actual
        )));
    }
    Ok(serde_json::from_slice(json)?)
}
