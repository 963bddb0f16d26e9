//! Storage collaborators for flattened property rows.
//!
//! A [`RowStore`] persists the [`FlatRows`] of one owner entity verbatim and
//! hands them back unmodified. Flattening and restoration stay in the core;
//! the provided [`RowStore::save_properties`] and
//! [`RowStore::load_properties`] helpers chain the two.

#[cfg(feature = "kv")]
mod config;
#[cfg(feature = "kv")]
mod kv;
mod memory;

#[cfg(feature = "kv")]
pub use config::{ConfigError, StoreConfig, StoreSettings};
#[cfg(feature = "kv")]
pub use kv::FjallRowStore;
pub use memory::MemoryRowStore;

use thiserror::Error;

use crate::collection::PropertyCollection;
use crate::flat::{flatten, restore, FlatRows};

/// Errors raised by row stores.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store not initialized at '{0}'")]
    NotInitialized(String),

    #[error("invalid store format: {0}")]
    InvalidFormat(String),

    #[error("corrupt rows for owner '{owner}': {detail}")]
    Corrupt { owner: String, detail: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("row encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "kv")]
    #[error("database error: {0}")]
    Database(#[from] fjall::Error),

    #[cfg(feature = "kv")]
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Persists flattened rows keyed by owner entity.
pub trait RowStore {
    /// Replace the rows stored for `owner`.
    fn save_rows(&mut self, owner: &str, rows: &FlatRows) -> Result<(), StoreError>;

    /// The rows stored for `owner`, if any.
    fn load_rows(&self, owner: &str) -> Result<Option<FlatRows>, StoreError>;

    /// Remove the rows for `owner`; returns whether any were stored.
    fn delete_owner(&mut self, owner: &str) -> Result<bool, StoreError>;

    /// Every owner with stored rows, sorted.
    fn owners(&self) -> Result<Vec<String>, StoreError>;

    /// Flatten `collection` and store it under `owner`.
    fn save_properties(
        &mut self,
        owner: &str,
        collection: &PropertyCollection,
    ) -> crate::Result<()> {
        let rows = flatten(collection)?;
        self.save_rows(owner, &rows)?;
        Ok(())
    }

    /// Load and restore the collection stored under `owner`.
    fn load_properties(&self, owner: &str) -> crate::Result<Option<PropertyCollection>> {
        match self.load_rows(owner)? {
            Some(rows) => Ok(Some(restore(&rows.schemas, &rows.values)?)),
            None => Ok(None),
        }
    }
}
