//! In-memory row store.

use std::collections::BTreeMap;

use crate::flat::FlatRows;
use crate::logging::debug;

use super::{RowStore, StoreError};

/// Row store holding rows in a map. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryRowStore {
    rows: BTreeMap<String, FlatRows>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RowStore for MemoryRowStore {
    fn save_rows(&mut self, owner: &str, rows: &FlatRows) -> Result<(), StoreError> {
        debug!(owner, values = rows.values.len(), "saving rows");
        self.rows.insert(owner.to_string(), rows.clone());
        Ok(())
    }

    fn load_rows(&self, owner: &str) -> Result<Option<FlatRows>, StoreError> {
        Ok(self.rows.get(owner).cloned())
    }

    fn delete_owner(&mut self, owner: &str) -> Result<bool, StoreError> {
        Ok(self.rows.remove(owner).is_some())
    }

    fn owners(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.rows.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flat::SchemaElement;

    fn sample_rows() -> FlatRows {
        FlatRows {
            schemas: vec![SchemaElement {
                name: "n".to_string(),
                discriminator: "int".to_string(),
                body: r#"{"min":0,"max":9}"#.to_string(),
                default_hint: None,
            }],
            values: vec![],
        }
    }

    #[test]
    fn test_rows_are_returned_unmodified() {
        let mut store = MemoryRowStore::new();
        store.save_rows("a", &sample_rows()).unwrap();
        assert_eq!(store.load_rows("a").unwrap(), Some(sample_rows()));
        assert_eq!(store.load_rows("b").unwrap(), None);
    }

    #[test]
    fn test_owners_sorted_and_delete() {
        let mut store = MemoryRowStore::new();
        store.save_rows("zeta", &FlatRows::default()).unwrap();
        store.save_rows("alpha", &FlatRows::default()).unwrap();
        assert_eq!(store.owners().unwrap(), vec!["alpha", "zeta"]);
        assert!(store.delete_owner("zeta").unwrap());
        assert!(!store.delete_owner("zeta").unwrap());
        assert_eq!(store.len(), 1);
    }
}
