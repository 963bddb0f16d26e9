//! Convenient re-exports for common usage patterns.
//!
//! This module provides a single import to bring all commonly used types
//! into scope.
//!
//! # Example
//!
//! ```ignore
//! use typed_props::prelude::*;
//!
//! let mut store = FjallRowStore::init(&StoreConfig::default())?;
//! let mut props = PropertyCollection::new();
//! props.add("priority", 3, IntSchema::range(1, 5).into())?;
//! store.save_properties("task-42", &props)?;
//! ```

// Unified error handling
pub use crate::error::{ConversionError, Error, LookupError, Result, ValidationError};

// Values and schemas
pub use crate::schema::{
    BoolSchema, BytesSchema, CharSchema, DateTimeSchema, DoubleSchema, IntSchema, LongSchema,
    ObjectSchema, Schema, StringArraySchema, StringSchema,
};
pub use crate::value::Value;

// Collections and the flat transform
pub use crate::collection::PropertyCollection;
pub use crate::flat::{flatten, restore, restore_with, FlatRows, SchemaElement, ValueElement};
pub use crate::registry::{SchemaFactory, SchemaSet};

// Row stores
pub use crate::store::{MemoryRowStore, RowStore};

// Fjall store types (requires "kv" feature)
#[cfg(feature = "kv")]
pub use crate::store::{FjallRowStore, StoreConfig};
