//! Schema-validated typed property bags with a flat row representation.
//!
//! Named values are attached to an owning entity, each bound to a [`Schema`]
//! that constrains it. A whole [`PropertyCollection`] can be flattened into
//! storage-agnostic rows with fixed typed columns and restored from them.
//!
//! # Quick Start
//!
//! ```ignore
//! use typed_props::prelude::*;
//!
//! let mut props = PropertyCollection::new();
//! props.add("initial", 'g', CharSchema::range('a', 'z').into())?;
//!
//! let rows = flatten(&props)?;
//! let restored = restore(&rows.schemas, &rows.values)?;
//! assert_eq!(restored.get("initial"), Some(&Value::Char('g')));
//! ```
//!
//! # Modules
//!
//! - [`value`] - The closed value model
//! - [`schema`] - Schema kinds, conversion and validation
//! - [`serializer`] - Per-kind codecs and serialization hints
//! - [`registry`] - Named schema sets and the restoration factory
//! - [`collection`] - Validated property collections
//! - [`flat`] - Flat row elements and the flatten/restore transform
//! - [`store`] - Row stores: in-memory, and fjall-backed (requires `kv` feature)
//!
//! # Feature Flags
//!
//! - `kv` - Enable the fjall row store and its TOML configuration (enabled by default)
//! - `logging` - Enable library-level tracing (consumers provide their own subscriber)
//! - `cli` - Enable the command-line interface binary
//! - `full` - Enable all features

pub mod collection;
pub mod flat;
mod logging;
pub mod prelude;
pub mod registry;
pub mod schema;
pub mod serializer;
pub mod store;
pub mod value;

mod error;

// Re-export the unified error type and the domain errors
pub use error::{
    reason, BodyError, ConversionError, Error, LookupError, Result, ValidationError,
};

pub use collection::PropertyCollection;
pub use flat::{flatten, restore, restore_with, FlatRows, SchemaElement, ValueElement};
pub use registry::{SchemaChange, SchemaFactory, SchemaSet};
pub use schema::{kind, Schema};
pub use serializer::{Capabilities, SerializationHint, ValueSerializer, ValueTarget};
pub use store::{MemoryRowStore, RowStore, StoreError};
pub use value::Value;

// Re-export fjall store types at crate root for convenience
#[cfg(feature = "kv")]
pub use store::{FjallRowStore, StoreConfig};
