//! Flat row representation of property collections.
//!
//! [`flatten`] turns a [`PropertyCollection`](crate::PropertyCollection) into
//! one [`SchemaElement`] per bound schema and one [`ValueElement`] per stored
//! value. [`restore`] reverses it, resolving discriminators through a
//! [`SchemaFactory`](crate::registry::SchemaFactory).

mod element;
mod transform;

pub use element::{FlatRows, SchemaElement, ValueElement};
pub use transform::{flatten, restore, restore_with};
