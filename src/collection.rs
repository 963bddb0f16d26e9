//! Property collections: named values validated against bound schemas.

use std::collections::HashMap;

use crate::error::{reason, LookupError, Result, ValidationError};
use crate::logging::trace;
use crate::registry::SchemaSet;
use crate::schema::Schema;
use crate::value::Value;

/// A name → (value, schema) store that validates on every mutation.
///
/// A property may be defined (schema only) without a value. Values are
/// always held in the schema's native kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyCollection {
    schemas: SchemaSet,
    values: HashMap<String, Value>,
}

impl PropertyCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `schema` to `name` and store `value` under it.
    ///
    /// The value is validated, then converted to the schema's native kind.
    /// An existing property of the same name is replaced regardless of its
    /// read-only flag.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
        schema: Schema,
    ) -> Result<()> {
        let name = name.into();
        let value = value.into();
        check_default(&name, &schema)?;
        schema.validate(&value)?;
        let native = schema.convert(&value)?;
        trace!(property = %name, kind = schema.discriminator(), "adding property");
        self.schemas.set(name.clone(), schema);
        self.values.insert(name, native);
        Ok(())
    }

    /// Bind `schema` to `name` without a value, discarding any stored value.
    pub fn define(&mut self, name: impl Into<String>, schema: Schema) -> Result<()> {
        let name = name.into();
        check_default(&name, &schema)?;
        self.values.remove(&name);
        self.schemas.set(name, schema);
        Ok(())
    }

    /// Update the value of an already-bound property.
    ///
    /// Read-only properties accept a value only while they have none.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let schema = self
            .schemas
            .get(name)
            .ok_or_else(|| LookupError::UnknownProperty(name.to_string()))?;
        if schema.is_read_only() && self.values.contains_key(name) {
            return Err(ValidationError::new(
                reason::READONLY,
                format!("property '{}' is read-only", name),
            )
            .into());
        }
        schema.validate(&value)?;
        let native = schema.convert(&value)?;
        self.values.insert(name.to_string(), native);
        Ok(())
    }

    /// The stored value, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The stored value, falling back to the schema's default.
    pub fn get_or_default(&self, name: &str) -> Option<&Value> {
        self.values
            .get(name)
            .or_else(|| self.schemas.get(name).and_then(Schema::default_value))
    }

    pub fn schema_for(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Remove the property and its value; returns whether it was defined.
    pub fn remove(&mut self, name: &str) -> bool {
        self.values.remove(name);
        self.schemas.remove(name)
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.schemas.remove_all();
    }

    /// Stored values by name. Properties without a value are skipped.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn schemas(&self) -> &SchemaSet {
        &self.schemas
    }

    /// Number of defined properties, with or without a value.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains(name)
    }
}

fn check_default(name: &str, schema: &Schema) -> std::result::Result<(), ValidationError> {
    match schema.default_value() {
        Some(default) => schema.validate(default).map_err(|err| {
            ValidationError::new(
                reason::DEFAULT,
                format!("default for '{}' is invalid: {}", name, err.message),
            )
        }),
        None => Ok(()),
    }
}
