//! Named schema sets and the discriminator-driven schema factory.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::{BodyError, LookupError, Result};
use crate::logging::trace;
use crate::schema::{
    kind, BoolSchema, BytesSchema, CharSchema, DateTimeSchema, DoubleSchema, IntSchema,
    LongSchema, ObjectSchema, Schema, StringArraySchema, StringSchema,
};

/// Mapping of property name to schema. Iteration order is not significant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSet {
    schemas: HashMap<String, Schema>,
}

/// Difference between two schema sets for one property name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaChange {
    Added(String),
    Removed(String),
    Changed(String),
}

impl SchemaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the schema for `name`, returning the previous one.
    pub fn set(&mut self, name: impl Into<String>, schema: Schema) -> Option<Schema> {
        self.schemas.insert(name.into(), schema)
    }

    /// Remove the schema for `name`; returns whether it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.schemas.remove(name).is_some()
    }

    pub fn remove_all(&mut self) {
        self.schemas.clear();
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.schemas.iter().map(|(name, schema)| (name.as_str(), schema))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Names whose schema was added, removed or changed relative to `previous`.
    ///
    /// Results are sorted by name so callers get a stable report.
    pub fn changes_from(&self, previous: &SchemaSet) -> Vec<SchemaChange> {
        let mut changes: Vec<SchemaChange> = self
            .iter()
            .filter_map(|(name, schema)| match previous.get(name) {
                None => Some(SchemaChange::Added(name.to_string())),
                Some(old) if old != schema => Some(SchemaChange::Changed(name.to_string())),
                Some(_) => None,
            })
            .chain(
                previous
                    .names()
                    .filter(|name| !self.contains(name))
                    .map(|name| SchemaChange::Removed(name.to_string())),
            )
            .collect();
        changes.sort_by(|a, b| a.name().cmp(b.name()));
        changes
    }
}

impl SchemaChange {
    pub fn name(&self) -> &str {
        match self {
            Self::Added(name) | Self::Removed(name) | Self::Changed(name) => name,
        }
    }
}

impl FromIterator<(String, Schema)> for SchemaSet {
    fn from_iter<I: IntoIterator<Item = (String, Schema)>>(iter: I) -> Self {
        Self {
            schemas: iter.into_iter().collect(),
        }
    }
}

/// Constructor producing a schema with default constraints.
pub type SchemaConstructor = fn() -> Schema;

/// Builds schemas from stored type discriminators.
///
/// Construction has no side effects, so a factory can be shared freely
/// between threads; [`SchemaFactory::builtin`] is such a shared instance.
#[derive(Debug, Clone)]
pub struct SchemaFactory {
    constructors: HashMap<String, SchemaConstructor>,
}

static BUILTIN: Lazy<SchemaFactory> = Lazy::new(SchemaFactory::with_builtins);

impl SchemaFactory {
    /// A factory with no registered discriminators.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// A new factory pre-loaded with every built-in kind.
    pub fn with_builtins() -> Self {
        let mut factory = Self::empty();
        factory.register(kind::BOOL, || Schema::from(BoolSchema::new()));
        factory.register(kind::CHAR, || Schema::from(CharSchema::new()));
        factory.register(kind::INT, || Schema::from(IntSchema::new()));
        factory.register(kind::LONG, || Schema::from(LongSchema::new()));
        factory.register(kind::DOUBLE, || Schema::from(DoubleSchema::new()));
        factory.register(kind::DATETIME, || Schema::from(DateTimeSchema::new()));
        factory.register(kind::STRING, || Schema::from(StringSchema::new()));
        factory.register(kind::GROUP_LIST, || Schema::GroupList(StringSchema::new()));
        factory.register(kind::ROLE_LIST, || Schema::RoleList(StringSchema::new()));
        factory.register(kind::USER_LIST, || Schema::UserList(StringSchema::new()));
        factory.register(kind::BYTES, || Schema::from(BytesSchema::new()));
        factory.register(kind::STRING_ARRAY, || Schema::from(StringArraySchema::new()));
        factory.register(kind::OBJECT, || Schema::from(ObjectSchema::default()));
        factory
    }

    /// The shared built-in factory.
    pub fn builtin() -> &'static SchemaFactory {
        &BUILTIN
    }

    /// Register (or replace) the constructor for a discriminator.
    pub fn register(&mut self, discriminator: impl Into<String>, constructor: SchemaConstructor) {
        self.constructors.insert(discriminator.into(), constructor);
    }

    pub fn knows(&self, discriminator: &str) -> bool {
        self.constructors.contains_key(discriminator)
    }

    /// Construct a default schema for `discriminator`.
    pub fn create(
        &self,
        property: &str,
        discriminator: &str,
    ) -> std::result::Result<Schema, LookupError> {
        self.constructors
            .get(discriminator)
            .map(|constructor| constructor())
            .ok_or_else(|| LookupError::UnknownDiscriminator {
                property: property.to_string(),
                discriminator: discriminator.to_string(),
            })
    }

    /// Construct the schema for `discriminator` and load its constraint body.
    pub fn restore(&self, property: &str, discriminator: &str, body: &str) -> Result<Schema> {
        let mut schema = self.create(property, discriminator)?;
        schema.populate(body).map_err(|source| BodyError {
            property: property.to_string(),
            source,
        })?;
        trace!(property, discriminator, "restored schema");
        Ok(schema)
    }
}

impl Default for SchemaFactory {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_set_overwrites() {
        let mut set = SchemaSet::new();
        assert!(set.set("a", IntSchema::new().into()).is_none());
        let previous = set.set("a", LongSchema::new().into());
        assert_eq!(previous.map(|s| s.discriminator()), Some("int"));
        assert_eq!(set.get("a").map(Schema::discriminator), Some("long"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut set = SchemaSet::new();
        set.set("a", IntSchema::new().into());
        set.set("b", IntSchema::new().into());
        assert!(set.remove("a"));
        assert!(!set.remove("a"));
        set.remove_all();
        assert!(set.is_empty());
    }

    #[test]
    fn test_changes_from() {
        let mut old = SchemaSet::new();
        old.set("same", IntSchema::range(0, 10).into());
        old.set("changed", IntSchema::range(0, 10).into());
        old.set("gone", BoolSchema::new().into());

        let mut new = SchemaSet::new();
        new.set("same", IntSchema::range(0, 10).into());
        new.set("changed", IntSchema::range(0, 11).into());
        new.set("fresh", BoolSchema::new().into());

        assert_eq!(
            new.changes_from(&old),
            vec![
                SchemaChange::Changed("changed".to_string()),
                SchemaChange::Added("fresh".to_string()),
                SchemaChange::Removed("gone".to_string()),
            ]
        );
        assert!(new.changes_from(&new.clone()).is_empty());
    }

    #[test]
    fn test_builtin_knows_every_kind() {
        let factory = SchemaFactory::builtin();
        for d in kind::ALL {
            let schema = factory.create("p", d).unwrap();
            assert_eq!(schema.discriminator(), d);
        }
    }

    #[test]
    fn test_unknown_discriminator() {
        let err = SchemaFactory::builtin().create("p", "decimal").unwrap_err();
        assert_eq!(
            err,
            LookupError::UnknownDiscriminator {
                property: "p".to_string(),
                discriminator: "decimal".to_string(),
            }
        );
    }

    #[test]
    fn test_register_alias() {
        let mut factory = SchemaFactory::empty();
        assert!(!factory.knows("legacy-char"));
        factory.register("legacy-char", || Schema::from(CharSchema::new()));
        let schema = factory.create("p", "legacy-char").unwrap();
        assert_eq!(schema.discriminator(), "char");
    }

    #[test]
    fn test_restore_populates_body() {
        let original = Schema::from(CharSchema::range('a', 'z')).with_default(Value::Char('c'));
        let body = original.body().unwrap();
        let restored = SchemaFactory::builtin().restore("p", "char", &body).unwrap();
        assert_eq!(restored, original);

        let err = SchemaFactory::builtin().restore("p", "char", "nope").unwrap_err();
        assert!(matches!(err, crate::Error::Body(_)));
    }

    #[test]
    fn test_builtin_is_shareable() {
        fn assert_sync<T: Send + Sync>(_: &T) {}
        assert_sync(SchemaFactory::builtin());
    }
}
