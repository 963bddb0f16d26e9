//! Flatten and restore between property collections and flat rows.

use crate::collection::PropertyCollection;
use crate::error::{BodyError, LookupError, Result};
use crate::logging::{debug, trace, warn};
use crate::registry::SchemaFactory;
use crate::schema::Schema;
use crate::serializer::SerializationHint;
use crate::value::Value;

use super::element::{FlatRows, SchemaElement, ValueElement};

/// Flatten a collection into schema and value rows, ordered by name.
pub fn flatten(collection: &PropertyCollection) -> Result<FlatRows> {
    debug!(properties = collection.len(), "flattening collection");
    let mut rows = FlatRows::default();

    for (name, schema) in collection.schemas().iter() {
        rows.schemas.push(schema_element(name, schema)?);
    }

    for (name, value) in collection.iter() {
        let schema = collection
            .schema_for(name)
            .ok_or_else(|| LookupError::MissingSchema {
                property: name.to_string(),
            })?;
        let mut element = ValueElement::new(name);
        schema.serializer().serialize(value, &mut element)?;
        trace!(property = name, hint = element.hint, "flattened value");
        rows.values.push(element);
    }

    rows.schemas.sort_by(|a, b| a.name.cmp(&b.name));
    rows.values.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(rows)
}

fn schema_element(name: &str, schema: &Schema) -> Result<SchemaElement> {
    let body = schema.body().map_err(|source| BodyError {
        property: name.to_string(),
        source,
    })?;
    let default_hint = match schema.default_value() {
        Some(default) => {
            let mut scratch = ValueElement::new(name);
            schema.serializer().serialize(default, &mut scratch)?;
            Some(scratch.hint)
        }
        None => None,
    };
    Ok(SchemaElement {
        name: name.to_string(),
        discriminator: schema.discriminator().to_string(),
        body,
        default_hint,
    })
}

/// Rebuild a collection using the built-in schema factory.
pub fn restore(schemas: &[SchemaElement], values: &[ValueElement]) -> Result<PropertyCollection> {
    restore_with(SchemaFactory::builtin(), schemas, values)
}

/// Rebuild a collection, resolving discriminators through `factory`.
///
/// Any failure aborts the whole restoration; no partial collection is
/// returned.
#[cfg_attr(not(feature = "logging"), allow(unused_variables))]
pub fn restore_with(
    factory: &SchemaFactory,
    schemas: &[SchemaElement],
    values: &[ValueElement],
) -> Result<PropertyCollection> {
    debug!(
        schemas = schemas.len(),
        values = values.len(),
        "restoring collection"
    );
    restore_rows(factory, schemas, values).inspect_err(|err| {
        warn!(error = %err, "restore aborted");
    })
}

fn restore_rows(
    factory: &SchemaFactory,
    schemas: &[SchemaElement],
    values: &[ValueElement],
) -> Result<PropertyCollection> {
    let mut collection = PropertyCollection::new();

    for element in schemas {
        let schema = factory.restore(&element.name, &element.discriminator, &element.body)?;
        collection.define(element.name.as_str(), schema)?;
    }

    for element in values {
        let schema = collection
            .schema_for(&element.name)
            .ok_or_else(|| LookupError::MissingSchema {
                property: element.name.clone(),
            })?;
        let value = decode(element, schema)?;
        trace!(property = %element.name, hint = element.hint, "restored value");
        collection.set(&element.name, value)?;
    }

    Ok(collection)
}

/// Materialize the value held by `element` in the native kind of `schema`.
fn decode(element: &ValueElement, schema: &Schema) -> Result<Value> {
    let hint = element.serialization_hint()?;
    let value = match (hint, element.column(hint)) {
        (_, Value::Null) => Value::Null,
        (SerializationHint::JsonObject, Value::String(text)) => {
            schema.serializer().from_json(&text)?
        }
        (SerializationHint::BinaryObject, Value::Bytes(bytes)) => {
            schema.serializer().from_binary(&bytes)?
        }
        (_, direct) => schema.convert(&direct)?,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CharSchema, IntSchema, ObjectSchema, StringArraySchema};

    #[test]
    fn test_flatten_initial() {
        let schema: Schema = CharSchema::range('a', 'z').into();
        let mut props = PropertyCollection::new();
        props.add("initial", 'g', schema).unwrap();

        let rows = flatten(&props).unwrap();
        assert_eq!(rows.schemas.len(), 1);
        assert_eq!(rows.values.len(), 1);

        let schema_row = rows.schemas.first().unwrap();
        assert_eq!(schema_row.discriminator, "char");
        assert!(schema_row.body.contains("\"min\":\"a\""));
        assert_eq!(schema_row.default_hint, None);

        let value_row = rows.values.first().unwrap();
        assert_eq!(value_row.hint, SerializationHint::String.code());
        assert_eq!(value_row.string_value.as_deref(), Some("g"));
    }

    #[test]
    fn test_default_hint_recorded() {
        let mut props = PropertyCollection::new();
        props
            .define("n", Schema::from(IntSchema::new()).with_default(3))
            .unwrap();
        let rows = flatten(&props).unwrap();
        assert_eq!(
            rows.schemas.first().and_then(|s| s.default_hint),
            Some(SerializationHint::Int.code())
        );
        assert!(rows.values.is_empty());
    }

    #[test]
    fn test_restore_defined_without_value() {
        let mut props = PropertyCollection::new();
        props.define("n", IntSchema::range(1, 2).into()).unwrap();
        let (schemas, values) = flatten(&props).unwrap().into_parts();
        let restored = restore(&schemas, &values).unwrap();
        assert_eq!(restored, props);
        assert_eq!(restored.get("n"), None);
    }

    #[test]
    fn test_json_and_binary_paths() {
        let mut props = PropertyCollection::new();
        props
            .add(
                "tags",
                vec!["a".to_string(), "b".to_string()],
                StringArraySchema::new().into(),
            )
            .unwrap();
        let invoice = ObjectSchema::new("acme.Invoice");
        props
            .add("invoice", invoice.wrap(vec![1, 2, 3]), invoice.into())
            .unwrap();

        let rows = flatten(&props).unwrap();
        let hints: Vec<u8> = rows.values.iter().map(|v| v.hint).collect();
        assert_eq!(
            hints,
            vec![
                SerializationHint::BinaryObject.code(),
                SerializationHint::JsonObject.code()
            ]
        );

        let restored = restore(&rows.schemas, &rows.values).unwrap();
        assert_eq!(restored, props);
    }

    #[test]
    fn test_missing_schema_aborts() {
        let mut element = ValueElement::new("orphan");
        crate::serializer::ValueTarget::set_int(&mut element, Some(1));
        let err = restore(&[], &[element]).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Lookup(LookupError::MissingSchema { ref property }) if property == "orphan"
        ));
    }

    #[test]
    fn test_custom_factory() {
        let mut factory = SchemaFactory::empty();
        factory.register("letter", || Schema::from(CharSchema::new()));
        let element = SchemaElement {
            name: "initial".to_string(),
            discriminator: "letter".to_string(),
            body: r#"{"min":"a","max":"z"}"#.to_string(),
            default_hint: None,
        };
        let restored = restore_with(&factory, &[element.clone()], &[]).unwrap();
        assert_eq!(
            restored.schema_for("initial").map(Schema::discriminator),
            Some("char")
        );
        assert!(restore(&[element], &[]).is_err());
    }
}
