//! Row types produced by flattening and consumed by restoration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::serializer::{SerializationHint, ValueTarget};
use crate::value::Value;

/// One schema binding in flat form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaElement {
    pub name: String,
    /// Stable type discriminator, resolved through a schema factory.
    pub discriminator: String,
    /// Constraint body as JSON text.
    pub body: String,
    /// Hint the schema's default value serializes under, if it has one.
    pub default_hint: Option<u8>,
}

/// One property value in flat form. At most one column is populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueElement {
    pub name: String,
    /// Raw [`SerializationHint`] code; unknown codes fail restoration.
    pub hint: u8,
    /// Runtime type name for object payloads.
    pub type_name: Option<String>,
    pub int_value: Option<i32>,
    pub long_value: Option<i64>,
    #[serde(default, with = "crate::value::double_text::option")]
    pub double_value: Option<f64>,
    pub datetime_value: Option<DateTime<Utc>>,
    pub string_value: Option<String>,
    pub bytes_value: Option<Vec<u8>>,
}

impl ValueElement {
    /// An element with no hint and no populated column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Decode the hint code.
    pub fn serialization_hint(&self) -> Result<SerializationHint, LookupError> {
        SerializationHint::from_code(self.hint).ok_or_else(|| LookupError::UnknownHint {
            property: self.name.clone(),
            code: self.hint,
        })
    }

    /// Read the column selected by a direct hint as a value.
    ///
    /// Object hints yield the raw payload (text or bytes); decoding it
    /// belongs to the schema's serializer. An empty column reads as null.
    pub fn column(&self, hint: SerializationHint) -> Value {
        let value = match hint {
            SerializationHint::Int => self.int_value.map(Value::Int),
            SerializationHint::Bool => self.int_value.map(|i| Value::Bool(i != 0)),
            SerializationHint::Long => self.long_value.map(Value::Long),
            SerializationHint::Double => self.double_value.map(Value::Double),
            SerializationHint::DateTime => self.datetime_value.map(Value::DateTime),
            SerializationHint::String | SerializationHint::JsonObject => {
                self.string_value.clone().map(Value::String)
            }
            SerializationHint::Bytes | SerializationHint::BinaryObject => {
                self.bytes_value.clone().map(Value::Bytes)
            }
        };
        value.unwrap_or(Value::Null)
    }

    fn reset(&mut self, hint: SerializationHint) {
        *self = Self {
            name: std::mem::take(&mut self.name),
            hint: hint.code(),
            ..Self::default()
        };
    }
}

impl ValueTarget for ValueElement {
    fn set_int(&mut self, value: Option<i32>) {
        self.reset(SerializationHint::Int);
        self.int_value = value;
    }

    fn set_long(&mut self, value: Option<i64>) {
        self.reset(SerializationHint::Long);
        self.long_value = value;
    }

    fn set_double(&mut self, value: Option<f64>) {
        self.reset(SerializationHint::Double);
        self.double_value = value;
    }

    fn set_bool(&mut self, value: Option<bool>) {
        self.reset(SerializationHint::Bool);
        self.int_value = value.map(i32::from);
    }

    fn set_datetime(&mut self, value: Option<DateTime<Utc>>) {
        self.reset(SerializationHint::DateTime);
        self.datetime_value = value;
    }

    fn set_string(&mut self, value: Option<String>) {
        self.reset(SerializationHint::String);
        self.string_value = value;
    }

    fn set_bytes(&mut self, value: Option<Vec<u8>>) {
        self.reset(SerializationHint::Bytes);
        self.bytes_value = value;
    }

    fn set_json_object(&mut self, type_name: &str, json: Option<String>) {
        self.reset(SerializationHint::JsonObject);
        self.type_name = Some(type_name.to_string());
        self.string_value = json;
    }

    fn set_binary_object(&mut self, type_name: &str, bytes: Option<Vec<u8>>) {
        self.reset(SerializationHint::BinaryObject);
        self.type_name = Some(type_name.to_string());
        self.bytes_value = bytes;
    }
}

/// The output of one flatten call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatRows {
    pub schemas: Vec<SchemaElement>,
    pub values: Vec<ValueElement>,
}

impl FlatRows {
    pub fn into_parts(self) -> (Vec<SchemaElement>, Vec<ValueElement>) {
        (self.schemas, self.values)
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty() && self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setter_records_hint_and_column() {
        let mut element = ValueElement::new("n");
        element.set_long(Some(9));
        assert_eq!(element.hint, SerializationHint::Long.code());
        assert_eq!(element.long_value, Some(9));
        assert_eq!(element.name, "n");
    }

    #[test]
    fn test_setter_clears_previous_column() {
        let mut element = ValueElement::new("n");
        element.set_string(Some("x".to_string()));
        element.set_int(Some(1));
        assert_eq!(element.string_value, None);
        assert_eq!(element.int_value, Some(1));
    }

    #[test]
    fn test_bool_uses_int_column() {
        let mut element = ValueElement::new("flag");
        element.set_bool(Some(true));
        assert_eq!(element.int_value, Some(1));
        assert_eq!(element.column(SerializationHint::Bool), Value::Bool(true));
    }

    #[test]
    fn test_absent_column_reads_null() {
        let mut element = ValueElement::new("n");
        element.set_double(None);
        assert_eq!(element.column(SerializationHint::Double), Value::Null);
    }

    #[test]
    fn test_double_column_survives_json() {
        for d in [f64::NEG_INFINITY, 1.0715660391465826e-75] {
            let mut element = ValueElement::new("ratio");
            element.set_double(Some(d));
            let json = serde_json::to_string(&element).unwrap();
            let back: ValueElement = serde_json::from_str(&json).unwrap();
            assert_eq!(back.double_value.map(f64::to_bits), Some(d.to_bits()));
        }

        let empty: ValueElement =
            serde_json::from_str(r#"{"name":"n","hint":3,"type_name":null}"#).unwrap();
        assert_eq!(empty.double_value, None);
    }

    #[test]
    fn test_unknown_hint() {
        let element = ValueElement {
            hint: 42,
            ..ValueElement::new("mystery")
        };
        assert_eq!(
            element.serialization_hint().unwrap_err(),
            LookupError::UnknownHint {
                property: "mystery".to_string(),
                code: 42,
            }
        );
    }

    #[test]
    fn test_flat_rows_serde() {
        let mut element = ValueElement::new("at");
        element.set_binary_object("acme.Invoice", Some(vec![1, 2]));
        let rows = FlatRows {
            schemas: vec![],
            values: vec![element],
        };
        let json = serde_json::to_string(&rows).unwrap();
        let back: FlatRows = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rows);
    }
}
