//! Serializers for kinds without a direct column: JSON and binary objects.

use super::{mismatch, Capabilities, ValueSerializer, ValueTarget};
use crate::error::ConversionError;
use crate::schema::{kind, ObjectSchema};
use crate::value::Value;

/// String lists, persisted as a JSON array in the string column.
pub struct StringArraySerializer;

impl ValueSerializer for StringArraySerializer {
    fn kind(&self) -> &'static str {
        kind::STRING_ARRAY
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::JSON
    }

    fn serialize(&self, value: &Value, target: &mut dyn ValueTarget) -> Result<(), ConversionError> {
        let json = match value {
            Value::Null => None,
            other => Some(self.to_json(other)?),
        };
        target.set_json_object(self.kind(), json);
        Ok(())
    }

    fn to_json(&self, value: &Value) -> Result<String, ConversionError> {
        match value {
            Value::Null => Ok(String::new()),
            Value::StringList(items) => serde_json::to_string(items)
                .map_err(|e| ConversionError::new(self.kind(), e.to_string())),
            other => Err(mismatch(self.kind(), other)),
        }
    }

    fn from_json(&self, text: &str) -> Result<Value, ConversionError> {
        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str::<Vec<String>>(text)
            .map(Value::StringList)
            .map_err(|e| ConversionError::new(self.kind(), format!("json text: {}", e)))
    }
}

/// Opaque payloads serialize through their own schema, which knows the
/// runtime type name to attach on decode.
impl ValueSerializer for ObjectSchema {
    fn kind(&self) -> &'static str {
        kind::OBJECT
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::BINARY
    }

    fn serialize(&self, value: &Value, target: &mut dyn ValueTarget) -> Result<(), ConversionError> {
        match value {
            Value::Null => target.set_binary_object(&self.type_name, None),
            Value::Opaque { type_name, payload } => {
                target.set_binary_object(type_name, Some(payload.clone()))
            }
            other => return Err(mismatch(self.kind(), other)),
        }
        Ok(())
    }

    fn to_binary(&self, value: &Value) -> Result<Vec<u8>, ConversionError> {
        match value {
            Value::Opaque { payload, .. } => Ok(payload.clone()),
            other => Err(mismatch(self.kind(), other)),
        }
    }

    fn from_binary(&self, bytes: &[u8]) -> Result<Value, ConversionError> {
        Ok(self.wrap(bytes.to_vec()))
    }
}
