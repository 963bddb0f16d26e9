//! Byte-oriented schemas: raw bytes and opaque typed payloads.

use serde::{Deserialize, Serialize};

use super::SchemaCommon;
use crate::error::{reason, ConversionError, ValidationError};
use crate::value::Value;

/// Raw byte sequence with an optional maximum length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BytesSchema {
    #[serde(flatten)]
    pub common: SchemaCommon,
    #[serde(default)]
    pub max_length: Option<usize>,
}

impl BytesSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_length(max: usize) -> Self {
        Self {
            max_length: Some(max),
            ..Self::default()
        }
    }

    pub fn convert(&self, value: &Value) -> Result<Value, ConversionError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Bytes(b) => Ok(Value::Bytes(b.clone())),
            other => Err(ConversionError::new("bytes", other.describe())),
        }
    }

    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        if self.common.check_null(value)? {
            return Ok(());
        }
        let native = self.convert(value)?;
        self.common.check_allowed(&native)?;

        let len = native.as_bytes().map_or(0, <[u8]>::len);
        if let Some(max) = self.max_length.filter(|max| len > *max) {
            return Err(ValidationError::new(
                reason::LENGTH,
                format!("{} bytes exceeds the limit of {}", len, max),
            ));
        }
        Ok(())
    }
}

/// Opaque payload of a named runtime type, moved around as bytes.
///
/// Values must be [`Value::Opaque`] with a `type_name` equal to the schema's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectSchema {
    #[serde(flatten)]
    pub common: SchemaCommon,
    #[serde(default)]
    pub type_name: String,
    #[serde(default)]
    pub max_size: Option<usize>,
}

impl ObjectSchema {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn with_max_size(mut self, max: usize) -> Self {
        self.max_size = Some(max);
        self
    }

    /// Wrap a payload as a value of this schema's type.
    pub fn wrap(&self, payload: Vec<u8>) -> Value {
        Value::Opaque {
            type_name: self.type_name.clone(),
            payload,
        }
    }

    pub fn convert(&self, value: &Value) -> Result<Value, ConversionError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Opaque { .. } => Ok(value.clone()),
            Value::Bytes(b) => Ok(self.wrap(b.clone())),
            other => Err(ConversionError::new("opaque", other.describe())),
        }
    }

    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        if self.common.check_null(value)? {
            return Ok(());
        }
        let native = self.convert(value)?;
        self.common.check_allowed(&native)?;

        if let Value::Opaque { type_name, payload } = &native {
            if *type_name != self.type_name {
                return Err(ValidationError::new(
                    reason::TYPE,
                    format!("expected type '{}', got '{}'", self.type_name, type_name),
                ));
            }
            if let Some(max) = self.max_size.filter(|max| payload.len() > *max) {
                return Err(ValidationError::new(
                    reason::SIZE,
                    format!("{} bytes exceeds the limit of {}", payload.len(), max),
                ));
            }
        }
        Ok(())
    }
}
