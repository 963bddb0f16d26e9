//! Text schemas: strings and string lists.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use super::SchemaCommon;
use crate::error::{reason, ConversionError, ValidationError};
use crate::value::Value;

/// Render any scalar as text, the way it appears in a string column.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Char(c) => Some(c.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Int(i) => Some(i.to_string()),
        Value::Long(l) => Some(l.to_string()),
        Value::Double(d) => Some(d.to_string()),
        Value::DateTime(dt) => Some(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        _ => None,
    }
}

/// String schema with optional length bounds (counted in characters).
///
/// The group, role and user list variants of [`Schema`](super::Schema) reuse
/// this type for storage but never enforce it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StringSchema {
    #[serde(flatten)]
    pub common: SchemaCommon,
    #[serde(default)]
    pub min_length: usize,
    #[serde(default)]
    pub max_length: Option<usize>,
}

impl StringSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema accepting strings of `min..=max` characters.
    pub fn length(min: usize, max: usize) -> Self {
        Self {
            min_length: min,
            max_length: Some(max),
            ..Self::default()
        }
    }

    pub fn convert(&self, value: &Value) -> Result<Value, ConversionError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        scalar_text(value)
            .map(Value::String)
            .ok_or_else(|| ConversionError::new("string", value.describe()))
    }

    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        if self.common.check_null(value)? {
            return Ok(());
        }
        let native = self.convert(value)?;
        self.common.check_allowed(&native)?;

        let len = native.as_str().map_or(0, |s| s.chars().count());
        let too_long = self.max_length.is_some_and(|max| len > max);
        if len < self.min_length || too_long {
            return Err(ValidationError::new(
                reason::LENGTH,
                format!(
                    "length {} is outside [{}, {}]",
                    len,
                    self.min_length,
                    self.max_length
                        .map_or_else(|| "unbounded".to_string(), |max| max.to_string())
                ),
            ));
        }
        Ok(())
    }
}

/// Schema for a list of strings, persisted as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StringArraySchema {
    #[serde(flatten)]
    pub common: SchemaCommon,
    #[serde(default)]
    pub max_items: Option<usize>,
}

impl StringArraySchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_items(max: usize) -> Self {
        Self {
            max_items: Some(max),
            ..Self::default()
        }
    }

    pub fn convert(&self, value: &Value) -> Result<Value, ConversionError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::StringList(items) => Ok(Value::StringList(items.clone())),
            Value::String(s) => Ok(Value::StringList(vec![s.clone()])),
            other => Err(ConversionError::new("string-array", other.describe())),
        }
    }

    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        if self.common.check_null(value)? {
            return Ok(());
        }
        let native = self.convert(value)?;
        self.common.check_allowed(&native)?;

        let count = native.as_string_list().map_or(0, <[String]>::len);
        if let Some(max) = self.max_items.filter(|max| count > *max) {
            return Err(ValidationError::new(
                reason::ITEMS,
                format!("{} items exceeds the limit of {}", count, max),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_length() {
        let schema = StringSchema::length(2, 4);
        assert!(schema.validate(&Value::from("abc")).is_ok());
        assert_eq!(schema.validate(&Value::from("a")).unwrap_err().reason, "length");
        assert_eq!(schema.validate(&Value::from("abcde")).unwrap_err().reason, "length");
        // Counted in characters, not bytes.
        assert!(schema.validate(&Value::from("ñññ")).is_ok());
    }

    #[test]
    fn test_string_from_scalars() {
        let schema = StringSchema::new();
        assert_eq!(schema.convert(&Value::Int(12)).unwrap(), Value::from("12"));
        assert_eq!(schema.convert(&Value::Char('x')).unwrap(), Value::from("x"));
        assert_eq!(schema.convert(&Value::Bool(true)).unwrap(), Value::from("true"));
        assert!(schema.convert(&Value::Bytes(vec![1])).is_err());
    }

    #[test]
    fn test_allowed_values() {
        let mut schema = StringSchema::new();
        schema.common.allowed_values = Some(vec![Value::from("low"), Value::from("high")]);
        assert!(schema.validate(&Value::from("low")).is_ok());
        assert_eq!(schema.validate(&Value::from("mid")).unwrap_err().reason, "allowed");
    }

    #[test]
    fn test_string_array_items() {
        let schema = StringArraySchema::max_items(2);
        let two = Value::StringList(vec!["a".into(), "b".into()]);
        let three = Value::StringList(vec!["a".into(), "b".into(), "c".into()]);
        assert!(schema.validate(&two).is_ok());
        assert_eq!(schema.validate(&three).unwrap_err().reason, "items");
        assert_eq!(
            schema.convert(&Value::from("solo")).unwrap(),
            Value::StringList(vec!["solo".into()])
        );
    }
}
