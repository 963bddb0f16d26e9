//! Serializers for scalar kinds that map onto a direct typed column.
//!
//! JSON for scalars is the literal textual rendering of the value; the empty
//! string stands for an absent value.

use chrono::{DateTime, Utc};

use super::{mismatch, Capabilities, ValueSerializer, ValueTarget};
use crate::error::ConversionError;
use crate::schema::scalar_text;
use crate::value::Value;

/// Scalar JSON encoding shared by every primitive serializer.
fn scalar_json(kind: &'static str, value: &Value) -> Result<String, ConversionError> {
    match value {
        Value::Null => Ok(String::new()),
        other => scalar_text(other).ok_or_else(|| mismatch(kind, other)),
    }
}

/// Decode scalar JSON, mapping `""` to [`Value::Null`].
fn parse_json<T>(
    kind: &'static str,
    text: &str,
    parse: impl FnOnce(&str) -> Option<T>,
    wrap: impl FnOnce(T) -> Value,
) -> Result<Value, ConversionError> {
    if text.is_empty() {
        return Ok(Value::Null);
    }
    parse(text)
        .map(wrap)
        .ok_or_else(|| ConversionError::new(kind, format!("json text {:?}", text)))
}

pub struct BoolSerializer;

impl ValueSerializer for BoolSerializer {
    fn kind(&self) -> &'static str {
        "bool"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PRIMITIVE | Capabilities::JSON
    }

    fn serialize(&self, value: &Value, target: &mut dyn ValueTarget) -> Result<(), ConversionError> {
        match value {
            Value::Null => target.set_bool(None),
            Value::Bool(b) => target.set_bool(Some(*b)),
            other => return Err(mismatch(self.kind(), other)),
        }
        Ok(())
    }

    fn to_json(&self, value: &Value) -> Result<String, ConversionError> {
        scalar_json(self.kind(), value)
    }

    fn from_json(&self, text: &str) -> Result<Value, ConversionError> {
        parse_json(self.kind(), text, |t| t.parse().ok(), Value::Bool)
    }
}

/// Characters travel through the string column as one-character strings.
///
/// The binary form is the code point as a little-endian `u16`; `[0, 0]`
/// encodes an absent value, which makes U+0000 indistinguishable from null.
pub struct CharSerializer;

impl ValueSerializer for CharSerializer {
    fn kind(&self) -> &'static str {
        "char"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PRIMITIVE | Capabilities::BINARY | Capabilities::JSON
    }

    fn serialize(&self, value: &Value, target: &mut dyn ValueTarget) -> Result<(), ConversionError> {
        match value {
            Value::Null => target.set_string(None),
            Value::Char(c) => target.set_string(Some(c.to_string())),
            other => return Err(mismatch(self.kind(), other)),
        }
        Ok(())
    }

    fn to_binary(&self, value: &Value) -> Result<Vec<u8>, ConversionError> {
        match value {
            Value::Null => Ok(vec![0, 0]),
            Value::Char(c) => {
                let code = u16::try_from(u32::from(*c)).map_err(|_| {
                    ConversionError::new(
                        self.kind(),
                        format!("code point U+{:X} (beyond the 2-byte form)", u32::from(*c)),
                    )
                })?;
                Ok(code.to_le_bytes().to_vec())
            }
            other => Err(mismatch(self.kind(), other)),
        }
    }

    fn from_binary(&self, bytes: &[u8]) -> Result<Value, ConversionError> {
        let pair: [u8; 2] = bytes.try_into().map_err(|_| {
            ConversionError::new(self.kind(), format!("{} bytes (expected 2)", bytes.len()))
        })?;
        let code = u16::from_le_bytes(pair);
        if code == 0 {
            return Ok(Value::Null);
        }
        char::from_u32(u32::from(code))
            .map(Value::Char)
            .ok_or_else(|| ConversionError::new(self.kind(), format!("code unit 0x{:04X}", code)))
    }

    fn to_json(&self, value: &Value) -> Result<String, ConversionError> {
        scalar_json(self.kind(), value)
    }

    fn from_json(&self, text: &str) -> Result<Value, ConversionError> {
        parse_json(
            self.kind(),
            text,
            |t| {
                let mut chars = t.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            },
            Value::Char,
        )
    }
}

pub struct IntSerializer;

impl ValueSerializer for IntSerializer {
    fn kind(&self) -> &'static str {
        "int"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PRIMITIVE | Capabilities::JSON
    }

    fn serialize(&self, value: &Value, target: &mut dyn ValueTarget) -> Result<(), ConversionError> {
        match value {
            Value::Null => target.set_int(None),
            Value::Int(i) => target.set_int(Some(*i)),
            other => return Err(mismatch(self.kind(), other)),
        }
        Ok(())
    }

    fn to_json(&self, value: &Value) -> Result<String, ConversionError> {
        scalar_json(self.kind(), value)
    }

    fn from_json(&self, text: &str) -> Result<Value, ConversionError> {
        parse_json(self.kind(), text, |t| t.parse().ok(), Value::Int)
    }
}

pub struct LongSerializer;

impl ValueSerializer for LongSerializer {
    fn kind(&self) -> &'static str {
        "long"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PRIMITIVE | Capabilities::JSON
    }

    fn serialize(&self, value: &Value, target: &mut dyn ValueTarget) -> Result<(), ConversionError> {
        match value {
            Value::Null => target.set_long(None),
            Value::Long(l) => target.set_long(Some(*l)),
            other => return Err(mismatch(self.kind(), other)),
        }
        Ok(())
    }

    fn to_json(&self, value: &Value) -> Result<String, ConversionError> {
        scalar_json(self.kind(), value)
    }

    fn from_json(&self, text: &str) -> Result<Value, ConversionError> {
        parse_json(self.kind(), text, |t| t.parse().ok(), Value::Long)
    }
}

pub struct DoubleSerializer;

impl ValueSerializer for DoubleSerializer {
    fn kind(&self) -> &'static str {
        "double"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PRIMITIVE | Capabilities::JSON
    }

    fn serialize(&self, value: &Value, target: &mut dyn ValueTarget) -> Result<(), ConversionError> {
        match value {
            Value::Null => target.set_double(None),
            Value::Double(d) => target.set_double(Some(*d)),
            other => return Err(mismatch(self.kind(), other)),
        }
        Ok(())
    }

    fn to_json(&self, value: &Value) -> Result<String, ConversionError> {
        scalar_json(self.kind(), value)
    }

    fn from_json(&self, text: &str) -> Result<Value, ConversionError> {
        parse_json(self.kind(), text, |t| t.parse().ok(), Value::Double)
    }
}

pub struct DateTimeSerializer;

impl ValueSerializer for DateTimeSerializer {
    fn kind(&self) -> &'static str {
        "datetime"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PRIMITIVE | Capabilities::JSON
    }

    fn serialize(&self, value: &Value, target: &mut dyn ValueTarget) -> Result<(), ConversionError> {
        match value {
            Value::Null => target.set_datetime(None),
            Value::DateTime(dt) => target.set_datetime(Some(*dt)),
            other => return Err(mismatch(self.kind(), other)),
        }
        Ok(())
    }

    fn to_json(&self, value: &Value) -> Result<String, ConversionError> {
        scalar_json(self.kind(), value)
    }

    fn from_json(&self, text: &str) -> Result<Value, ConversionError> {
        parse_json(
            self.kind(),
            text,
            |t| {
                DateTime::parse_from_rfc3339(t)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc))
            },
            Value::DateTime,
        )
    }
}

/// Strings, and the group/role/user list kinds that share their storage.
pub struct StringSerializer;

impl ValueSerializer for StringSerializer {
    fn kind(&self) -> &'static str {
        "string"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PRIMITIVE | Capabilities::JSON
    }

    fn serialize(&self, value: &Value, target: &mut dyn ValueTarget) -> Result<(), ConversionError> {
        match value {
            Value::Null => target.set_string(None),
            Value::String(s) => target.set_string(Some(s.clone())),
            other => return Err(mismatch(self.kind(), other)),
        }
        Ok(())
    }

    fn to_json(&self, value: &Value) -> Result<String, ConversionError> {
        match value {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s.clone()),
            other => Err(mismatch(self.kind(), other)),
        }
    }

    fn from_json(&self, text: &str) -> Result<Value, ConversionError> {
        parse_json(self.kind(), text, |t| Some(t.to_string()), Value::String)
    }
}

pub struct BytesSerializer;

impl ValueSerializer for BytesSerializer {
    fn kind(&self) -> &'static str {
        "bytes"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PRIMITIVE | Capabilities::BINARY
    }

    fn serialize(&self, value: &Value, target: &mut dyn ValueTarget) -> Result<(), ConversionError> {
        match value {
            Value::Null => target.set_bytes(None),
            Value::Bytes(b) => target.set_bytes(Some(b.clone())),
            other => return Err(mismatch(self.kind(), other)),
        }
        Ok(())
    }

    fn to_binary(&self, value: &Value) -> Result<Vec<u8>, ConversionError> {
        match value {
            Value::Bytes(b) => Ok(b.clone()),
            other => Err(mismatch(self.kind(), other)),
        }
    }

    fn from_binary(&self, bytes: &[u8]) -> Result<Value, ConversionError> {
        Ok(Value::Bytes(bytes.to_vec()))
    }
}
