//! Per-kind value serializers and the typed target they write into.
//!
//! Each schema binds one [`ValueSerializer`]. A serializer declares which
//! representations it supports through [`Capabilities`] and pushes a value
//! into a [`ValueTarget`] by calling exactly one of its setters. The setter
//! chosen determines the [`SerializationHint`] recorded alongside the value.

mod object;
mod scalar;

pub use object::StringArraySerializer;
pub use scalar::{
    BoolSerializer, BytesSerializer, CharSerializer, DateTimeSerializer, DoubleSerializer,
    IntSerializer, LongSerializer, StringSerializer,
};

use bitflags::bitflags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConversionError;
use crate::value::Value;

bitflags! {
    /// Representations a serializer can round-trip.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// A direct typed column (int, long, double, bool, datetime, string, bytes).
        const PRIMITIVE = 1;
        /// A byte encoding via `to_binary` / `from_binary`.
        const BINARY = 1 << 1;
        /// A text encoding via `to_json` / `from_json`.
        const JSON = 1 << 2;
    }
}

/// Identifies which column or decode path holds a persisted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SerializationHint {
    Int = 1,
    Long = 2,
    Double = 3,
    /// Stored in the int column as 0 or 1.
    Bool = 4,
    DateTime = 5,
    String = 6,
    Bytes = 7,
    /// JSON text in the string column, decoded by the schema's serializer.
    JsonObject = 8,
    /// Binary payload in the bytes column, decoded by the schema's serializer.
    BinaryObject = 9,
}

impl SerializationHint {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Int),
            2 => Some(Self::Long),
            3 => Some(Self::Double),
            4 => Some(Self::Bool),
            5 => Some(Self::DateTime),
            6 => Some(Self::String),
            7 => Some(Self::Bytes),
            8 => Some(Self::JsonObject),
            9 => Some(Self::BinaryObject),
            _ => None,
        }
    }

    /// Whether the column content is the value itself, with no decode step.
    pub fn is_direct(self) -> bool {
        !matches!(self, Self::JsonObject | Self::BinaryObject)
    }
}

impl std::fmt::Display for SerializationHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Long => "long",
            Self::Double => "double",
            Self::Bool => "bool",
            Self::DateTime => "datetime",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::JsonObject => "json-object",
            Self::BinaryObject => "binary-object",
        };
        write!(f, "{}", name)
    }
}

/// Destination for a serialized value. `None` means the value is absent.
pub trait ValueTarget {
    fn set_int(&mut self, value: Option<i32>);
    fn set_long(&mut self, value: Option<i64>);
    fn set_double(&mut self, value: Option<f64>);
    fn set_bool(&mut self, value: Option<bool>);
    fn set_datetime(&mut self, value: Option<DateTime<Utc>>);
    fn set_string(&mut self, value: Option<String>);
    fn set_bytes(&mut self, value: Option<Vec<u8>>);
    /// JSON text of an object whose runtime type is `type_name`.
    fn set_json_object(&mut self, type_name: &str, json: Option<String>);
    /// Binary payload of an object whose runtime type is `type_name`.
    fn set_binary_object(&mut self, type_name: &str, bytes: Option<Vec<u8>>);
}

/// Codec for one value kind.
///
/// The decode methods are only reached for kinds whose values are persisted
/// through the JSON or binary object paths; the defaults report the path as
/// unsupported.
pub trait ValueSerializer: Send + Sync {
    /// Kind name used in error messages.
    fn kind(&self) -> &'static str;

    fn capabilities(&self) -> Capabilities;

    /// Push `value` into `target` through exactly one setter.
    fn serialize(&self, value: &Value, target: &mut dyn ValueTarget)
    -> Result<(), ConversionError>;

    fn to_binary(&self, value: &Value) -> Result<Vec<u8>, ConversionError> {
        let _ = value;
        Err(ConversionError::unsupported(self.kind(), "binary"))
    }

    fn from_binary(&self, bytes: &[u8]) -> Result<Value, ConversionError> {
        let _ = bytes;
        Err(ConversionError::unsupported(self.kind(), "binary"))
    }

    fn to_json(&self, value: &Value) -> Result<String, ConversionError> {
        let _ = value;
        Err(ConversionError::unsupported(self.kind(), "json"))
    }

    fn from_json(&self, text: &str) -> Result<Value, ConversionError> {
        let _ = text;
        Err(ConversionError::unsupported(self.kind(), "json"))
    }
}

/// Error for a value of the wrong variant reaching a serializer.
pub(crate) fn mismatch(kind: &'static str, value: &Value) -> ConversionError {
    ConversionError::new(kind, value.describe())
}
