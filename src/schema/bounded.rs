//! Bounded scalar schemas: a native kind plus an inclusive `[min, max]` range.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::SchemaCommon;
use crate::error::{reason, ConversionError, ValidationError};
use crate::value::{double_text, Value};

/// A scalar kind that can be bounded by a range.
pub trait Scalar:
    Copy + PartialOrd + fmt::Debug + fmt::Display + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Kind name used in conversion errors.
    const KIND: &'static str;

    /// Smallest representable value; the default lower bound.
    fn type_min() -> Self;

    /// Largest representable value; the default upper bound.
    fn type_max() -> Self;

    /// Coerce an arbitrary value into this kind.
    fn from_value(value: &Value) -> Result<Self, ConversionError>;

    /// Wrap into the native [`Value`] variant.
    fn into_value(self) -> Value;

    /// Write a bound into a constraint body.
    fn serialize_bound<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.serialize(serializer)
    }

    /// Read a bound back from a constraint body.
    fn deserialize_bound<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::deserialize(deserializer)
    }
}

fn fail<T>(kind: &'static str, value: &Value) -> Result<T, ConversionError> {
    Err(ConversionError::new(kind, value.describe()))
}

/// Integral part of a double, if it has no fractional part and fits in i64.
fn integral(d: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
    if d.fract() == 0.0 && d >= i64::MIN as f64 && d < i64::MAX as f64 {
        Some(d as i64)
    } else {
        None
    }
}

impl Scalar for char {
    const KIND: &'static str = "char";

    fn type_min() -> Self {
        '\0'
    }

    fn type_max() -> Self {
        char::MAX
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        let converted = match value {
            Value::Char(c) => Some(*c),
            Value::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            }
            Value::Int(i) => u32::try_from(*i).ok().and_then(char::from_u32),
            Value::Long(l) => u32::try_from(*l).ok().and_then(char::from_u32),
            _ => None,
        };
        converted.map_or_else(|| fail(Self::KIND, value), Ok)
    }

    fn into_value(self) -> Value {
        Value::Char(self)
    }
}

impl Scalar for i32 {
    const KIND: &'static str = "int";

    fn type_min() -> Self {
        i32::MIN
    }

    fn type_max() -> Self {
        i32::MAX
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        let converted = match value {
            Value::Int(i) => Some(*i),
            Value::Long(l) => i32::try_from(*l).ok(),
            Value::Double(d) => integral(*d).and_then(|l| i32::try_from(l).ok()),
            Value::Bool(b) => Some(i32::from(*b)),
            Value::Char(c) => i32::try_from(u32::from(*c)).ok(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        converted.map_or_else(|| fail(Self::KIND, value), Ok)
    }

    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl Scalar for i64 {
    const KIND: &'static str = "long";

    fn type_min() -> Self {
        i64::MIN
    }

    fn type_max() -> Self {
        i64::MAX
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        let converted = match value {
            Value::Long(l) => Some(*l),
            Value::Int(i) => Some(i64::from(*i)),
            Value::Double(d) => integral(*d),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Char(c) => Some(i64::from(u32::from(*c))),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        converted.map_or_else(|| fail(Self::KIND, value), Ok)
    }

    fn into_value(self) -> Value {
        Value::Long(self)
    }
}

impl Scalar for f64 {
    const KIND: &'static str = "double";

    fn type_min() -> Self {
        f64::MIN
    }

    fn type_max() -> Self {
        f64::MAX
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        let converted = match value {
            Value::Double(d) => Some(*d),
            Value::Int(i) => Some(f64::from(*i)),
            Value::Long(l) => Some(*l as f64),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        converted.map_or_else(|| fail(Self::KIND, value), Ok)
    }

    fn into_value(self) -> Value {
        Value::Double(self)
    }

    fn serialize_bound<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        double_text::serialize(self, serializer)
    }

    fn deserialize_bound<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        double_text::deserialize(deserializer)
    }
}

impl Scalar for DateTime<Utc> {
    const KIND: &'static str = "datetime";

    /// 0001-01-01T00:00:00Z, the earliest instant with a four-digit RFC 3339 year.
    fn type_min() -> Self {
        Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// 9999-12-31T23:59:59Z, the latest instant with a four-digit RFC 3339 year.
    fn type_max() -> Self {
        Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59)
            .single()
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        let converted = match value {
            Value::DateTime(dt) => Some(*dt),
            Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Value::Long(millis) => DateTime::from_timestamp_millis(*millis),
            _ => None,
        };
        converted.map_or_else(|| fail(Self::KIND, value), Ok)
    }

    fn into_value(self) -> Value {
        Value::DateTime(self)
    }
}

/// Schema for a scalar restricted to an inclusive range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Scalar", deserialize = "T: Scalar"))]
pub struct BoundedSchema<T> {
    #[serde(flatten)]
    pub common: SchemaCommon,
    #[serde(serialize_with = "Scalar::serialize_bound")]
    #[serde(deserialize_with = "Scalar::deserialize_bound")]
    pub min: T,
    #[serde(serialize_with = "Scalar::serialize_bound")]
    #[serde(deserialize_with = "Scalar::deserialize_bound")]
    pub max: T,
}

/// Bounded character schema.
pub type CharSchema = BoundedSchema<char>;
/// Bounded 32-bit integer schema.
pub type IntSchema = BoundedSchema<i32>;
/// Bounded 64-bit integer schema.
pub type LongSchema = BoundedSchema<i64>;
/// Bounded double schema.
pub type DoubleSchema = BoundedSchema<f64>;
/// Bounded UTC timestamp schema.
pub type DateTimeSchema = BoundedSchema<DateTime<Utc>>;

impl<T: Scalar> BoundedSchema<T> {
    /// Schema accepting the full range of the kind.
    pub fn new() -> Self {
        Self::range(T::type_min(), T::type_max())
    }

    /// Schema accepting `min..=max`.
    pub fn range(min: T, max: T) -> Self {
        Self {
            common: SchemaCommon::default(),
            min,
            max,
        }
    }

    pub fn convert(&self, value: &Value) -> Result<Value, ConversionError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        T::from_value(value).map(Scalar::into_value)
    }

    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        if self.common.check_null(value)? {
            return Ok(());
        }
        let native = T::from_value(value)?;
        self.common.check_allowed(&native.into_value())?;

        // Written as a negated conjunction so NaN is rejected.
        if !(native >= self.min && native <= self.max) {
            return Err(ValidationError::new(
                reason::MINMAX,
                format!("{} is outside [{}, {}]", native, self.min, self.max),
            ));
        }
        Ok(())
    }
}

impl<T: Scalar> Default for BoundedSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Bounds compare through `Value` so doubles get reflexive, hashable equality.
impl<T: Scalar> PartialEq for BoundedSchema<T> {
    fn eq(&self, other: &Self) -> bool {
        self.common == other.common
            && self.min.into_value() == other.min.into_value()
            && self.max.into_value() == other.max.into_value()
    }
}

impl<T: Scalar> Eq for BoundedSchema<T> {}

impl<T: Scalar> Hash for BoundedSchema<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.common.hash(state);
        self.min.into_value().hash(state);
        self.max.into_value().hash(state);
    }
}
