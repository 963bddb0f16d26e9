//! Runtime value representation for properties.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Serde form for doubles that keeps non-finite values.
///
/// Finite doubles stay JSON numbers; infinities and NaN are written as
/// `"inf"`, `"-inf"` and `"NaN"`, which JSON numbers cannot express. NaN
/// payload bits are not preserved.
pub(crate) mod double_text {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_positive() {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(DoubleVisitor)
    }

    struct DoubleVisitor;

    impl<'de> Visitor<'de> for DoubleVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number or one of \"inf\", \"-inf\", \"NaN\"")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            match v {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "NaN" => Ok(f64::NAN),
                _ => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
            }
        }
    }

    /// The same form for optional columns.
    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<f64>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(d) => super::serialize(d, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<f64>, D::Error> {
            #[derive(Deserialize)]
            struct Double(#[serde(with = "crate::value::double_text")] f64);

            Ok(Option::<Double>::deserialize(deserializer)?.map(|Double(d)| d))
        }
    }
}

/// A property value.
///
/// Every schema kind maps to exactly one native variant; `Opaque` is the
/// escape hatch for payloads the crate only moves around as bytes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum Value {
    /// Absent value.
    #[default]
    Null,
    Bool(bool),
    Char(char),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// 64-bit floating point.
    Double(#[serde(with = "double_text")] f64),
    /// UTC timestamp.
    DateTime(DateTime<Utc>),
    String(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// List of strings.
    StringList(Vec<String>),
    /// Opaque payload tagged with a runtime type name.
    Opaque { type_name: String, payload: Vec<u8> },
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Char(_) => "char",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Double(_) => "double",
            Self::DateTime(_) => "datetime",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::StringList(_) => "string-list",
            Self::Opaque { .. } => "opaque",
        }
    }

    /// Short description for diagnostics, e.g. `string "abc"`.
    pub fn describe(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bytes(b) => format!("bytes[{}]", b.len()),
            Self::Opaque { type_name, payload } => {
                format!("opaque {}[{}]", type_name, payload.len())
            }
            Self::String(s) => format!("string {:?}", s),
            other => format!("{} {}", other.kind(), other),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(l) => Some(*l),
            Self::Int(i) => Some(i64::from(*i)),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_string_list(&self) -> Option<&[String]> {
        match self {
            Self::StringList(items) => Some(items),
            _ => None,
        }
    }
}

// Doubles compare by bit pattern so equality stays reflexive (NaN == NaN) and
// agrees with `Hash`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::StringList(a), Self::StringList(b)) => a == b,
            (
                Self::Opaque {
                    type_name: ta,
                    payload: pa,
                },
                Self::Opaque {
                    type_name: tb,
                    payload: pb,
                },
            ) => ta == tb && pa == pb,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Char(c) => c.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Long(l) => l.hash(state),
            Self::Double(d) => d.to_bits().hash(state),
            Self::DateTime(dt) => dt.hash(state),
            Self::String(s) => s.hash(state),
            Self::Bytes(b) => b.hash(state),
            Self::StringList(items) => items.hash(state),
            Self::Opaque { type_name, payload } => {
                type_name.hash(state);
                payload.hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Char(c) => write!(f, "{}", c),
            Self::Int(i) => write!(f, "{}", i),
            Self::Long(l) => write!(f, "{}", l),
            Self::Double(d) => write!(f, "{}", d),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::String(s) => write!(f, "{}", s),
            Self::Bytes(b) => {
                for byte in b {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
            Self::StringList(items) => write!(f, "[{}]", items.join(", ")),
            Self::Opaque { type_name, payload } => {
                write!(f, "<{}: {} bytes>", type_name, payload.len())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Self::Char(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Self::StringList(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_nan_is_reflexive() {
        let nan = Value::Double(f64::NAN);
        assert_eq!(nan, nan.clone());

        let mut set = HashSet::new();
        set.insert(nan.clone());
        assert!(set.contains(&nan));
    }

    #[test]
    fn test_non_finite_doubles_survive_json() {
        for d in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN, -0.0, 5e-324] {
            let json = serde_json::to_string(&Value::Double(d)).unwrap();
            let back: Value = serde_json::from_str(&json).unwrap();
            assert_eq!(back, Value::Double(d), "{json}");
        }
        assert_eq!(
            serde_json::to_string(&Value::Double(f64::INFINITY)).unwrap(),
            r#"{"Double":"inf"}"#
        );
        assert_eq!(
            serde_json::from_str::<Value>(r#"{"Double":3}"#).unwrap(),
            Value::Double(3.0)
        );
    }

    #[test]
    fn test_variants_are_distinct() {
        assert_ne!(Value::Int(1), Value::Long(1));
        assert_ne!(Value::Char('a'), Value::String("a".to_string()));
        assert_ne!(Value::Null, Value::String(String::new()));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some('x')), Value::Char('x'));
    }

    #[test]
    fn test_describe() {
        assert_eq!(Value::from("ab").describe(), "string \"ab\"");
        assert_eq!(Value::Int(7).describe(), "int 7");
        assert_eq!(Value::Bytes(vec![1, 2]).describe(), "bytes[2]");
    }
}
