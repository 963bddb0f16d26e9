//! Schema family: typed contracts for named properties.
//!
//! [`Schema`] is a closed enum over the supported kinds. Anything that needs
//! to treat schemas generically (constraint bodies, serializer binding,
//! validation) matches on it exhaustively, so adding a kind is a compile
//! error until every site handles it. Reconstructing a schema from a stored
//! discriminator goes through [`SchemaFactory`](crate::registry::SchemaFactory)
//! instead.

mod binary;
mod bounded;
mod text;

pub use binary::{BytesSchema, ObjectSchema};
pub use bounded::{
    BoundedSchema, CharSchema, DateTimeSchema, DoubleSchema, IntSchema, LongSchema, Scalar,
};
pub(crate) use text::scalar_text;
pub use text::{StringArraySchema, StringSchema};

use serde::{Deserialize, Serialize};

use crate::error::{reason, ConversionError, ValidationError};
use crate::serializer::{self, ValueSerializer};
use crate::value::Value;

/// Stable type discriminators recorded in flattened schema elements.
pub mod kind {
    pub const BOOL: &str = "bool";
    pub const CHAR: &str = "char";
    pub const INT: &str = "int";
    pub const LONG: &str = "long";
    pub const DOUBLE: &str = "double";
    pub const DATETIME: &str = "datetime";
    pub const STRING: &str = "string";
    pub const GROUP_LIST: &str = "group-list";
    pub const ROLE_LIST: &str = "role-list";
    pub const USER_LIST: &str = "user-list";
    pub const BYTES: &str = "bytes";
    pub const STRING_ARRAY: &str = "string-array";
    pub const OBJECT: &str = "object";

    /// Every built-in discriminator.
    pub const ALL: [&str; 13] = [
        BOOL,
        CHAR,
        INT,
        LONG,
        DOUBLE,
        DATETIME,
        STRING,
        GROUP_LIST,
        ROLE_LIST,
        USER_LIST,
        BYTES,
        STRING_ARRAY,
        OBJECT,
    ];
}

/// Attributes shared by every schema kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaCommon {
    /// Whether [`Value::Null`] is accepted.
    pub nullable: bool,
    /// Whether the property rejects updates after it is first added.
    pub read_only: bool,
    /// Value reported when the property has no stored value.
    pub default: Option<Value>,
    /// If set, the only values accepted (compared after conversion).
    pub allowed_values: Option<Vec<Value>>,
}

impl SchemaCommon {
    /// Returns `Ok(true)` for an acceptable null, which needs no further checks.
    pub(crate) fn check_null(&self, value: &Value) -> Result<bool, ValidationError> {
        match (value.is_null(), self.nullable) {
            (false, _) => Ok(false),
            (true, true) => Ok(true),
            (true, false) => Err(ValidationError::new(
                reason::NULL,
                "null is not allowed for a non-nullable property",
            )),
        }
    }

    pub(crate) fn check_allowed(&self, native: &Value) -> Result<(), ValidationError> {
        match &self.allowed_values {
            Some(allowed) if !allowed.contains(native) => Err(ValidationError::new(
                reason::ALLOWED,
                format!("{} is not one of the allowed values", native.describe()),
            )),
            _ => Ok(()),
        }
    }
}

/// Boolean schema; no constraints beyond the common ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoolSchema {
    #[serde(flatten)]
    pub common: SchemaCommon,
}

impl BoolSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn convert(&self, value: &Value) -> Result<Value, ConversionError> {
        let converted = match value {
            Value::Null => return Ok(Value::Null),
            Value::Bool(b) => Some(*b),
            Value::Int(0) | Value::Long(0) => Some(false),
            Value::Int(1) | Value::Long(1) => Some(true),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        };
        converted
            .map(Value::Bool)
            .ok_or_else(|| ConversionError::new("bool", value.describe()))
    }

    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        if self.common.check_null(value)? {
            return Ok(());
        }
        let native = self.convert(value)?;
        self.common.check_allowed(&native)
    }
}

/// A typed contract for one property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Schema {
    Bool(BoolSchema),
    Char(CharSchema),
    Int(IntSchema),
    Long(LongSchema),
    Double(DoubleSchema),
    DateTime(DateTimeSchema),
    String(StringSchema),
    /// Group list; stored like a string, never constrained.
    GroupList(StringSchema),
    /// Role list; stored like a string, never constrained.
    RoleList(StringSchema),
    /// User list; stored like a string, never constrained.
    UserList(StringSchema),
    Bytes(BytesSchema),
    StringArray(StringArraySchema),
    Object(ObjectSchema),
}

impl Schema {
    /// The stable type discriminator for this kind.
    pub fn discriminator(&self) -> &'static str {
        match self {
            Self::Bool(_) => kind::BOOL,
            Self::Char(_) => kind::CHAR,
            Self::Int(_) => kind::INT,
            Self::Long(_) => kind::LONG,
            Self::Double(_) => kind::DOUBLE,
            Self::DateTime(_) => kind::DATETIME,
            Self::String(_) => kind::STRING,
            Self::GroupList(_) => kind::GROUP_LIST,
            Self::RoleList(_) => kind::ROLE_LIST,
            Self::UserList(_) => kind::USER_LIST,
            Self::Bytes(_) => kind::BYTES,
            Self::StringArray(_) => kind::STRING_ARRAY,
            Self::Object(_) => kind::OBJECT,
        }
    }

    pub fn common(&self) -> &SchemaCommon {
        match self {
            Self::Bool(s) => &s.common,
            Self::Char(s) => &s.common,
            Self::Int(s) => &s.common,
            Self::Long(s) => &s.common,
            Self::Double(s) => &s.common,
            Self::DateTime(s) => &s.common,
            Self::String(s) | Self::GroupList(s) | Self::RoleList(s) | Self::UserList(s) => {
                &s.common
            }
            Self::Bytes(s) => &s.common,
            Self::StringArray(s) => &s.common,
            Self::Object(s) => &s.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut SchemaCommon {
        match self {
            Self::Bool(s) => &mut s.common,
            Self::Char(s) => &mut s.common,
            Self::Int(s) => &mut s.common,
            Self::Long(s) => &mut s.common,
            Self::Double(s) => &mut s.common,
            Self::DateTime(s) => &mut s.common,
            Self::String(s) | Self::GroupList(s) | Self::RoleList(s) | Self::UserList(s) => {
                &mut s.common
            }
            Self::Bytes(s) => &mut s.common,
            Self::StringArray(s) => &mut s.common,
            Self::Object(s) => &mut s.common,
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.common().nullable
    }

    pub fn is_read_only(&self) -> bool {
        self.common().read_only
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.common().default.as_ref()
    }

    pub fn allowed_values(&self) -> Option<&[Value]> {
        self.common().allowed_values.as_deref()
    }

    /// Permissive kinds accept any value and exist only for their discriminator.
    pub fn is_permissive(&self) -> bool {
        matches!(self, Self::GroupList(_) | Self::RoleList(_) | Self::UserList(_))
    }

    /// Accept null values.
    pub fn nullable(mut self) -> Self {
        self.common_mut().nullable = true;
        self
    }

    /// Reject updates after the first insertion.
    pub fn read_only(mut self) -> Self {
        self.common_mut().read_only = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.common_mut().default = Some(value.into());
        self
    }

    pub fn with_allowed(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.common_mut().allowed_values = Some(values.into_iter().collect());
        self
    }

    /// Coerce an arbitrary value into this schema's native kind.
    pub fn convert(&self, value: &Value) -> Result<Value, ConversionError> {
        match self {
            Self::Bool(s) => s.convert(value),
            Self::Char(s) => s.convert(value),
            Self::Int(s) => s.convert(value),
            Self::Long(s) => s.convert(value),
            Self::Double(s) => s.convert(value),
            Self::DateTime(s) => s.convert(value),
            Self::String(s) | Self::GroupList(s) | Self::RoleList(s) | Self::UserList(s) => {
                s.convert(value)
            }
            Self::Bytes(s) => s.convert(value),
            Self::StringArray(s) => s.convert(value),
            Self::Object(s) => s.convert(value),
        }
    }

    /// Check a value against this schema's constraints.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match self {
            Self::Bool(s) => s.validate(value),
            Self::Char(s) => s.validate(value),
            Self::Int(s) => s.validate(value),
            Self::Long(s) => s.validate(value),
            Self::Double(s) => s.validate(value),
            Self::DateTime(s) => s.validate(value),
            Self::String(s) => s.validate(value),
            Self::GroupList(_) | Self::RoleList(_) | Self::UserList(_) => Ok(()),
            Self::Bytes(s) => s.validate(value),
            Self::StringArray(s) => s.validate(value),
            Self::Object(s) => s.validate(value),
        }
    }

    /// The serializer bound to this schema's value kind.
    pub fn serializer(&self) -> &dyn ValueSerializer {
        match self {
            Self::Bool(_) => &serializer::BoolSerializer,
            Self::Char(_) => &serializer::CharSerializer,
            Self::Int(_) => &serializer::IntSerializer,
            Self::Long(_) => &serializer::LongSerializer,
            Self::Double(_) => &serializer::DoubleSerializer,
            Self::DateTime(_) => &serializer::DateTimeSerializer,
            Self::String(_) | Self::GroupList(_) | Self::RoleList(_) | Self::UserList(_) => {
                &serializer::StringSerializer
            }
            Self::Bytes(_) => &serializer::BytesSerializer,
            Self::StringArray(_) => &serializer::StringArraySerializer,
            Self::Object(s) => s,
        }
    }

    /// Render the constraints as a self-describing JSON body.
    pub fn body(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Bool(s) => serde_json::to_string(s),
            Self::Char(s) => serde_json::to_string(s),
            Self::Int(s) => serde_json::to_string(s),
            Self::Long(s) => serde_json::to_string(s),
            Self::Double(s) => serde_json::to_string(s),
            Self::DateTime(s) => serde_json::to_string(s),
            Self::String(s) | Self::GroupList(s) | Self::RoleList(s) | Self::UserList(s) => {
                serde_json::to_string(s)
            }
            Self::Bytes(s) => serde_json::to_string(s),
            Self::StringArray(s) => serde_json::to_string(s),
            Self::Object(s) => serde_json::to_string(s),
        }
    }

    /// Replace the constraints with those read from a body produced by [`Schema::body`].
    pub fn populate(&mut self, body: &str) -> Result<(), serde_json::Error> {
        match self {
            Self::Bool(s) => *s = serde_json::from_str(body)?,
            Self::Char(s) => *s = serde_json::from_str(body)?,
            Self::Int(s) => *s = serde_json::from_str(body)?,
            Self::Long(s) => *s = serde_json::from_str(body)?,
            Self::Double(s) => *s = serde_json::from_str(body)?,
            Self::DateTime(s) => *s = serde_json::from_str(body)?,
            Self::String(s) | Self::GroupList(s) | Self::RoleList(s) | Self::UserList(s) => {
                *s = serde_json::from_str(body)?
            }
            Self::Bytes(s) => *s = serde_json::from_str(body)?,
            Self::StringArray(s) => *s = serde_json::from_str(body)?,
            Self::Object(s) => *s = serde_json::from_str(body)?,
        }
        Ok(())
    }
}

impl From<BoolSchema> for Schema {
    fn from(s: BoolSchema) -> Self {
        Self::Bool(s)
    }
}

impl From<CharSchema> for Schema {
    fn from(s: CharSchema) -> Self {
        Self::Char(s)
    }
}

impl From<IntSchema> for Schema {
    fn from(s: IntSchema) -> Self {
        Self::Int(s)
    }
}

impl From<LongSchema> for Schema {
    fn from(s: LongSchema) -> Self {
        Self::Long(s)
    }
}

impl From<DoubleSchema> for Schema {
    fn from(s: DoubleSchema) -> Self {
        Self::Double(s)
    }
}

impl From<DateTimeSchema> for Schema {
    fn from(s: DateTimeSchema) -> Self {
        Self::DateTime(s)
    }
}

impl From<StringSchema> for Schema {
    fn from(s: StringSchema) -> Self {
        Self::String(s)
    }
}

impl From<BytesSchema> for Schema {
    fn from(s: BytesSchema) -> Self {
        Self::Bytes(s)
    }
}

impl From<StringArraySchema> for Schema {
    fn from(s: StringArraySchema) -> Self {
        Self::StringArray(s)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(s: ObjectSchema) -> Self {
        Self::Object(s)
    }
}
