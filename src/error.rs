//! Error types for the typed-props library.
//!
//! The three domain errors mirror the ways a property can be rejected:
//!
//! - [`ValidationError`]: the value is well-typed but violates a constraint.
//! - [`ConversionError`]: the input cannot be coerced to the schema's kind.
//! - [`LookupError`]: restoration hit a discriminator, hint or name it does
//!   not know how to handle.
//!
//! [`Error`] wraps all of them so callers can use a single `?` chain.

use thiserror::Error;

use crate::store::StoreError;

/// Reason codes carried by [`ValidationError`].
pub mod reason {
    /// Null value for a non-nullable schema.
    pub const NULL: &str = "null";
    /// The value could not be converted to the schema's native kind.
    pub const CONVERT: &str = "convert";
    /// The value is not one of the schema's allowed values.
    pub const ALLOWED: &str = "allowed";
    /// The value lies outside `[min, max]`.
    pub const MINMAX: &str = "minmax";
    /// String or byte length outside the permitted range.
    pub const LENGTH: &str = "length";
    /// Too many list items.
    pub const ITEMS: &str = "items";
    /// Opaque payload type name does not match the schema.
    pub const TYPE: &str = "type";
    /// Opaque payload larger than the schema permits.
    pub const SIZE: &str = "size";
    /// Update of a read-only property.
    pub const READONLY: &str = "readonly";
    /// The schema's own default value violates the schema.
    pub const DEFAULT: &str = "default";
}

/// A value failed the constraints of its schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation failed [{reason}]: {message}")]
pub struct ValidationError {
    /// Short machine-readable reason code, see [`reason`].
    pub reason: &'static str,
    /// Human-readable detail.
    pub message: String,
}

impl ValidationError {
    pub fn new(reason: &'static str, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }
}

impl From<ConversionError> for ValidationError {
    fn from(err: ConversionError) -> Self {
        Self::new(reason::CONVERT, err.to_string())
    }
}

/// An input could not be coerced into a schema's native value kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot convert {found} to {expected}")]
pub struct ConversionError {
    /// The kind the schema expected.
    pub expected: &'static str,
    /// Description of what was supplied.
    pub found: String,
}

impl ConversionError {
    pub fn new(expected: &'static str, found: impl Into<String>) -> Self {
        Self {
            expected,
            found: found.into(),
        }
    }

    /// The serializer has no path for the requested representation.
    pub fn unsupported(expected: &'static str, representation: &str) -> Self {
        Self::new(expected, format!("{} representation (unsupported)", representation))
    }
}

/// Restoration or lookup failed on an unknown name, discriminator or hint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("property '{property}': unknown schema discriminator '{discriminator}'")]
    UnknownDiscriminator {
        property: String,
        discriminator: String,
    },

    #[error("property '{property}': unknown serialization hint {code}")]
    UnknownHint { property: String, code: u8 },

    #[error("property '{property}': value element has no matching schema element")]
    MissingSchema { property: String },

    #[error("property '{0}' is not defined")]
    UnknownProperty(String),
}

impl LookupError {
    /// The property the lookup failed for.
    pub fn property(&self) -> &str {
        match self {
            Self::UnknownDiscriminator { property, .. }
            | Self::UnknownHint { property, .. }
            | Self::MissingSchema { property } => property,
            Self::UnknownProperty(property) => property,
        }
    }
}

/// A schema constraint body could not be rendered or parsed.
#[derive(Error, Debug)]
#[error("property '{property}': malformed constraint body: {source}")]
pub struct BodyError {
    pub property: String,
    #[source]
    pub source: serde_json::Error,
}

/// Unified error type for all typed-props operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Body(#[from] BodyError),

    /// Error from a row store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns `true` if this is a conversion error.
    pub fn is_conversion(&self) -> bool {
        matches!(self, Self::Conversion(_))
    }

    /// Returns `true` if this is a lookup error.
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup(_))
    }

    /// The validation reason code, if this is a validation error.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Self::Validation(err) => Some(err.reason),
            _ => None,
        }
    }
}
