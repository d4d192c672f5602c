//! Error types for XML manifest serialization.
//!
//! Every failure is fatal to the current call: the serializer never returns
//! partial output alongside an error.

use thiserror::Error;

/// Errors produced while classifying input values or emitting XML.
#[derive(Error, Debug)]
pub enum XmlError {
    /// The value is neither a mapping, a sequence nor a scalar.
    #[error("cannot convert value of type `{type_name}` at {path}")]
    TypeConversion {
        /// Runtime type of the offending value (e.g. `bytes`, `sequence`).
        type_name: String,
        /// Location of the value inside the input (`/` for the root).
        path: String,
    },

    /// A mapping key cannot be used as an element or attribute name.
    #[error("invalid key {key:?} at {path}: {reason}")]
    InvalidKey {
        key: String,
        path: String,
        reason: &'static str,
    },

    /// An `@`-prefixed key carries a mapping or sequence.
    #[error("attribute {name:?} at {path} must hold a scalar, found {shape}")]
    NonScalarAttribute {
        name: String,
        path: String,
        shape: &'static str,
    },

    /// A sequence at the document root has no item element name.
    #[error("a sequence at the document root requires an explicit item name")]
    MissingItemName,

    /// Error reported by the underlying XML writer.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// IO error while writing to the output sink.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON input could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML input could not be parsed.
    #[cfg(feature = "toml")]
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Custom error message, usually raised by a `Serialize` implementation.
    #[error("{0}")]
    Custom(String),
}

impl XmlError {
    pub(crate) fn type_conversion(type_name: impl Into<String>, path: impl Into<String>) -> Self {
        XmlError::TypeConversion {
            type_name: type_name.into(),
            path: path.into(),
        }
    }

    pub(crate) fn invalid_key(
        key: impl Into<String>,
        path: impl Into<String>,
        reason: &'static str,
    ) -> Self {
        XmlError::InvalidKey {
            key: key.into(),
            path: path.into(),
            reason,
        }
    }
}

impl From<String> for XmlError {
    fn from(msg: String) -> Self {
        XmlError::Custom(msg)
    }
}

impl From<&str> for XmlError {
    fn from(msg: &str) -> Self {
        XmlError::Custom(msg.to_string())
    }
}

// Lets `XmlError` be the error type of the classifying serializer.
impl serde::ser::Error for XmlError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        XmlError::Custom(msg.to_string())
    }
}

/// Result type alias for XML serialization operations.
pub type Result<T> = std::result::Result<T, XmlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_conversion_message_names_type_and_path() {
        let err = XmlError::type_conversion("bytes", "/payload");
        assert_eq!(
            err.to_string(),
            "cannot convert value of type `bytes` at /payload"
        );
    }

    #[test]
    fn test_invalid_key_message() {
        let err = XmlError::invalid_key("", "/", "key is empty");
        assert_eq!(err.to_string(), "invalid key \"\" at /: key is empty");
    }

    #[test]
    fn test_custom_from_str() {
        let err: XmlError = "boom".into();
        assert!(matches!(err, XmlError::Custom(ref m) if m == "boom"));
    }
}
