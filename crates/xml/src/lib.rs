//! # manifold-xml
//!
//! Converts nested in-memory data (mappings, sequences and scalar leaves)
//! into compact XML text, for emitting configuration and manifest documents
//! from structured build data.
//!
//! ## Pipeline
//!
//! 1. **Classification** ([`node`]): the input becomes a [`Node`], either from any
//!    `serde::Serialize` value or from a parsed JSON/TOML document. Values
//!    with no node shape fail with [`XmlError::TypeConversion`].
//! 2. **Naming** ([`xml::singularize`], [`xml::validate_name`]): tags come from
//!    the root name, the mapping key, or the singularized key for sequence
//!    items. Keys prefixed with `@` become attributes.
//! 3. **Emission** ([`xml::XmlSerializer`]): a depth-first walk writes
//!    quick-xml events; the document is returned only if every node succeeds.
//!
//! ## Example
//!
//! ```
//! use manifold_xml::{Node, serialize};
//!
//! let node = Node::from_json_str(r#"{"@version": "2", "files": ["a.qml", "b.qml"]}"#)?;
//! let xml = serialize(&node, Some("package"), true)?;
//! assert_eq!(
//!     xml,
//!     r#"<?xml version="1.0" ?><package version="2"><files><file>a.qml</file><file>b.qml</file></files></package>"#
//! );
//! # Ok::<(), manifold_xml::XmlError>(())
//! ```

pub mod error;
pub mod node;
pub mod xml;

pub use error::{Result, XmlError};
pub use node::{Mapping, Node, Scalar, Shape};
pub use xml::{
    DEFAULT_ROOT_NAME, XML_DECLARATION, XmlOptions, node_to_xml_string, serialize, to_xml_string,
    to_xml_vec, to_xml_writer,
};
