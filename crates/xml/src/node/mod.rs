//! In-memory node model and classification of input values.
//!
//! A [`Node`] is the closed set of shapes the XML writer understands:
//!
//! | Shape | Rust value | JSON value |
//! |-------|------------|------------|
//! | [`Node::Mapping`] | struct, map, struct variant | object |
//! | [`Node::Sequence`] | `Vec`, slice, tuple | array |
//! | [`Node::Scalar`] | string, number, bool, `None`, unit | string, number, bool, null |
//!
//! Classification happens once, at the trust boundary: arbitrary
//! `serde::Serialize` values go through [`Node::from_serialize`], parsed JSON
//! (and TOML with the `toml` feature) through the `From` conversions. Values
//! that fit none of the shapes fail with [`XmlError::TypeConversion`](crate::XmlError::TypeConversion).

mod ser;

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;

/// Ordered key → node entries of a mapping. Keys are unique.
pub type Mapping = IndexMap<String, Node>;

/// A classified input value.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Ordered key → value pairs with unique keys.
    Mapping(Mapping),
    /// Ordered list of values.
    Sequence(Vec<Node>),
    /// Leaf value with a direct text form.
    Scalar(Scalar),
}

/// Leaf values.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

/// The three shapes a [`Node`] can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Mapping,
    Sequence,
    Scalar,
}

impl Shape {
    /// Lower-case name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Mapping => "mapping",
            Shape::Sequence => "sequence",
            Shape::Scalar => "scalar",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Node {
    /// Classifies any serializable value.
    ///
    /// # Examples
    ///
    /// ```
    /// use manifold_xml::{Node, Shape};
    /// use std::collections::BTreeMap;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("name", "Widget");
    /// let node = Node::from_serialize(&map)?;
    /// assert_eq!(node.shape(), Shape::Mapping);
    /// # Ok::<(), manifold_xml::XmlError>(())
    /// ```
    pub fn from_serialize<T>(value: &T) -> Result<Node>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(ser::NodeSerializer::root())
    }

    /// Parses a JSON document, keeping object keys in document order.
    pub fn from_json_str(s: &str) -> Result<Node> {
        let value: serde_json::Value = serde_json::from_str(s)?;
        Ok(Node::from(value))
    }

    /// Parses a TOML document, keeping table keys in document order.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Node> {
        let value: toml::Table = toml::from_str(s)?;
        Ok(Node::from(toml::Value::Table(value)))
    }

    /// Creates an empty mapping.
    pub fn mapping() -> Node {
        Node::Mapping(Mapping::new())
    }

    /// Creates a text scalar.
    pub fn text(value: impl Into<String>) -> Node {
        Node::Scalar(Scalar::Text(value.into()))
    }

    /// Creates a null scalar.
    pub fn null() -> Node {
        Node::Scalar(Scalar::Null)
    }

    /// Returns the shape of this node.
    pub fn shape(&self) -> Shape {
        match self {
            Node::Mapping(_) => Shape::Mapping,
            Node::Sequence(_) => Shape::Sequence,
            Node::Scalar(_) => Shape::Scalar,
        }
    }

    /// Runtime type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Mapping(_) => "mapping",
            Node::Sequence(_) => "sequence",
            Node::Scalar(scalar) => scalar.type_name(),
        }
    }

    /// Follows a dotted path (`a.b.c`) through nested mappings.
    ///
    /// Numeric segments index into sequences.
    pub fn select(&self, path: &str) -> Option<&Node> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| match node {
                Node::Mapping(entries) => entries.get(segment),
                Node::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                Node::Scalar(_) => None,
            })
    }
}

impl Scalar {
    /// Text form of the scalar as it appears in element content or attributes.
    ///
    /// `Null` renders as the empty string. Floats follow serde_json's spelling:
    /// whole numbers keep a trailing `.0` (`1.0`), very large or very small
    /// magnitudes use exponent form (`1e300`, `2.5e-7`).
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Scalar::Null => Cow::Borrowed(""),
            Scalar::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Scalar::Int(v) => Cow::Owned(v.to_string()),
            Scalar::UInt(v) => Cow::Owned(v.to_string()),
            Scalar::Float(v) => Cow::Owned(float_text(*v)),
            Scalar::Text(s) => Cow::Borrowed(s),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "boolean",
            Scalar::Int(_) | Scalar::UInt(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Text(_) => "string",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Node::Scalar(scalar)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::text(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::text(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Scalar(Scalar::Bool(value))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Scalar(Scalar::Int(value))
    }
}

impl From<u64> for Node {
    fn from(value: u64) -> Self {
        Node::Scalar(Scalar::UInt(value))
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Scalar(Scalar::Float(value))
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(items: Vec<T>) -> Self {
        Node::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<K, V> FromIterator<(K, V)> for Node
where
    K: Into<String>,
    V: Into<Node>,
{
    /// Collects key/value pairs into a mapping; a repeated key keeps its first
    /// position and takes the last value.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Node::Mapping(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl From<Mapping> for Node {
    fn from(entries: Mapping) -> Self {
        Node::Mapping(entries)
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Node::null(),
            Value::Bool(b) => Node::from(b),
            Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Node::from(v)
                } else if let Some(v) = n.as_u64() {
                    Node::from(v)
                } else {
                    // Arbitrary-precision numbers outside f64 keep their JSON spelling.
                    n.as_f64()
                        .map(Node::from)
                        .unwrap_or_else(|| Node::text(n.to_string()))
                }
            }
            Value::String(s) => Node::text(s),
            Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Object(entries) => Node::Mapping(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(feature = "toml")]
impl From<toml::Value> for Node {
    fn from(value: toml::Value) -> Self {
        use toml::Value;

        match value {
            Value::String(s) => Node::text(s),
            Value::Integer(v) => Node::from(v),
            Value::Float(v) => Node::from(v),
            Value::Boolean(b) => Node::from(b),
            Value::Datetime(dt) => Node::text(dt.to_string()),
            Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Table(entries) => Node::Mapping(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect(),
            ),
        }
    }
}

fn float_text(v: f64) -> String {
    let magnitude = v.abs();
    if !v.is_finite() {
        v.to_string()
    } else if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-5) {
        format!("{:e}", v)
    } else if v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        v.to_string()
    }
}

/// Joins a location path with one more segment; the root is `/`.
pub(crate) fn child_path(parent: &str, segment: &str) -> String {
    if parent == "/" {
        format!("/{}", segment)
    } else {
        format!("{}/{}", parent, segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shape_of_json_values() {
        assert_eq!(Node::from(json!({"a": 1})).shape(), Shape::Mapping);
        assert_eq!(Node::from(json!([1, 2])).shape(), Shape::Sequence);
        assert_eq!(Node::from(json!("text")).shape(), Shape::Scalar);
        assert_eq!(Node::from(json!(null)).shape(), Shape::Scalar);
        assert_eq!(Node::from(json!(1.5)).shape(), Shape::Scalar);
    }

    #[test]
    fn test_json_object_keeps_insertion_order() -> Result<()> {
        let node = Node::from_json_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#)?;
        let Node::Mapping(entries) = node else {
            panic!("expected mapping");
        };
        let keys: Vec<&str> = entries.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        Ok(())
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(Scalar::Null.to_text(), "");
        assert_eq!(Scalar::Bool(true).to_text(), "true");
        assert_eq!(Scalar::Int(-4).to_text(), "-4");
        assert_eq!(Scalar::UInt(u64::MAX).to_text(), "18446744073709551615");
        assert_eq!(Scalar::Float(1.0).to_text(), "1.0");
        assert_eq!(Scalar::Float(2.25).to_text(), "2.25");
        assert_eq!(Scalar::Float(-0.5).to_text(), "-0.5");
        assert_eq!(Scalar::Text("x".into()).to_text(), "x");
    }

    #[test]
    fn test_float_text_uses_exponent_for_extreme_magnitudes() {
        assert_eq!(Scalar::Float(1e300).to_text(), "1e300");
        assert_eq!(Scalar::Float(-1e16).to_text(), "-1e16");
        assert_eq!(Scalar::Float(2.5e-7).to_text(), "2.5e-7");
        assert_eq!(Scalar::Float(1e15).to_text(), "1000000000000000.0");
        assert_eq!(Scalar::Float(0.0).to_text(), "0.0");
        assert_eq!(Scalar::Float(f64::INFINITY).to_text(), "inf");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Node::from(json!({})).type_name(), "mapping");
        assert_eq!(Node::from(json!([])).type_name(), "sequence");
        assert_eq!(Node::from(json!(true)).type_name(), "boolean");
        assert_eq!(Node::from(json!(3)).type_name(), "integer");
        assert_eq!(Node::from(json!("s")).type_name(), "string");
    }

    #[test]
    fn test_select_dotted_path() {
        let node = Node::from(json!({
            "tool": {"qt": {"version": "6.5"}, "mirrors": ["a", "b"]}
        }));
        assert_eq!(node.select("tool.qt.version"), Some(&Node::text("6.5")));
        assert_eq!(node.select("tool.mirrors.1"), Some(&Node::text("b")));
        assert_eq!(node.select("tool.missing"), None);
        assert_eq!(node.select("tool.qt.version.deeper"), None);
        assert_eq!(node.select(""), Some(&node));
    }

    #[test]
    fn test_collect_into_mapping() {
        let node: Node = [("name", Node::text("Widget")), ("count", Node::from(3i64))]
            .into_iter()
            .collect();
        assert_eq!(node.select("name"), Some(&Node::text("Widget")));
        assert_eq!(node.select("count"), Some(&Node::from(3i64)));
    }

    #[test]
    fn test_child_path() {
        assert_eq!(child_path("/", "a"), "/a");
        assert_eq!(child_path("/a", "b"), "/a/b");
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_datetime_is_text() -> Result<()> {
        let node = Node::from_toml_str("released = 1979-05-27T07:32:00Z\n")?;
        assert_eq!(
            node.select("released"),
            Some(&Node::text("1979-05-27T07:32:00Z"))
        );
        Ok(())
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_parse_error_is_typed() {
        let err = Node::from_toml_str("name = \n").unwrap_err();
        assert!(matches!(err, crate::XmlError::Toml(_)));
        assert!(err.to_string().starts_with("TOML error: "));
    }
}
