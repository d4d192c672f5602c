//! Recursive node → XML transformation.
//!
//! Writes quick-xml events for a classified [`Node`] tree into an in-memory
//! buffer. The buffer is handed to the caller only once the whole document has
//! been written, so a failure never leaves partial output behind.
//!
//! Rules applied at each mapping entry, in insertion order:
//!
//! - `@name` keys become attributes of the enclosing element;
//! - mapping and sequence values recurse, the key naming the nested element;
//! - scalar values become leaf elements `<key>text</key>` (`<key/>` for null).
//!
//! Sequence items are named after the singularized tag of the sequence.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{Result, XmlError};
use crate::node::{Mapping, Node, Scalar, child_path};
use crate::xml::naming::{self, validate_name};
use crate::xml::options::{XML_DECLARATION, XmlOptions};

/// Serializes a node with an optional root name.
///
/// `root_name` defaults to [`DEFAULT_ROOT_NAME`](crate::DEFAULT_ROOT_NAME).
/// A sequence at the root needs an item name and therefore has to go through
/// [`node_to_xml_string`] with [`XmlOptions::item_name`] set.
///
/// # Examples
///
/// ```
/// use manifold_xml::{Node, serialize};
///
/// let node = Node::from_json_str(r#"{"name": "Widget", "@id": "42", "tags": ["a", "b"]}"#)?;
/// let xml = serialize(&node, Some("item"), false)?;
/// assert_eq!(
///     xml,
///     r#"<item id="42"><name>Widget</name><tags><tag>a</tag><tag>b</tag></tags></item>"#
/// );
/// # Ok::<(), manifold_xml::XmlError>(())
/// ```
pub fn serialize(value: &Node, root_name: Option<&str>, emit_declaration: bool) -> Result<String> {
    let mut options = XmlOptions::default().with_declaration(emit_declaration);
    if let Some(name) = root_name {
        options.root_name = name.to_string();
    }
    node_to_xml_string(value, &options)
}

/// Serializes a node to an XML string.
pub fn node_to_xml_string(node: &Node, options: &XmlOptions) -> Result<String> {
    let buffer = node_to_xml_vec(node, options)?;
    String::from_utf8(buffer).map_err(|e| XmlError::Custom(e.to_string()))
}

/// Serializes a node to an XML byte vector.
pub fn node_to_xml_vec(node: &Node, options: &XmlOptions) -> Result<Vec<u8>> {
    let mut serializer = XmlSerializer::new(Vec::new(), options);
    serializer.write_document(node)?;
    Ok(serializer.into_inner())
}

/// Classifies any serializable value and writes it as an XML string.
///
/// # Examples
///
/// ```
/// use manifold_xml::{XmlOptions, to_xml_string};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Module {
///     #[serde(rename = "@name")]
///     name: &'static str,
///     files: Vec<&'static str>,
/// }
///
/// let module = Module { name: "core", files: vec!["lib.rs"] };
/// let xml = to_xml_string(&module, &XmlOptions::named("module").with_declaration(false))?;
/// assert_eq!(xml, r#"<module name="core"><files><file>lib.rs</file></files></module>"#);
/// # Ok::<(), manifold_xml::XmlError>(())
/// ```
pub fn to_xml_string<T>(value: &T, options: &XmlOptions) -> Result<String>
where
    T: Serialize + ?Sized,
{
    node_to_xml_string(&Node::from_serialize(value)?, options)
}

/// Classifies any serializable value and writes it as an XML byte vector.
pub fn to_xml_vec<T>(value: &T, options: &XmlOptions) -> Result<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    node_to_xml_vec(&Node::from_serialize(value)?, options)
}

/// Classifies any serializable value and writes the XML to `writer`.
///
/// Nothing is written to `writer` unless the whole document succeeds.
pub fn to_xml_writer<T, W>(value: &T, options: &XmlOptions, mut writer: W) -> Result<()>
where
    T: Serialize + ?Sized,
    W: Write,
{
    let buffer = to_xml_vec(value, options)?;
    writer.write_all(&buffer)?;
    writer.flush()?;
    Ok(())
}

/// XML writer for a classified node tree.
pub struct XmlSerializer<'o, W: Write> {
    writer: Writer<W>,
    options: &'o XmlOptions,
}

impl<'o, W: Write> XmlSerializer<'o, W> {
    /// Creates a compact (unindented) serializer over `writer`.
    pub fn new(writer: W, options: &'o XmlOptions) -> Self {
        Self {
            writer: Writer::new(writer),
            options,
        }
    }

    /// Returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    /// Writes the declaration (if enabled) and the root element.
    pub fn write_document(&mut self, node: &Node) -> Result<()> {
        let root = self.options.root_name.as_str();
        debug!(root = %root, shape = %node.shape(), "Serializing XML document");

        validate_name(root, root, "/")?;

        if self.options.emit_declaration {
            self.writer.get_mut().write_all(XML_DECLARATION.as_bytes())?;
        }

        match node {
            Node::Mapping(entries) => self.write_mapping(root, entries, "/"),
            Node::Sequence(items) => {
                let item_name = self
                    .options
                    .item_name
                    .as_deref()
                    .ok_or(XmlError::MissingItemName)?;
                self.write_sequence(root, item_name, items, "/")
            }
            Node::Scalar(scalar) => Err(XmlError::type_conversion(scalar.type_name(), "/")),
        }
    }

    /// Writes `node` as an element named `name`.
    fn write_node(&mut self, name: &str, node: &Node, path: &str) -> Result<()> {
        match node {
            Node::Mapping(entries) => self.write_mapping(name, entries, path),
            Node::Sequence(items) => self.write_sequence(name, naming::singularize(name), items, path),
            Node::Scalar(scalar) => self.write_leaf(name, scalar),
        }
    }

    fn write_mapping(&mut self, name: &str, entries: &Mapping, path: &str) -> Result<()> {
        trace!(element = %name, path = %path, entries = entries.len(), "Writing mapping");

        let mut element = BytesStart::new(name);
        let mut children = Vec::with_capacity(entries.len());

        for (key, value) in entries {
            let entry_path = child_path(path, key);
            if let Some(attribute) = naming::attribute_name(key) {
                validate_name(attribute, key, &entry_path)?;
                let Node::Scalar(scalar) = value else {
                    return Err(XmlError::NonScalarAttribute {
                        name: attribute.to_string(),
                        path: entry_path,
                        shape: value.shape().as_str(),
                    });
                };
                self.push_attribute(&mut element, attribute, &scalar.to_text());
            } else {
                validate_name(key, key, &entry_path)?;
                children.push((key.as_str(), value, entry_path));
            }
        }

        if children.is_empty() {
            self.writer.write_event(Event::Empty(element))?;
            return Ok(());
        }

        self.writer.write_event(Event::Start(element))?;
        for (key, value, entry_path) in children {
            self.write_node(key, value, &entry_path)?;
        }
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_sequence(
        &mut self,
        name: &str,
        item_name: &str,
        items: &[Node],
        path: &str,
    ) -> Result<()> {
        trace!(element = %name, item = %item_name, path = %path, items = items.len(), "Writing sequence");

        if items.is_empty() {
            self.writer.write_event(Event::Empty(BytesStart::new(name)))?;
            return Ok(());
        }

        if item_name.is_empty() {
            return Err(XmlError::invalid_key(
                name,
                path,
                "item name derived from this key is empty",
            ));
        }
        validate_name(item_name, item_name, path)?;

        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        for (index, item) in items.iter().enumerate() {
            let item_path = child_path(path, &index.to_string());
            self.write_node(item_name, item, &item_path)?;
        }
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_leaf(&mut self, name: &str, scalar: &Scalar) -> Result<()> {
        if scalar.is_null() {
            self.writer.write_event(Event::Empty(BytesStart::new(name)))?;
            return Ok(());
        }

        let text = scalar.to_text();
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        if !text.is_empty() {
            let content = if self.options.escape {
                BytesText::new(&text)
            } else {
                BytesText::from_escaped(&*text)
            };
            self.writer.write_event(Event::Text(content))?;
        }
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn push_attribute(&self, element: &mut BytesStart<'_>, name: &str, value: &str) {
        if self.options.escape {
            element.push_attribute((name, value));
        } else {
            // Byte pairs are pushed verbatim, without escaping.
            element.push_attribute((name.as_bytes(), value.as_bytes()));
        }
    }
}
