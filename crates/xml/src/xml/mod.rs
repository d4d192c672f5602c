//! XML emission for classified nodes.
//!
//! ## Mapping
//!
//! | Input | XML |
//! |-------|-----|
//! | `{"name": "Widget"}` | `<root><name>Widget</name></root>` |
//! | `{"@id": "42"}` | `<root id="42"/>` |
//! | `{"tags": ["a", "b"]}` | `<root><tags><tag>a</tag><tag>b</tag></tags></root>` |
//! | `{"data": [1]}` | `<root><data><data>1</data></data></root>` |
//! | `{"none": null}` | `<root><none/></root>` |
//!
//! Output is compact: no indentation, no line breaks. The declaration
//! `<?xml version="1.0" ?>` is written once, before the root element, when
//! [`XmlOptions::emit_declaration`] is set.

mod naming;
mod options;
mod ser;

pub use naming::{ATTRIBUTE_SIGIL, attribute_name, singularize, validate_name};
pub use options::{DEFAULT_ROOT_NAME, XML_DECLARATION, XmlOptions};
pub use ser::{
    XmlSerializer, node_to_xml_string, node_to_xml_vec, serialize, to_xml_string, to_xml_vec,
    to_xml_writer,
};
