//! Serialization options.
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `root_name` | `root` | Tag of the outermost element |
//! | `item_name` | none | Item tag for a sequence at the document root |
//! | `emit_declaration` | `true` | Prefix the output with `<?xml version="1.0" ?>` |
//! | `escape` | `true` | Escape markup characters in text and attribute values |
//!
//! # Example
//!
//! ```rust
//! use manifold_xml::XmlOptions;
//!
//! let options = XmlOptions {
//!     root_name: "manifest".to_string(),
//!     emit_declaration: false,
//!     ..Default::default()
//! };
//! assert!(options.escape);
//! ```

/// Tag used for the outermost element when no root name is given.
pub const DEFAULT_ROOT_NAME: &str = "root";

/// Declaration written once at the start of a document.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" ?>"#;

/// Options controlling how a [`Node`](crate::Node) is written as XML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlOptions {
    /// Tag of the outermost element.
    pub root_name: String,

    /// Tag of each item when the document root is a sequence. Required in
    /// that case, since there is no enclosing key to singularize.
    pub item_name: Option<String>,

    /// Write [`XML_DECLARATION`] before the root element.
    pub emit_declaration: bool,

    /// Escape `<`, `>`, `&`, `'` and `"` in text and attribute values.
    /// Disable only when values are known to contain pre-escaped markup.
    pub escape: bool,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            item_name: None,
            emit_declaration: true,
            escape: true,
        }
    }
}

impl XmlOptions {
    /// Options for an outermost element named `root_name`.
    pub fn named(root_name: impl Into<String>) -> Self {
        Self {
            root_name: root_name.into(),
            ..Default::default()
        }
    }

    pub fn with_item_name(mut self, item_name: impl Into<String>) -> Self {
        self.item_name = Some(item_name.into());
        self
    }

    pub fn with_declaration(mut self, emit_declaration: bool) -> Self {
        self.emit_declaration = emit_declaration;
        self
    }

    pub fn with_escape(mut self, escape: bool) -> Self {
        self.escape = escape;
        self
    }
}
