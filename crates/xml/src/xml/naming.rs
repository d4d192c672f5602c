//! Element and attribute naming.
//!
//! Tags come from context only: the configured root name for the outermost
//! element, the mapping key for nested values, and a singularized key for the
//! items of a sequence.

use crate::error::{Result, XmlError};

/// Prefix marking a mapping key as an attribute of the enclosing element.
pub const ATTRIBUTE_SIGIL: char = '@';

/// Returns the attribute name if `key` carries the attribute sigil.
pub fn attribute_name(key: &str) -> Option<&str> {
    key.strip_prefix(ATTRIBUTE_SIGIL)
}

/// Derives the per-item tag of a sequence from the sequence's own tag.
///
/// Drops exactly one trailing `s`, nothing else: `items` → `item`,
/// `data` → `data`, `status` → `statu`. Purely syntactic.
pub fn singularize(tag: &str) -> &str {
    tag.strip_suffix('s').unwrap_or(tag)
}

/// Checks that `name` can be written as an XML element or attribute name.
///
/// `key` is the mapping key as written in the input and is what the error
/// reports; `path` locates it.
pub fn validate_name(name: &str, key: &str, path: &str) -> Result<()> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(XmlError::invalid_key(key, path, "name is empty"));
    };
    if !(first.is_alphabetic() || first == '_' || first == ':') {
        return Err(XmlError::invalid_key(
            key,
            path,
            "name must start with a letter or underscore",
        ));
    }
    if !chars.all(is_name_char) {
        return Err(XmlError::invalid_key(
            key,
            path,
            "name contains a character not allowed in XML names",
        ));
    }
    Ok(())
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':' | '\u{B7}')
}
