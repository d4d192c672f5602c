//! Classifying `serde::Serializer` that turns any `Serialize` value into a [`Node`].
//!
//! Shapes follow serde's data model the way `serde_json` maps it: structs and
//! maps become mappings, sequences and tuples become sequences, enum variants
//! carrying data become single-entry mappings keyed by the variant name.
//! Raw bytes and non-scalar map keys have no node shape and are rejected with
//! [`XmlError::TypeConversion`].

use serde::ser::{self, Serialize};

use super::{Mapping, Node, Scalar, child_path};
use crate::error::{Result, XmlError};

/// Serializer producing a [`Node`] for the value at `path`.
pub(crate) struct NodeSerializer {
    path: String,
}

impl NodeSerializer {
    pub(crate) fn root() -> Self {
        Self {
            path: "/".to_string(),
        }
    }

    fn at(path: String) -> Self {
        Self { path }
    }
}

fn scalar(value: Scalar) -> Result<Node> {
    Ok(Node::Scalar(value))
}

/// Wraps `inner` in a single-entry mapping keyed by the variant name.
fn variant_node(variant: &str, inner: Node) -> Node {
    let mut entries = Mapping::with_capacity(1);
    entries.insert(variant.to_string(), inner);
    Node::Mapping(entries)
}

impl ser::Serializer for NodeSerializer {
    type Ok = Node;
    type Error = XmlError;

    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = SeqBuilder;
    type SerializeTupleVariant = VariantBuilder<SeqBuilder>;
    type SerializeMap = MapBuilder;
    type SerializeStruct = MapBuilder;
    type SerializeStructVariant = VariantBuilder<MapBuilder>;

    fn serialize_bool(self, v: bool) -> Result<Node> {
        scalar(Scalar::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Node> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Node> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Node> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Node> {
        scalar(Scalar::Int(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Node> {
        match i64::try_from(v) {
            Ok(v) => scalar(Scalar::Int(v)),
            Err(_) => scalar(Scalar::Text(v.to_string())),
        }
    }

    fn serialize_u8(self, v: u8) -> Result<Node> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Node> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Node> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Node> {
        scalar(Scalar::UInt(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Node> {
        match u64::try_from(v) {
            Ok(v) => scalar(Scalar::UInt(v)),
            Err(_) => scalar(Scalar::Text(v.to_string())),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Node> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Node> {
        scalar(Scalar::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Node> {
        scalar(Scalar::Text(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Node> {
        scalar(Scalar::Text(v.to_string()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Node> {
        Err(XmlError::type_conversion("bytes", self.path))
    }

    fn serialize_none(self) -> Result<Node> {
        scalar(Scalar::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Node> {
        scalar(Scalar::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Node> {
        scalar(Scalar::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Node> {
        scalar(Scalar::Text(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        let inner = value.serialize(NodeSerializer::at(child_path(&self.path, variant)))?;
        Ok(variant_node(variant, inner))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SeqBuilder::new(self.path, len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        Ok(SeqBuilder::new(self.path, len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(SeqBuilder::new(self.path, len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        let path = child_path(&self.path, variant);
        Ok(VariantBuilder {
            variant,
            inner: SeqBuilder::new(path, len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(MapBuilder::new(self.path, len.unwrap_or(0)))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        Ok(MapBuilder::new(self.path, len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        let path = child_path(&self.path, variant);
        Ok(VariantBuilder {
            variant,
            inner: MapBuilder::new(path, len),
        })
    }
}

/// Collects sequence and tuple elements.
pub(crate) struct SeqBuilder {
    path: String,
    items: Vec<Node>,
}

impl SeqBuilder {
    fn new(path: String, len: usize) -> Self {
        Self {
            path,
            items: Vec::with_capacity(len),
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let path = child_path(&self.path, &self.items.len().to_string());
        self.items.push(value.serialize(NodeSerializer::at(path))?);
        Ok(())
    }

    fn finish(self) -> Node {
        Node::Sequence(self.items)
    }
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = Node;
    type Error = XmlError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = Node;
    type Error = XmlError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SeqBuilder {
    type Ok = Node;
    type Error = XmlError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

/// Collects map and struct entries, rejecting repeated keys.
pub(crate) struct MapBuilder {
    path: String,
    entries: Mapping,
    pending_key: Option<String>,
}

impl MapBuilder {
    fn new(path: String, len: usize) -> Self {
        Self {
            path,
            entries: Mapping::with_capacity(len),
            pending_key: None,
        }
    }

    fn insert<T>(&mut self, key: String, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let path = child_path(&self.path, &key);
        if self.entries.contains_key(&key) {
            return Err(XmlError::invalid_key(key, path, "duplicate key in mapping"));
        }
        let node = value.serialize(NodeSerializer::at(path))?;
        self.entries.insert(key, node);
        Ok(())
    }

    fn finish(self) -> Node {
        Node::Mapping(self.entries)
    }
}

impl ser::SerializeMap for MapBuilder {
    type Ok = Node;
    type Error = XmlError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let path = self.path.clone();
        self.pending_key = Some(key.serialize(KeySerializer { path })?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| XmlError::Custom("map value serialized before its key".to_string()))?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for MapBuilder {
    type Ok = Node;
    type Error = XmlError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

/// Wraps the payload of a tuple or struct variant under the variant name.
pub(crate) struct VariantBuilder<B> {
    variant: &'static str,
    inner: B,
}

impl ser::SerializeTupleVariant for VariantBuilder<SeqBuilder> {
    type Ok = Node;
    type Error = XmlError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(variant_node(self.variant, self.inner.finish()))
    }
}

impl ser::SerializeStructVariant for VariantBuilder<MapBuilder> {
    type Ok = Node;
    type Error = XmlError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Node> {
        Ok(variant_node(self.variant, self.inner.finish()))
    }
}

/// Captures a map key as text. Keys must be scalars with a text form.
struct KeySerializer {
    path: String,
}

impl KeySerializer {
    fn reject(self, type_name: &str) -> XmlError {
        XmlError::type_conversion(format!("map key of type {}", type_name), self.path)
    }
}

impl ser::Serializer for KeySerializer {
    type Ok = String;
    type Error = XmlError;
    type SerializeSeq = ser::Impossible<String, XmlError>;
    type SerializeTuple = ser::Impossible<String, XmlError>;
    type SerializeTupleStruct = ser::Impossible<String, XmlError>;
    type SerializeTupleVariant = ser::Impossible<String, XmlError>;
    type SerializeMap = ser::Impossible<String, XmlError>;
    type SerializeStruct = ser::Impossible<String, XmlError>;
    type SerializeStructVariant = ser::Impossible<String, XmlError>;

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_bool(self, v: bool) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_f32(self, _v: f32) -> Result<String> {
        Err(self.reject("float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String> {
        Err(self.reject("float"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(self.reject("bytes"))
    }

    fn serialize_none(self) -> Result<String> {
        Err(self.reject("null"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String> {
        Err(self.reject("null"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(self.reject("null"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(self.reject("enum variant"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(self.reject("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(self.reject("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(self.reject("tuple"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.reject("enum variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(self.reject("mapping"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(self.reject("mapping"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.reject("enum variant"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Package {
        name: String,
        version: Option<String>,
        targets: Vec<&'static str>,
    }

    #[derive(Serialize)]
    enum Source {
        Local,
        Remote(String),
        Mirror { url: String, weight: u8 },
    }

    #[derive(Serialize)]
    struct Blob {
        #[serde(with = "raw_bytes")]
        data: Vec<u8>,
    }

    mod raw_bytes {
        pub fn serialize<S: serde::Serializer>(v: &[u8], s: S) -> Result<S::Ok, S::Error> {
            s.serialize_bytes(v)
        }
    }

    #[test]
    fn test_struct_becomes_ordered_mapping() -> Result<()> {
        let node = Node::from_serialize(&Package {
            name: "core".to_string(),
            version: None,
            targets: vec!["linux", "macos"],
        })?;

        let Node::Mapping(entries) = &node else {
            panic!("expected mapping, got {}", node.shape());
        };
        let keys: Vec<&str> = entries.keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "version", "targets"]);
        assert_eq!(entries["version"], Node::null());
        assert_eq!(entries["targets"], Node::from(vec!["linux", "macos"]));
        Ok(())
    }

    #[test]
    fn test_enum_variants() -> Result<()> {
        assert_eq!(Node::from_serialize(&Source::Local)?, Node::text("Local"));

        let remote = Node::from_serialize(&Source::Remote("https://x".into()))?;
        assert_eq!(remote.select("Remote"), Some(&Node::text("https://x")));

        let mirror = Node::from_serialize(&Source::Mirror {
            url: "https://m".into(),
            weight: 3,
        })?;
        assert_eq!(mirror.select("Mirror.weight"), Some(&Node::from(3u64)));
        Ok(())
    }

    #[test]
    fn test_integer_keys_become_text() -> Result<()> {
        let mut map = BTreeMap::new();
        map.insert(1, "one");
        map.insert(2, "two");
        let node = Node::from_serialize(&map)?;
        assert_eq!(node.select("2"), Some(&Node::text("two")));
        Ok(())
    }

    #[test]
    fn test_bytes_are_rejected_with_path() {
        let err = Node::from_serialize(&Blob { data: vec![1, 2] }).unwrap_err();
        match err {
            XmlError::TypeConversion { type_name, path } => {
                assert_eq!(type_name, "bytes");
                assert_eq!(path, "/data");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sequence_key_is_rejected() {
        let mut map = BTreeMap::new();
        map.insert(vec![1, 2], "pair");
        let err = Node::from_serialize(&map).unwrap_err();
        assert!(matches!(
            err,
            XmlError::TypeConversion { ref type_name, .. } if type_name == "map key of type sequence"
        ));
    }

    #[test]
    fn test_nested_path_reported() {
        let nested = vec![BTreeMap::from([("blob", Blob { data: vec![0] })])];
        let err = Node::from_serialize(&nested).unwrap_err();
        assert!(matches!(
            err,
            XmlError::TypeConversion { ref path, .. } if path == "/0/blob/data"
        ));
    }
}
