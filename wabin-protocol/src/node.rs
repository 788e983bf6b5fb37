//! Node tree model.

use bytes::Bytes;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Attribute map. `None` values are kept in the map but never encoded.
pub type Attributes = BTreeMap<String, Option<String>>;

/// A structured object that serializes itself to bytes on request.
///
/// Opaque children are embedded verbatim; the encoder never looks inside.
pub trait Payload: Send + Sync {
    fn serialize(&self) -> Bytes;
}

impl Payload for Bytes {
    fn serialize(&self) -> Bytes {
        self.clone()
    }
}

impl Payload for Vec<u8> {
    fn serialize(&self) -> Bytes {
        Bytes::copy_from_slice(self)
    }
}

impl Payload for &'static [u8] {
    fn serialize(&self) -> Bytes {
        Bytes::from_static(self)
    }
}

/// Node children.
#[derive(Clone, Default)]
pub enum Children {
    #[default]
    None,
    Text(String),
    /// Child nodes. `None` entries are placeholders and produce no bytes.
    List(Vec<Option<Node>>),
    Binary(Arc<dyn Payload>),
}

impl Children {
    pub fn is_present(&self) -> bool {
        !matches!(self, Children::None)
    }
}

impl fmt::Debug for Children {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Children::None => write!(f, "None"),
            Children::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Children::List(nodes) => f.debug_tuple("List").field(nodes).finish(),
            Children::Binary(_) => write!(f, "Binary(..)"),
        }
    }
}

impl From<String> for Children {
    fn from(text: String) -> Self {
        Children::Text(text)
    }
}

impl From<&str> for Children {
    fn from(text: &str) -> Self {
        Children::Text(text.to_string())
    }
}

impl From<Vec<Node>> for Children {
    fn from(nodes: Vec<Node>) -> Self {
        Children::List(nodes.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<Node>>> for Children {
    fn from(nodes: Vec<Option<Node>>) -> Self {
        Children::List(nodes)
    }
}

/// A tag, its attributes and its children.
#[derive(Debug, Clone)]
pub struct Node {
    pub tag: String,
    pub attrs: Option<Attributes>,
    pub children: Children,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: None,
            children: Children::None,
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs
            .get_or_insert_with(Attributes::new)
            .insert(key.into(), Some(value.into()));
        self
    }

    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = Some(attrs);
        self
    }

    pub fn with_children(mut self, children: impl Into<Children>) -> Self {
        self.children = children.into();
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_children(Children::Text(text.into()))
    }

    pub fn with_binary(mut self, payload: impl Payload + 'static) -> Self {
        self.children = Children::Binary(Arc::new(payload));
        self
    }

    /// Keys of attributes that carry a value, in encoding order.
    pub fn active_attr_keys(&self) -> Vec<&str> {
        self.attrs
            .as_ref()
            .map(|attrs| {
                attrs
                    .iter()
                    .filter(|(_, v)| v.is_some())
                    .map(|(k, _)| k.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}
