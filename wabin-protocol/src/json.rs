//! JSON node form.
//!
//! Nodes are commonly logged and hand-written as `[tag, attrs, children]`
//! arrays:
//!
//! ```text
//! ["action", {"type": "set", "epoch": "3"}, [
//!     ["read", {"jid": "123@s.whatsapp.net"}, null]
//! ]]
//! ```
//!
//! Opaque payloads are written as `{"hex": "0a0b..."}`.

use crate::error::ProtocolError;
use crate::node::{Attributes, Children, Node};
use bytes::Bytes;
use serde_json::{Map, Value};

impl Node {
    /// Parses a node from its JSON text form.
    pub fn from_json_str(json: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(json)?;
        Node::try_from(&value)
    }
}

impl TryFrom<&Value> for Node {
    type Error = ProtocolError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let parts = match value {
            Value::Array(parts) if parts.len() == 3 => parts,
            Value::Array(parts) => {
                return Err(ProtocolError::invalid_node(format!(
                    "expected 3 elements, got {}",
                    parts.len()
                )))
            }
            other => {
                return Err(ProtocolError::invalid_node(format!(
                    "expected an array, got {}",
                    other
                )))
            }
        };

        let tag = parts[0]
            .as_str()
            .ok_or_else(|| ProtocolError::invalid_node(format!("tag is not a string: {}", parts[0])))?;

        Ok(Node {
            tag: tag.to_string(),
            attrs: parse_attrs(&parts[1])?,
            children: parse_children(&parts[2])?,
        })
    }
}

impl TryFrom<Value> for Node {
    type Error = ProtocolError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Node::try_from(&value)
    }
}

fn parse_attrs(value: &Value) -> Result<Option<Attributes>, ProtocolError> {
    let map = match value {
        Value::Null => return Ok(None),
        Value::Object(map) => map,
        other => {
            return Err(ProtocolError::invalid_node(format!(
                "attributes are not an object: {}",
                other
            )))
        }
    };

    let mut attrs = Attributes::new();
    for (key, value) in map {
        let value = match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => {
                return Err(ProtocolError::invalid_node(format!(
                    "attribute {:?} is not a string: {}",
                    key, other
                )))
            }
        };
        attrs.insert(key.clone(), value);
    }
    Ok(Some(attrs))
}

fn parse_children(value: &Value) -> Result<Children, ProtocolError> {
    match value {
        Value::Null => Ok(Children::None),
        Value::String(text) => Ok(Children::Text(text.clone())),
        Value::Array(items) => {
            let nodes = items
                .iter()
                .map(|item| match item {
                    Value::Null => Ok(None),
                    item => Node::try_from(item).map(Some),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Children::List(nodes))
        }
        Value::Object(map) => parse_payload(map),
        other => Err(ProtocolError::invalid_children(format!(
            "{} ({})",
            other,
            type_name(other)
        ))),
    }
}

fn parse_payload(map: &Map<String, Value>) -> Result<Children, ProtocolError> {
    match (map.len(), map.get("hex")) {
        (1, Some(Value::String(encoded))) => {
            let bytes = hex::decode(encoded).map_err(|e| {
                ProtocolError::invalid_children(format!("bad hex payload: {}", e))
            })?;
            Ok(Children::Binary(std::sync::Arc::new(Bytes::from(bytes))))
        }
        _ => Err(ProtocolError::invalid_children(
            "objects must be {\"hex\": \"...\"} payloads",
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::node::Payload;
    use serde_json::json;

    #[test]
    fn test_parse_full_node() {
        let node = Node::from_json_str(
            r#"["action", {"type": "set", "epoch": null}, [["read", null, "hi"], null]]"#,
        )
        .unwrap();

        assert_eq!(node.tag, "action");
        let attrs = node.attrs.as_ref().unwrap();
        assert_eq!(attrs.get("type"), Some(&Some("set".to_string())));
        assert_eq!(attrs.get("epoch"), Some(&None));

        match &node.children {
            Children::List(children) => {
                assert_eq!(children.len(), 2);
                assert!(children[1].is_none());
                let read = children[0].as_ref().unwrap();
                assert_eq!(read.tag, "read");
                assert!(matches!(read.children, Children::Text(ref t) if t == "hi"));
            }
            other => panic!("unexpected children: {:?}", other),
        }
    }

    #[test]
    fn test_missing_children_slot() {
        let err = Node::try_from(json!(["msg", {"id": "1"}])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNode);
    }

    #[test]
    fn test_four_elements() {
        let err = Node::try_from(json!(["msg", null, null, null])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNode);
        assert!(err.to_string().contains("got 4"));
    }

    #[test]
    fn test_not_an_array() {
        let err = Node::try_from(json!({"tag": "msg"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNode);
    }

    #[test]
    fn test_bad_tag_and_attrs() {
        let err = Node::try_from(json!([1, null, null])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNode);

        let err = Node::try_from(json!(["msg", "attrs", null])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNode);

        let err = Node::try_from(json!(["msg", {"id": 5}, null])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNode);
    }

    #[test]
    fn test_numeric_children() {
        let err = Node::try_from(json!(["msg", null, 42])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidChildren);
        assert!(err.to_string().contains("number"));

        let err = Node::try_from(json!(["msg", null, true])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidChildren);
    }

    #[test]
    fn test_nested_invalid_node() {
        let err = Node::try_from(json!(["msg", null, [["child", null]]])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNode);
    }

    #[test]
    fn test_hex_payload() {
        let node = Node::try_from(json!(["message", null, {"hex": "0a0b"}])).unwrap();
        match node.children {
            Children::Binary(payload) => assert_eq!(payload.serialize().as_ref(), &[0x0A, 0x0B]),
            other => panic!("unexpected children: {:?}", other),
        }

        let err = Node::try_from(json!(["message", null, {"hex": "zz"}])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidChildren);

        let err = Node::try_from(json!(["message", null, {"key": "value"}])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidChildren);
    }

    #[test]
    fn test_malformed_text() {
        let err = Node::from_json_str("[\"msg\", null").unwrap_err();
        assert!(matches!(err, ProtocolError::Json(_)));
    }
}
