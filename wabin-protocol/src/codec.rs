//! Node encoder.

use crate::config::EncoderConfig;
use crate::dictionary::TokenDictionary;
use crate::error::ProtocolError;
use crate::node::Node;
use crate::writer::NodeWriter;
use bytes::Bytes;

/// Encodes node trees into binary frames.
///
/// Every call to [`Encoder::encode`] writes into a fresh buffer, so one
/// encoder can be reused and shared across threads.
#[derive(Debug, Clone)]
pub struct Encoder<'d> {
    dict: &'d TokenDictionary,
    config: EncoderConfig,
}

impl Encoder<'static> {
    /// Creates an encoder over the built-in dictionary.
    pub fn new() -> Self {
        Self::with_config(EncoderConfig::default())
    }

    pub fn with_config(config: EncoderConfig) -> Self {
        Self {
            dict: TokenDictionary::standard(),
            config,
        }
    }
}

impl<'d> Encoder<'d> {
    /// Creates an encoder over a caller-supplied dictionary.
    pub fn with_dictionary(dict: &'d TokenDictionary, config: EncoderConfig) -> Self {
        Self { dict, config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn dictionary(&self) -> &TokenDictionary {
        self.dict
    }

    /// Encodes `node` and returns the finished bytes.
    pub fn encode(&self, node: &Node) -> Result<Bytes, ProtocolError> {
        let mut writer = NodeWriter::new(self.dict, &self.config);
        writer.write_node(node)?;
        let bytes = writer.into_bytes();
        tracing::debug!("Encoded <{}> into {} bytes", node.tag, bytes.len());
        Ok(bytes)
    }

    /// Parses a JSON node and encodes it.
    pub fn encode_json(&self, json: &str) -> Result<Bytes, ProtocolError> {
        let node = Node::from_json_str(json)?;
        self.encode(&node)
    }
}

impl Default for Encoder<'static> {
    fn default() -> Self {
        Self::new()
    }
}
