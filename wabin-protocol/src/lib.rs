//! # wabin-protocol
//!
//! Binary node encoder for the chat wire protocol.
//!
//! This crate provides:
//! - Node tree model (tag, attributes, children)
//! - Token dictionary with single- and double-byte tokens
//! - Length-tiered string framing and JID pair compaction
//! - JSON node form for tooling and tests

pub mod codec;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod json;
pub mod node;
pub mod tags;
pub mod writer;

pub use codec::Encoder;
pub use config::{EncoderConfig, NullChildPolicy};
pub use dictionary::{Token, TokenDictionary};
pub use error::{ErrorKind, ProtocolError};
pub use node::{Attributes, Children, Node, Payload};
pub use writer::NodeWriter;
