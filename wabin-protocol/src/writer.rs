//! Low-level node writer.
//!
//! A [`NodeWriter`] owns the output buffer for a single encode call. It
//! provides the byte, length and string primitives and the recursive
//! traversal built on top of them.

use crate::config::{EncoderConfig, NullChildPolicy};
use crate::dictionary::{Token, TokenDictionary, LEGACY_USER_SERVER, USER_SERVER};
use crate::error::ProtocolError;
use crate::node::{Attributes, Children, Node, Payload};
use crate::tags::{
    BINARY_20, BINARY_20_LIMIT, BINARY_32, BINARY_32_LIMIT, BINARY_8, DICTIONARY_0, JID_PAIR,
    LIST_16, LIST_8, LIST_EMPTY, MAX_LIST_LEN, TOKEN_LIMIT,
};
use bytes::{BufMut, Bytes, BytesMut};

pub struct NodeWriter<'a> {
    buf: BytesMut,
    dict: &'a TokenDictionary,
    null_children: NullChildPolicy,
}

impl<'a> NodeWriter<'a> {
    pub fn new(dict: &'a TokenDictionary, config: &EncoderConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(config.initial_capacity),
            dict,
            null_children: config.null_children,
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finishes the writer and returns the accumulated bytes.
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    pub fn push_byte(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    /// Appends the low `n` bytes of `value`.
    pub fn push_int(&mut self, value: u64, n: usize, little_endian: bool) {
        for i in 0..n {
            let shift = if little_endian { i } else { n - 1 - i };
            self.buf.put_u8((value >> (shift * 8)) as u8);
        }
    }

    /// Appends a 20-bit value as three bytes, top nibble zeroed.
    pub fn push_int20(&mut self, value: u32) {
        self.buf.put_slice(&[
            ((value >> 16) & 0x0f) as u8,
            (value >> 8) as u8,
            value as u8,
        ]);
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    pub fn push_string(&mut self, s: &str) {
        self.buf.put_slice(s.as_bytes());
    }

    /// Writes a tiered length prefix for `len` bytes of content.
    pub fn write_byte_length(&mut self, len: u64) -> Result<(), ProtocolError> {
        if len >= BINARY_32_LIMIT {
            return Err(ProtocolError::LengthOverflow { len });
        }

        if len >= BINARY_20_LIMIT {
            self.push_byte(BINARY_32);
            self.push_int(len, 4, false);
        } else if len >= 256 {
            self.push_byte(BINARY_20);
            self.push_int20(len as u32);
        } else {
            self.push_byte(BINARY_8);
            self.push_byte(len as u8);
        }
        Ok(())
    }

    pub fn write_string_raw(&mut self, s: &str) -> Result<(), ProtocolError> {
        self.write_byte_length(s.len() as u64)?;
        self.push_string(s);
        Ok(())
    }

    pub fn write_token(&mut self, token: usize) -> Result<(), ProtocolError> {
        if token >= TOKEN_LIMIT {
            return Err(ProtocolError::InvalidToken(token));
        }
        self.push_byte(token as u8);
        Ok(())
    }

    /// Writes `user@server` as a JID pair. An empty user is written as
    /// `LIST_EMPTY`.
    pub fn write_jid(&mut self, user: &str, server: &str) -> Result<(), ProtocolError> {
        self.push_byte(JID_PAIR);
        if user.is_empty() {
            self.write_token(LIST_EMPTY as usize)?;
        } else {
            self.write_string(user, false)?;
        }
        self.write_string(server, false)
    }

    /// Writes a string as a dictionary token, a JID pair, or raw bytes.
    ///
    /// `raw` only disables the direct `s.whatsapp.net` shortcut; dictionary
    /// and JID resolution still apply.
    pub fn write_string(&mut self, s: &str, raw: bool) -> Result<(), ProtocolError> {
        let s = if s == LEGACY_USER_SERVER {
            USER_SERVER
        } else {
            s
        };

        if !raw && s == USER_SERVER {
            if let Some(index) = self.dict.index_of(USER_SERVER) {
                return self.write_token(index);
            }
        }

        match self.dict.resolve(s)? {
            Some(Token::Single(index)) => self.write_token(index as usize),
            Some(Token::Double { page, index }) => {
                self.write_token((DICTIONARY_0 + page) as usize)?;
                self.push_byte(index);
                Ok(())
            }
            None if s.is_empty() => Ok(()),
            None => match s.split_once('@') {
                Some((user, server)) => self.write_jid(user, server),
                None => self.write_string_raw(s),
            },
        }
    }

    pub fn write_list_start(&mut self, count: usize) -> Result<(), ProtocolError> {
        if count == 0 {
            self.push_byte(LIST_EMPTY);
        } else if count < 256 {
            self.push_byte(LIST_8);
            self.push_byte(count as u8);
        } else if count <= MAX_LIST_LEN {
            self.push_byte(LIST_16);
            self.buf.put_u16(count as u16);
        } else {
            return Err(ProtocolError::ListTooLong {
                count,
                max: MAX_LIST_LEN,
            });
        }
        Ok(())
    }

    /// Writes each `key`, value pair from `attrs` in the order of `keys`.
    pub fn write_attributes(
        &mut self,
        attrs: Option<&Attributes>,
        keys: &[&str],
    ) -> Result<(), ProtocolError> {
        let Some(attrs) = attrs else {
            return Ok(());
        };
        for key in keys {
            self.write_string(key, false)?;
            let value = attrs.get(*key).and_then(|v| v.as_deref()).unwrap_or("");
            self.write_string(value, false)?;
        }
        Ok(())
    }

    pub fn write_children(&mut self, children: &Children) -> Result<(), ProtocolError> {
        match children {
            Children::None => Ok(()),
            Children::Text(text) => self.write_string(text, true),
            Children::List(nodes) => {
                let count = match self.null_children {
                    NullChildPolicy::Skip => nodes.iter().flatten().count(),
                    NullChildPolicy::Count => nodes.len(),
                };
                self.write_list_start(count)?;
                for node in nodes.iter().flatten() {
                    self.write_node(node)?;
                }
                Ok(())
            }
            Children::Binary(payload) => {
                let bytes = payload.serialize();
                self.write_byte_length(bytes.len() as u64)?;
                self.push_bytes(&bytes);
                Ok(())
            }
        }
    }

    pub fn write_node(&mut self, node: &Node) -> Result<(), ProtocolError> {
        let keys = node.active_attr_keys();
        let has_children = node.children.is_present();
        let len = 2 * keys.len() + 1 + usize::from(has_children);

        tracing::trace!(
            "Writing node <{}> ({} attrs, children={})",
            node.tag,
            keys.len(),
            has_children
        );

        self.write_list_start(len)?;
        self.write_string(&node.tag, false)?;
        self.write_attributes(node.attrs.as_ref(), &keys)?;
        self.write_children(&node.children)
    }
}
