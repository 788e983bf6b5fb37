//! Token dictionary.
//!
//! Known strings are replaced on the wire by their position in a fixed,
//! ordered table. Positions below [`SINGLE_BYTE_MAX`] fit in one byte; the
//! rest are addressed through one of four double-byte pages.

use crate::error::ProtocolError;
use crate::tags::{DICTIONARY_PAGES, SINGLE_BYTE_MAX};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Built-in token table. The first three slots are reserved and never match.
pub const STANDARD_TOKENS: &[Option<&str>] = &[
    None,
    None,
    None,
    Some("200"),
    Some("400"),
    Some("404"),
    Some("500"),
    Some("501"),
    Some("502"),
    Some("action"),
    Some("add"),
    Some("after"),
    Some("archive"),
    Some("author"),
    Some("available"),
    Some("battery"),
    Some("before"),
    Some("body"),
    Some("broadcast"),
    Some("chat"),
    Some("clear"),
    Some("code"),
    Some("composing"),
    Some("contacts"),
    Some("count"),
    Some("create"),
    Some("debug"),
    Some("delete"),
    Some("demote"),
    Some("duplicate"),
    Some("encoding"),
    Some("error"),
    Some("false"),
    Some("filehash"),
    Some("from"),
    Some("g.us"),
    Some("group"),
    Some("groups_v2"),
    Some("height"),
    Some("id"),
    Some("image"),
    Some("in"),
    Some("index"),
    Some("invis"),
    Some("item"),
    Some("jid"),
    Some("kind"),
    Some("last"),
    Some("leave"),
    Some("live"),
    Some("log"),
    Some("media"),
    Some("message"),
    Some("mimetype"),
    Some("missing"),
    Some("modify"),
    Some("name"),
    Some("notification"),
    Some("notify"),
    Some("out"),
    Some("owner"),
    Some("participant"),
    Some("paused"),
    Some("picture"),
    Some("played"),
    Some("presence"),
    Some("preview"),
    Some("promote"),
    Some("query"),
    Some("raw"),
    Some("read"),
    Some("receipt"),
    Some("received"),
    Some("recipient"),
    Some("recording"),
    Some("relay"),
    Some("remove"),
    Some("response"),
    Some("resume"),
    Some("retry"),
    Some("s.whatsapp.net"),
    Some("seconds"),
    Some("set"),
    Some("size"),
    Some("status"),
    Some("subject"),
    Some("subscribe"),
    Some("t"),
    Some("text"),
    Some("to"),
    Some("true"),
    Some("type"),
    Some("unarchive"),
    Some("unavailable"),
    Some("url"),
    Some("user"),
    Some("value"),
    Some("web"),
    Some("width"),
    Some("mute"),
    Some("read_only"),
    Some("admin"),
    Some("creator"),
    Some("short"),
    Some("update"),
    Some("powersave"),
    Some("checksum"),
    Some("epoch"),
    Some("block"),
    Some("previous"),
    Some("409"),
    Some("replaced"),
    Some("reason"),
    Some("spam"),
    Some("modify_tag"),
    Some("message_info"),
    Some("delivery"),
    Some("emoji"),
    Some("title"),
    Some("description"),
    Some("canonical-url"),
    Some("matched-text"),
    Some("star"),
    Some("unstar"),
    Some("media_key"),
    Some("filename"),
    Some("identity"),
    Some("unread"),
    Some("page"),
    Some("page_count"),
    Some("search"),
    Some("media_message"),
    Some("security"),
    Some("call_log"),
    Some("profile"),
    Some("ciphertext"),
    Some("invite"),
    Some("gif"),
    Some("vcard"),
    Some("frequent"),
    Some("privacy"),
    Some("blacklist"),
    Some("whitelist"),
    Some("verify"),
    Some("location"),
    Some("document"),
    Some("elapsed"),
    Some("revoke_invite"),
    Some("expiration"),
    Some("unsubscribe"),
    Some("disable"),
    Some("vname"),
    Some("old_jid"),
    Some("new_jid"),
    Some("announcement"),
    Some("locked"),
    Some("prop"),
    Some("label"),
    Some("color"),
    Some("call"),
    Some("offer"),
    Some("call-id"),
    Some("quick_reply"),
    Some("sticker"),
    Some("pay_t"),
    Some("accept"),
    Some("reject"),
    Some("sticker_pack"),
    Some("invalid"),
    Some("canceled"),
    Some("missed"),
    Some("connected"),
    Some("result"),
    Some("audio"),
    Some("video"),
    Some("recent"),
];

/// Server part of user JIDs. Also the target of the `c.us` alias.
pub const USER_SERVER: &str = "s.whatsapp.net";

/// Legacy server alias rewritten to [`USER_SERVER`] before lookup.
pub const LEGACY_USER_SERVER: &str = "c.us";

static STANDARD: OnceLock<TokenDictionary> = OnceLock::new();

/// How a dictionary string is written on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// One token byte.
    Single(u8),
    /// A page marker offset followed by the position inside that page.
    Double { page: u8, index: u8 },
}

/// An ordered, read-only table of known strings with a reverse index.
#[derive(Debug, Clone)]
pub struct TokenDictionary {
    tokens: Vec<Option<String>>,
    index: HashMap<String, usize>,
    single_byte_max: usize,
}

impl TokenDictionary {
    /// Builds a dictionary from an ordered token list.
    ///
    /// Empty slots keep their position but never match. When a string
    /// appears twice, its first position wins.
    pub fn new<I, S>(tokens: I, single_byte_max: usize) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let tokens: Vec<Option<String>> = tokens.into_iter().map(|t| t.map(Into::into)).collect();
        let mut index = HashMap::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            if let Some(token) = token {
                index.entry(token.clone()).or_insert(i);
            }
        }
        Self {
            tokens,
            index,
            single_byte_max,
        }
    }

    /// Returns the process-wide built-in dictionary.
    pub fn standard() -> &'static TokenDictionary {
        STANDARD.get_or_init(|| TokenDictionary::new(STANDARD_TOKENS.iter().copied(), SINGLE_BYTE_MAX))
    }

    /// Returns the position of `token`, if it is known.
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// Returns the string at `index`, if the slot is populated.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).and_then(|t| t.as_deref())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn single_byte_max(&self) -> usize {
        self.single_byte_max
    }

    /// Iterates over populated slots as `(index, token)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.tokens
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_deref().map(|t| (i, t)))
    }

    /// Resolves `token` to its wire form.
    ///
    /// Returns `Ok(None)` for strings outside the dictionary.
    pub fn resolve(&self, token: &str) -> Result<Option<Token>, ProtocolError> {
        let Some(index) = self.index_of(token) else {
            return Ok(None);
        };

        if index < self.single_byte_max {
            let byte =
                u8::try_from(index).map_err(|_| ProtocolError::InvalidToken(index))?;
            return Ok(Some(Token::Single(byte)));
        }

        let overflow = index - self.single_byte_max;
        let page = overflow >> 8;
        if page >= DICTIONARY_PAGES {
            return Err(ProtocolError::DictionaryPageOutOfRange {
                token: token.to_string(),
                index,
            });
        }

        Ok(Some(Token::Double {
            page: page as u8,
            index: (overflow % 256) as u8,
        }))
    }
}
