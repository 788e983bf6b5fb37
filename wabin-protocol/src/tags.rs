//! Framing tag bytes.
//!
//! Layout of an encoded node (every node is a list):
//!
//! ```text
//! +-------------+-----+-----------+-----------+-----+------------+
//! | list header | tag | attr key  | attr val  | ... | children?  |
//! | 1-3 bytes   | str | str       | str       |     | str/list/  |
//! |             |     |           |           |     | binary     |
//! +-------------+-----+-----------+-----------+-----+------------+
//! ```
//!
//! A "str" is either a dictionary token (1 or 2 bytes), a JID pair, or a
//! length-prefixed raw byte string.

pub const LIST_EMPTY: u8 = 0;
pub const STREAM_END: u8 = 2;

/// First of the four double-byte dictionary page markers.
pub const DICTIONARY_0: u8 = 236;
pub const DICTIONARY_1: u8 = 237;
pub const DICTIONARY_2: u8 = 238;
pub const DICTIONARY_3: u8 = 239;

pub const LIST_8: u8 = 248;
pub const LIST_16: u8 = 249;
pub const JID_PAIR: u8 = 250;
pub const HEX_8: u8 = 251;
pub const BINARY_8: u8 = 252;
pub const BINARY_20: u8 = 253;
pub const BINARY_32: u8 = 254;
pub const NIBBLE_8: u8 = 255;

/// Dictionary indices below this value are written as a single token byte.
pub const SINGLE_BYTE_MAX: usize = 256;
pub const PACKED_MAX: u8 = 254;

/// Token indices from here up collide with the tag bytes above.
pub const TOKEN_LIMIT: usize = 245;

/// Number of double-byte dictionary pages.
pub const DICTIONARY_PAGES: usize = 4;

/// Largest count a `LIST_16` header can carry.
pub const MAX_LIST_LEN: usize = u16::MAX as usize;

/// Largest length a `BINARY_20` prefix can carry, plus one.
pub const BINARY_20_LIMIT: u64 = 1 << 20;

/// Length prefixes stop at 32 bits.
pub const BINARY_32_LIMIT: u64 = 1 << 32;
