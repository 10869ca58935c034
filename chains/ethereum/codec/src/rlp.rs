//! Canonical [RLP] (Recursive Length Prefix) encoding.
//!
//! [RLP]: https://ethereum.org/en/developers/docs/data-structures-and-encoding/rlp/
mod decoder;
mod encoder;

pub use decoder::{decode, decode_list};
pub use encoder::{encode, encode_to};

use crate::{bytes::Bytes, rstd::vec::Vec};

const LOG_TARGET: &str = "rlp";

/// Strings and lists with payload up to this length use the single byte prefix.
pub(crate) const SHORT_PAYLOAD_MAX: usize = 55;
pub(crate) const STRING_OFFSET: u8 = 0x80;
pub(crate) const LONG_STRING_OFFSET: u8 = 0xb7;
pub(crate) const LIST_OFFSET: u8 = 0xc0;
pub(crate) const LONG_LIST_OFFSET: u8 = 0xf7;

/// A byte-string or a list of values, the only structure RLP knows about.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum RlpValue {
    Bytes(Bytes),
    List(Vec<RlpValue>),
}

impl Default for RlpValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl RlpValue {
    /// The empty byte-string, encodes zero and absent fields.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Bytes(Bytes::new())
    }

    #[must_use]
    pub const fn empty_list() -> Self {
        Self::List(Vec::new())
    }

    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    #[must_use]
    pub const fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::List(_) => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::Bytes(_) => None,
            Self::List(items) => Some(items.as_slice()),
        }
    }

    /// Number of bytes of the payload, excluding the prefix.
    #[must_use]
    pub fn payload_len(&self) -> usize {
        match self {
            Self::Bytes(bytes) if is_single_byte(bytes) => 1,
            Self::Bytes(bytes) => bytes.len(),
            Self::List(items) => items.iter().map(Self::encoded_len).sum(),
        }
    }

    /// Exact number of bytes [`encode`] writes for this value.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        let payload_len = self.payload_len();
        match self {
            Self::Bytes(bytes) if is_single_byte(bytes) => 1,
            _ => header_len(payload_len) + payload_len,
        }
    }
}

impl From<Bytes> for RlpValue {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<u8>> for RlpValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes.into())
    }
}

impl From<&[u8]> for RlpValue {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(Bytes::copy_from_slice(bytes))
    }
}

impl From<Vec<Self>> for RlpValue {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

/// A single byte below `0x80` is its own encoding.
pub(crate) fn is_single_byte(bytes: &[u8]) -> bool {
    matches!(bytes, [byte] if *byte < STRING_OFFSET)
}

/// Minimal number of bytes needed to represent `len` in big-endian.
pub(crate) const fn length_of_length(len: usize) -> usize {
    (usize::BITS - len.leading_zeros()).div_ceil(8) as usize
}

/// Size of the prefix for a payload of `payload_len` bytes.
pub(crate) const fn header_len(payload_len: usize) -> usize {
    if payload_len <= SHORT_PAYLOAD_MAX {
        1
    } else {
        1 + length_of_length(payload_len)
    }
}
