use crate::{
    rstd::{string::String, vec::Vec},
    transactions::tx_type::TxType,
};
use primitive_types::U256;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Error returned by [`crate::cursor::Cursor`] when an operation exceeds the buffer bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum CursorError {
    #[cfg_attr(
        feature = "std",
        error("buffer overrun: cannot write {requested} bytes at position {position}, capacity is {capacity}")
    )]
    Overrun { position: usize, requested: usize, capacity: usize },
    #[cfg_attr(
        feature = "std",
        error("buffer underrun: cannot read {requested} bytes at position {position}, length is {length}")
    )]
    Underrun { position: usize, requested: usize, length: usize },
}

/// The encoding form rejected by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonCanonical {
    /// A single byte below `0x80` wrapped in a one byte string prefix.
    SingleByteWithPrefix,
    /// A long form prefix used for a payload of 55 bytes or less.
    ShortFormAvailable,
    /// The length of a long form prefix starts with a zero byte.
    LeadingZeroLength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum RlpError {
    #[cfg_attr(feature = "std", error("{0}"))]
    Cursor(#[cfg_attr(feature = "std", source)] CursorError),
    #[cfg_attr(feature = "std", error("non-canonical rlp at byte {position}: {reason:?}"))]
    NonCanonical { position: usize, reason: NonCanonical },
    #[cfg_attr(
        feature = "std",
        error("rlp list at byte {position} declares {expected} payload bytes, but its items span {actual}")
    )]
    ListLengthMismatch { position: usize, expected: usize, actual: usize },
    #[cfg_attr(feature = "std", error("{remaining} trailing bytes after rlp item ending at byte {position}"))]
    TrailingBytes { position: usize, remaining: usize },
    #[cfg_attr(
        feature = "std",
        error("rlp length at byte {position} uses {len_of_len} bytes, at most 4 are supported")
    )]
    UnsupportedLength { position: usize, len_of_len: usize },
    #[cfg_attr(feature = "std", error("rlp payload of {0} bytes is too large to encode"))]
    PayloadTooLarge(usize),
    #[cfg_attr(feature = "std", error("rlp nesting at byte {position} exceeds the recursion limit"))]
    RecursionLimit { position: usize },
}

impl From<CursorError> for RlpError {
    fn from(error: CursorError) -> Self {
        Self::Cursor(error)
    }
}

/// Reason a single decoded field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum FieldError {
    #[cfg_attr(feature = "std", error("expected a byte-string, found a list"))]
    ExpectedBytes,
    #[cfg_attr(feature = "std", error("expected a list, found a byte-string"))]
    ExpectedList,
    #[cfg_attr(feature = "std", error("integer has leading zero bytes"))]
    LeadingZero,
    #[cfg_attr(feature = "std", error("integer exceeds {max_bytes} bytes"))]
    Overflow { max_bytes: usize },
    #[cfg_attr(feature = "std", error("expected {expected} bytes, found {actual}"))]
    InvalidLength { expected: usize, actual: usize },
    #[cfg_attr(feature = "std", error("boolean must be empty or 0x01"))]
    InvalidBool,
    #[cfg_attr(feature = "std", error("y parity must be 0 or 1"))]
    InvalidYParity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum Error {
    #[cfg_attr(feature = "std", error("{0}"))]
    Rlp(#[cfg_attr(feature = "std", source)] RlpError),
    #[cfg_attr(feature = "std", error("invalid {tx_type} transaction, offending fields: {fields:?}"))]
    InvalidTransactionType { tx_type: TxType, fields: Vec<&'static str> },
    #[cfg_attr(
        feature = "std",
        error("invalid serialized {tx_type} transaction, missing attributes: {missing:?}, extra items: {extra}")
    )]
    InvalidSerializedTransaction { tx_type: TxType, missing: Vec<&'static str>, extra: usize },
    #[cfg_attr(feature = "std", error("serialized {0} transaction payload is not an rlp list"))]
    ExpectedList(TxType),
    #[cfg_attr(feature = "std", error("unsupported transaction type 0x{0:02x}"))]
    UnsupportedTransactionType(u8),
    #[cfg_attr(feature = "std", error("{0} transactions are not enabled for this network"))]
    TransactionTypeNotEnabled(TxType),
    #[cfg_attr(feature = "std", error("invalid field `{field}`: {reason}"))]
    InvalidField { field: &'static str, reason: FieldError },
    #[cfg_attr(feature = "std", error("invalid legacy signature v: {0}"))]
    InvalidLegacyV(u64),
    #[cfg_attr(feature = "std", error("invalid chain id: {0}"))]
    InvalidChainId(u64),
    #[cfg_attr(feature = "std", error("chain id mismatch, expected {expected} got {actual}"))]
    ChainIdMismatch { expected: u64, actual: u64 },
    #[cfg_attr(
        feature = "std",
        error("max priority fee per gas ({max_priority_fee_per_gas}) cannot be higher than max fee per gas ({max_fee_per_gas})")
    )]
    TipAboveFeeCap { max_priority_fee_per_gas: U256, max_fee_per_gas: U256 },
    #[cfg_attr(feature = "std", error("blob transaction must reference at least one blob"))]
    EmptyBlobHashes,
    #[cfg_attr(feature = "std", error("blob versioned hash {index} has unsupported version 0x{version:02x}"))]
    InvalidBlobHashVersion { index: usize, version: u8 },
    #[cfg_attr(
        feature = "std",
        error("blob sidecars mismatch: {blobs} blobs, {commitments} commitments, {proofs} proofs")
    )]
    InvalidSidecars { blobs: usize, commitments: usize, proofs: usize },
    #[cfg_attr(feature = "std", error("authorization {0} is not signed"))]
    UnsignedAuthorization(usize),
    #[cfg_attr(feature = "std", error("unknown network: {0}"))]
    UnknownNetwork(String),
}

impl From<RlpError> for Error {
    fn from(error: RlpError) -> Self {
        Self::Rlp(error)
    }
}

impl From<CursorError> for Error {
    fn from(error: CursorError) -> Self {
        Self::Rlp(RlpError::Cursor(error))
    }
}

impl Error {
    pub(crate) const fn invalid_field(field: &'static str, reason: FieldError) -> Self {
        Self::InvalidField { field, reason }
    }
}
