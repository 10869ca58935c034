#![cfg_attr(not(feature = "std"), no_std)]

mod bytes;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod cursor;
pub mod error;
mod eth_hash;
pub mod rlp;
pub mod rlp_utils;
#[cfg(feature = "serde")]
pub mod serde_utils;
pub mod transactions;

pub use crate::bytes::Bytes;
pub use codec::TransactionCodec;
pub use config::CodecConfig;
pub use cursor::Cursor;
pub use error::{CursorError, Error, FieldError, NonCanonical, Result, RlpError};
pub use eth_hash::{Address, TxHash, H160, H256};
pub use primitive_types::U256;
pub use crate::rlp::RlpValue;
#[cfg(feature = "with-crypto")]
pub use transactions::signed_transaction::SignedTransaction;
pub use transactions::{
    access_list::{AccessList, AccessListItem},
    authorization::{Authorization, AuthorizationList},
    blob::{BlobSidecar, BlobSidecars},
    cip42::Cip42Transaction,
    cip64::Cip64Transaction,
    deposit::DepositTransaction,
    eip1559::Eip1559Transaction,
    eip2930::Eip2930Transaction,
    eip4844::Eip4844Transaction,
    eip712::{Eip712Meta, Eip712Transaction, PaymasterParams},
    eip7702::Eip7702Transaction,
    legacy::LegacyTransaction,
    request::{ChainExtension, TransactionRequest},
    signature::{RecoveryId, Signature},
    tx_type::{TxType, TypeRegistry},
    typed_transaction::TypedTransaction,
    GasPrice, TransactionT,
};

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
pub(crate) mod rstd {
    #[cfg(feature = "serde")]
    pub use std::result;

    pub use std::{borrow, fmt, string, vec};
}

#[cfg(not(feature = "std"))]
pub(crate) mod rstd {
    #[cfg(feature = "serde")]
    pub use core::result;

    pub use alloc::{borrow, string, vec};
    pub use core::fmt;
}

/// Re-exports for downstream crates to not require any additional
/// dependencies to be explicitly added on the client side.
pub mod ext {
    pub use bytes;
    pub use const_hex;
    #[cfg(feature = "with-codec")]
    pub use parity_scale_codec;
    pub use primitive_types;
    #[cfg(feature = "with-codec")]
    pub use scale_info;
    #[cfg(feature = "serde")]
    pub use serde;
    #[cfg(feature = "with-crypto")]
    pub use sha3;
}

/// Serializes a transaction request, inferring its type when none is given.
///
/// Every transaction type is enabled and no chain id is enforced, use
/// [`TransactionCodec`] to restrict the codec to a single network.
///
/// # Errors
/// Returns `Err` if the request doesn't match its (explicit or inferred) type, or fails
/// validation.
pub fn serialize_transaction(
    request: &TransactionRequest,
    signature: Option<&Signature>,
) -> Result<Bytes> {
    TransactionCodec::default().serialize(request, signature)
}

/// Parses a serialized transaction envelope.
///
/// # Errors
/// Returns `Err` if the bytes are not a canonical encoding of a supported transaction type.
pub fn parse_transaction(raw: &[u8]) -> Result<(TypedTransaction, Option<Signature>)> {
    TransactionCodec::default().parse(raw)
}
