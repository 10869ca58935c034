pub mod access_list;
pub mod authorization;
pub mod blob;
pub mod cip42;
pub mod cip64;
pub mod deposit;
pub mod eip1559;
pub mod eip2930;
pub mod eip4844;
pub mod eip712;
pub mod eip7702;
pub mod legacy;
pub mod request;
pub mod signature;
#[cfg(feature = "with-crypto")]
pub mod signed_transaction;
pub mod tx_type;
pub mod typed_transaction;

use crate::{
    bytes::Bytes,
    crypto::Hasher,
    error::Error,
    eth_hash::{Address, H256},
};
pub use access_list::AccessList;
use primitive_types::U256;
pub use signature::Signature;
pub use tx_type::TxType;
pub use typed_transaction::TypedTransaction;

#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "with-codec",
    derive(parity_scale_codec::Encode, parity_scale_codec::Decode, scale_info::TypeInfo)
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum GasPrice {
    Legacy(U256),
    Eip1559 { max_priority_fee_per_gas: U256, max_fee_per_gas: U256 },
}

impl Default for GasPrice {
    fn default() -> Self {
        Self::Legacy(U256::zero())
    }
}

pub trait TransactionT {
    /// Encode the transaction, with the signature if provided.
    ///
    /// # Errors
    /// Returns `Err` if the transaction fails validation or can't carry the signature.
    fn encode(&self, signature: Option<&Signature>) -> Result<Bytes, Error>;

    /// The hash of the transaction without signature
    ///
    /// # Errors
    /// Same as [`TransactionT::encode`].
    fn sighash<H: Hasher>(&self) -> Result<H256, Error> {
        self.encode(None).map(H::keccak256)
    }

    /// Compute the tx-hash using the provided signature
    ///
    /// # Errors
    /// Same as [`TransactionT::encode`].
    fn compute_tx_hash<H: Hasher>(&self, signature: &Signature) -> Result<H256, Error> {
        self.encode(Some(signature)).map(H::keccak256)
    }

    fn tx_type(&self) -> TxType;

    // chain id, is only None for Legacy and Deposit Transactions
    fn chain_id(&self) -> Option<u64>;
    fn nonce(&self) -> u64;
    fn gas_price(&self) -> GasPrice;
    fn gas_limit(&self) -> u64;
    fn to(&self) -> Option<Address>;
    fn value(&self) -> U256;
    fn data(&self) -> &[u8];

    /// EIP-2930 access list
    fn access_list(&self) -> Option<&AccessList>;

    /// EIP-2718 transaction type
    fn transaction_type(&self) -> Option<u8> {
        self.tx_type().discriminator()
    }
}

/// Typed transactions must be bound to a chain.
pub(crate) const fn check_chain_id(chain_id: u64) -> Result<(), Error> {
    if chain_id == 0 {
        return Err(Error::InvalidChainId(chain_id));
    }
    Ok(())
}

pub(crate) fn check_fee_cap(
    max_priority_fee_per_gas: U256,
    max_fee_per_gas: U256,
) -> Result<(), Error> {
    if max_priority_fee_per_gas > max_fee_per_gas {
        return Err(Error::TipAboveFeeCap { max_priority_fee_per_gas, max_fee_per_gas });
    }
    Ok(())
}
