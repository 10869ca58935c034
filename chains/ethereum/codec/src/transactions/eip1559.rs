use super::{
    access_list::AccessList, check_chain_id, check_fee_cap, signature::Signature, tx_type::TxType,
    GasPrice, TransactionT,
};
use crate::{
    bytes::Bytes,
    error::Error,
    eth_hash::Address,
    rlp::RlpValue,
    rlp_utils::{FieldDecoder, RlpDecodableTransaction, RlpEncodableTransaction, RlpListBuilder},
    rstd::vec::Vec,
};
use primitive_types::U256;

#[cfg(feature = "serde")]
use crate::serde_utils::uint_to_hex;

/// Transactions with type 0x2 are transactions introduced in EIP-1559, included in Ethereum's
/// London fork. EIP-1559 transactions don’t specify gasPrice, and instead use an in-protocol,
/// dynamically changing base fee per gas, plus a priority fee paid to the block producer.
///
/// The transaction always pays the base fee of the block it’s included in, and a priority fee
/// capped by `max_priority_fee_per_gas`, or by `max_fee_per_gas` minus the base fee when their
/// sum exceeds `max_fee_per_gas`.
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(
    feature = "with-codec",
    derive(parity_scale_codec::Encode, parity_scale_codec::Decode, scale_info::TypeInfo)
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Eip1559Transaction {
    /// The chain ID of the transaction. It is mandatory for EIP-1559 transactions.
    ///
    /// [EIP-155]: https://eips.ethereum.org/EIPS/eip-155
    /// [EIP-2718]: https://eips.ethereum.org/EIPS/eip-2718
    /// [EIP-1559]: https://eips.ethereum.org/EIPS/eip-1559
    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub chain_id: u64,

    /// The nonce of the transaction.
    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub nonce: u64,

    /// Maximum fee per gas paid to the block producer on top of the base fee.
    ///
    /// Incorporated as part of the London upgrade via [EIP-1559].
    /// [EIP-1559]: https://eips.ethereum.org/EIPS/eip-1559
    pub max_priority_fee_per_gas: U256,

    /// Represents the maximum amount that a user is willing to pay for their tx (inclusive of
    /// baseFeePerGas and maxPriorityFeePerGas). The difference between maxFeePerGas and
    /// baseFeePerGas + maxPriorityFeePerGas is “refunded” to the user.
    pub max_fee_per_gas: U256,

    /// Supplied gas
    #[cfg_attr(feature = "serde", serde(rename = "gas", with = "uint_to_hex"))]
    pub gas_limit: u64,

    /// Recipient address (None for contract creation)
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub to: Option<Address>,

    /// Transferred value
    pub value: U256,

    /// The data of the transaction.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Bytes::is_empty"))]
    pub data: Bytes,

    /// Optional access list introduced in EIP-2930.
    /// [EIP-2930]: https://eips.ethereum.org/EIPS/eip-2930
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "AccessList::is_empty"))]
    pub access_list: AccessList,
}

impl RlpEncodableTransaction for Eip1559Transaction {
    const TX_TYPE: TxType = TxType::Eip1559;

    fn validate(&self) -> Result<(), Error> {
        check_chain_id(self.chain_id)?;
        check_fee_cap(self.max_priority_fee_per_gas, self.max_fee_per_gas)
    }

    fn rlp_items(&self, signature: Option<&Signature>) -> Result<Vec<RlpValue>, Error> {
        let mut builder = RlpListBuilder::with_capacity(12);
        builder
            .append(&self.chain_id)
            .append(&self.nonce)
            .append(&self.max_priority_fee_per_gas)
            .append(&self.max_fee_per_gas)
            .append(&self.gas_limit)
            .append(&self.to)
            .append(&self.value)
            .append(&self.data)
            .append(&self.access_list);
        if let Some(signature) = signature {
            builder.append_y_parity_signature(signature);
        }
        Ok(builder.finish())
    }
}

impl RlpDecodableTransaction for Eip1559Transaction {
    fn rlp_decode(payload: &RlpValue) -> Result<(Self, Option<Signature>), Error> {
        let (fields, signed) = FieldDecoder::new(TxType::Eip1559, payload)?;
        let tx = Self {
            chain_id: fields.decode(0)?,
            nonce: fields.decode(1)?,
            max_priority_fee_per_gas: fields.decode(2)?,
            max_fee_per_gas: fields.decode(3)?,
            gas_limit: fields.decode(4)?,
            to: fields.decode(5)?,
            value: fields.decode(6)?,
            data: fields.decode(7)?,
            access_list: fields.decode(8)?,
        };
        let signature = if signed { Some(fields.y_parity_signature(9)?) } else { None };
        Ok((tx, signature))
    }
}

impl TransactionT for Eip1559Transaction {
    fn encode(&self, signature: Option<&Signature>) -> Result<Bytes, Error> {
        self.rlp_encode(signature)
    }

    fn tx_type(&self) -> TxType {
        TxType::Eip1559
    }

    fn chain_id(&self) -> Option<u64> {
        Some(self.chain_id)
    }

    fn nonce(&self) -> u64 {
        self.nonce
    }

    fn gas_price(&self) -> GasPrice {
        GasPrice::Eip1559 {
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            max_fee_per_gas: self.max_fee_per_gas,
        }
    }

    fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    fn to(&self) -> Option<Address> {
        self.to
    }

    fn value(&self) -> U256 {
        self.value
    }

    fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn access_list(&self) -> Option<&AccessList> {
        Some(&self.access_list)
    }
}
