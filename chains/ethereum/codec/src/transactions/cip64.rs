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

/// Celo transactions with type 0x7b, introduced in CIP-64. They extend EIP-1559 transactions with
/// the ERC-20 token used to pay the fees.
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
pub struct Cip64Transaction {
    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub chain_id: u64,

    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub nonce: u64,

    pub max_priority_fee_per_gas: U256,

    pub max_fee_per_gas: U256,

    #[cfg_attr(feature = "serde", serde(rename = "gas", with = "uint_to_hex"))]
    pub gas_limit: u64,

    /// Recipient address (None for contract creation)
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub to: Option<Address>,

    pub value: U256,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Bytes::is_empty"))]
    pub data: Bytes,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "AccessList::is_empty"))]
    pub access_list: AccessList,

    /// Token the fees are paid in.
    pub fee_currency: Address,
}

impl RlpEncodableTransaction for Cip64Transaction {
    const TX_TYPE: TxType = TxType::Cip64;

    fn validate(&self) -> Result<(), Error> {
        check_chain_id(self.chain_id)?;
        check_fee_cap(self.max_priority_fee_per_gas, self.max_fee_per_gas)
    }

    fn rlp_items(&self, signature: Option<&Signature>) -> Result<Vec<RlpValue>, Error> {
        let mut builder = RlpListBuilder::with_capacity(13);
        builder
            .append(&self.chain_id)
            .append(&self.nonce)
            .append(&self.max_priority_fee_per_gas)
            .append(&self.max_fee_per_gas)
            .append(&self.gas_limit)
            .append(&self.to)
            .append(&self.value)
            .append(&self.data)
            .append(&self.access_list)
            .append(&self.fee_currency);
        if let Some(signature) = signature {
            builder.append_y_parity_signature(signature);
        }
        Ok(builder.finish())
    }
}

impl RlpDecodableTransaction for Cip64Transaction {
    fn rlp_decode(payload: &RlpValue) -> Result<(Self, Option<Signature>), Error> {
        let (fields, signed) = FieldDecoder::new(TxType::Cip64, payload)?;
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
            fee_currency: fields.decode(9)?,
        };
        let signature = if signed { Some(fields.y_parity_signature(10)?) } else { None };
        Ok((tx, signature))
    }
}

impl TransactionT for Cip64Transaction {
    fn encode(&self, signature: Option<&Signature>) -> Result<Bytes, Error> {
        self.rlp_encode(signature)
    }

    fn tx_type(&self) -> TxType {
        TxType::Cip64
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
