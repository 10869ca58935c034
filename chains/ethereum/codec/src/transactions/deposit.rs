use super::{access_list::AccessList, signature::Signature, tx_type::TxType, GasPrice, TransactionT};
use crate::{
    bytes::Bytes,
    error::Error,
    eth_hash::{Address, H256},
    rlp::RlpValue,
    rlp_utils::{FieldDecoder, RlpDecodableTransaction, RlpEncodableTransaction, RlpListBuilder},
    rstd::vec::Vec,
};
use primitive_types::U256;

#[cfg(feature = "serde")]
use crate::serde_utils::uint_to_hex;

/// OP-stack deposit transaction, type 0x7e. Deposits are derived from L1 events by the rollup
/// node and are never signed, `from` is authenticated by the L1 bridge instead.
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
pub struct DepositTransaction {
    /// Uniquely identifies the origin of the deposit.
    pub source_hash: H256,

    pub from: Address,

    /// Recipient address (None for contract creation)
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub to: Option<Address>,

    /// ETH minted on L2.
    pub mint: U256,

    pub value: U256,

    #[cfg_attr(feature = "serde", serde(rename = "gas", with = "uint_to_hex"))]
    pub gas_limit: u64,

    /// System transactions are exempt from the L2 gas limit.
    pub is_system_tx: bool,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Bytes::is_empty"))]
    pub data: Bytes,
}

impl RlpEncodableTransaction for DepositTransaction {
    const TX_TYPE: TxType = TxType::Deposit;

    fn rlp_items(&self, signature: Option<&Signature>) -> Result<Vec<RlpValue>, Error> {
        if signature.is_some() {
            return Err(Error::InvalidTransactionType {
                tx_type: TxType::Deposit,
                fields: Vec::from(["signature"]),
            });
        }
        let mut builder = RlpListBuilder::with_capacity(8);
        builder
            .append(&self.source_hash)
            .append(&self.from)
            .append(&self.to)
            .append(&self.mint)
            .append(&self.value)
            .append(&self.gas_limit)
            .append(&self.is_system_tx)
            .append(&self.data);
        Ok(builder.finish())
    }
}

impl RlpDecodableTransaction for DepositTransaction {
    fn rlp_decode(payload: &RlpValue) -> Result<(Self, Option<Signature>), Error> {
        let (fields, _) = FieldDecoder::new(TxType::Deposit, payload)?;
        let tx = Self {
            source_hash: fields.decode(0)?,
            from: fields.decode(1)?,
            to: fields.decode(2)?,
            mint: fields.decode(3)?,
            value: fields.decode(4)?,
            gas_limit: fields.decode(5)?,
            is_system_tx: fields.decode(6)?,
            data: fields.decode(7)?,
        };
        Ok((tx, None))
    }
}

impl TransactionT for DepositTransaction {
    fn encode(&self, signature: Option<&Signature>) -> Result<Bytes, Error> {
        self.rlp_encode(signature)
    }

    fn tx_type(&self) -> TxType {
        TxType::Deposit
    }

    fn chain_id(&self) -> Option<u64> {
        None
    }

    fn nonce(&self) -> u64 {
        0
    }

    fn gas_price(&self) -> GasPrice {
        GasPrice::default()
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
        None
    }
}
