use super::{
    access_list::AccessList, check_chain_id, check_fee_cap, signature::Signature, tx_type::TxType,
    GasPrice, TransactionT,
};
use crate::{
    bytes::Bytes,
    error::{Error, FieldError},
    eth_hash::Address,
    rlp::RlpValue,
    rlp_utils::{
        Decodable, Encodable, FieldDecoder, RlpDecodableTransaction, RlpEncodableTransaction,
        RlpListBuilder,
    },
    rstd::vec::Vec,
};
use primitive_types::U256;

#[cfg(feature = "serde")]
use crate::serde_utils::uint_to_hex;

/// Sponsors the fees of a zkSync transaction.
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
pub struct PaymasterParams {
    pub paymaster: Address,
    pub paymaster_input: Bytes,
}

impl Encodable for PaymasterParams {
    fn rlp_value(&self) -> RlpValue {
        RlpValue::List(Vec::from([self.paymaster.rlp_value(), self.paymaster_input.rlp_value()]))
    }
}

impl Decodable for PaymasterParams {
    fn rlp_decode(value: &RlpValue) -> Result<Self, FieldError> {
        let items = value.as_list().ok_or(FieldError::ExpectedList)?;
        let [paymaster, paymaster_input] = items else {
            return Err(FieldError::InvalidLength { expected: 2, actual: items.len() });
        };
        Ok(Self {
            paymaster: Address::rlp_decode(paymaster)?,
            paymaster_input: Bytes::rlp_decode(paymaster_input)?,
        })
    }
}

/// zkSync specific fields of an EIP-712 transaction.
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
pub struct Eip712Meta {
    /// Account initiating the transaction, zkSync accounts may be contracts.
    pub from: Address,

    /// Maximum gas the sender pays per byte of pubdata.
    pub gas_per_pubdata: U256,

    /// Bytecodes of the contracts deployed by the transaction.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub factory_deps: Vec<Bytes>,

    /// Signature checked by the account abstraction of `from`.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Bytes::is_empty"))]
    pub custom_signature: Bytes,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub paymaster_params: Option<PaymasterParams>,
}

/// zkSync transaction with type 0x71.
///
/// zkSync accounts sign the EIP-712 typed data of the transaction, which this codec doesn't
/// compute: [`TransactionT::sighash`] hashes the serialized form and is not the digest a zkSync
/// account signs. The signature positions carry `[chainId, "", ""]` until a signature is given.
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
pub struct Eip712Transaction {
    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub nonce: u64,

    pub max_priority_fee_per_gas: U256,

    pub max_fee_per_gas: U256,

    #[cfg_attr(feature = "serde", serde(rename = "gas", with = "uint_to_hex"))]
    pub gas_limit: u64,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub to: Option<Address>,

    pub value: U256,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Bytes::is_empty"))]
    pub data: Bytes,

    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub chain_id: u64,

    #[cfg_attr(feature = "serde", serde(flatten))]
    pub meta: Eip712Meta,
}

fn paymaster_rlp_value(params: Option<&PaymasterParams>) -> RlpValue {
    params.map_or_else(RlpValue::empty_list, Encodable::rlp_value)
}

impl RlpEncodableTransaction for Eip712Transaction {
    const TX_TYPE: TxType = TxType::Eip712;

    fn validate(&self) -> Result<(), Error> {
        check_chain_id(self.chain_id)?;
        check_fee_cap(self.max_priority_fee_per_gas, self.max_fee_per_gas)
    }

    fn rlp_items(&self, signature: Option<&Signature>) -> Result<Vec<RlpValue>, Error> {
        let mut builder = RlpListBuilder::with_capacity(16);
        builder
            .append(&self.nonce)
            .append(&self.max_priority_fee_per_gas)
            .append(&self.max_fee_per_gas)
            .append(&self.gas_limit)
            .append(&self.to)
            .append(&self.value)
            .append(&self.data);
        match signature {
            Some(signature) => builder.append_y_parity_signature(signature),
            None => builder.append(&self.chain_id).append_empty().append_empty(),
        };
        builder
            .append(&self.chain_id)
            .append(&self.meta.from)
            .append(&self.meta.gas_per_pubdata)
            .append(&self.meta.factory_deps)
            .append(&self.meta.custom_signature)
            .append_raw(paymaster_rlp_value(self.meta.paymaster_params.as_ref()));
        Ok(builder.finish())
    }
}

impl RlpDecodableTransaction for Eip712Transaction {
    fn rlp_decode(payload: &RlpValue) -> Result<(Self, Option<Signature>), Error> {
        let (fields, _) = FieldDecoder::new(TxType::Eip712, payload)?;
        let paymaster_params = match fields.value(15)? {
            RlpValue::List(items) if items.is_empty() => None,
            value => Some(
                PaymasterParams::rlp_decode(value)
                    .map_err(|reason| Error::invalid_field("paymasterParams", reason))?,
            ),
        };
        let tx = Self {
            nonce: fields.decode(0)?,
            max_priority_fee_per_gas: fields.decode(1)?,
            max_fee_per_gas: fields.decode(2)?,
            gas_limit: fields.decode(3)?,
            to: fields.decode(4)?,
            value: fields.decode(5)?,
            data: fields.decode(6)?,
            chain_id: fields.decode(10)?,
            meta: Eip712Meta {
                from: fields.decode(11)?,
                gas_per_pubdata: fields.decode(12)?,
                factory_deps: fields.decode(13)?,
                custom_signature: fields.decode(14)?,
                paymaster_params,
            },
        };

        // Unsigned form repeats the chain id in place of `v`
        if fields.is_empty_at(8) && fields.is_empty_at(9) {
            let chain_id = fields.decode::<u64>(7)?;
            if chain_id != tx.chain_id {
                return Err(Error::ChainIdMismatch { expected: tx.chain_id, actual: chain_id });
            }
            return Ok((tx, None));
        }
        let signature = fields.y_parity_signature(7)?;
        Ok((tx, Some(signature)))
    }
}

impl TransactionT for Eip712Transaction {
    fn encode(&self, signature: Option<&Signature>) -> Result<Bytes, Error> {
        self.rlp_encode(signature)
    }

    fn tx_type(&self) -> TxType {
        TxType::Eip712
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
        None
    }
}
