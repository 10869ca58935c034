use super::{
    access_list::AccessList, authorization::AuthorizationList, check_chain_id, check_fee_cap,
    signature::Signature, tx_type::TxType, GasPrice, TransactionT,
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

/// Transactions with type 0x4 are set code transactions introduced in EIP-7702, each signed
/// authorization delegates the code of its signer to a contract.
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
pub struct Eip7702Transaction {
    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub chain_id: u64,

    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub nonce: u64,

    pub max_priority_fee_per_gas: U256,

    pub max_fee_per_gas: U256,

    #[cfg_attr(feature = "serde", serde(rename = "gas", with = "uint_to_hex"))]
    pub gas_limit: u64,

    /// Set code transactions can't create contracts.
    pub to: Address,

    pub value: U256,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Bytes::is_empty"))]
    pub data: Bytes,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "AccessList::is_empty"))]
    pub access_list: AccessList,

    pub authorization_list: AuthorizationList,
}

impl RlpEncodableTransaction for Eip7702Transaction {
    const TX_TYPE: TxType = TxType::Eip7702;

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
            .append_raw(self.authorization_list.try_rlp_value()?);
        if let Some(signature) = signature {
            builder.append_y_parity_signature(signature);
        }
        Ok(builder.finish())
    }
}

impl RlpDecodableTransaction for Eip7702Transaction {
    fn rlp_decode(payload: &RlpValue) -> Result<(Self, Option<Signature>), Error> {
        let (fields, signed) = FieldDecoder::new(TxType::Eip7702, payload)?;
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
            authorization_list: fields.decode(9)?,
        };
        let signature = if signed { Some(fields.y_parity_signature(10)?) } else { None };
        Ok((tx, signature))
    }
}

impl TransactionT for Eip7702Transaction {
    fn encode(&self, signature: Option<&Signature>) -> Result<Bytes, Error> {
        self.rlp_encode(signature)
    }

    fn tx_type(&self) -> TxType {
        TxType::Eip7702
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
        Some(self.to)
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

#[cfg(test)]
pub(crate) mod tests {
    use super::Eip7702Transaction;
    use crate::{
        bytes::Bytes,
        error::Error,
        eth_hash::Address,
        rlp,
        rlp_utils::{RlpDecodableTransaction, RlpEncodableTransaction},
        transactions::{
            authorization::{Authorization, AuthorizationList},
            signature::{RecoveryId, Signature},
        },
    };
    use hex_literal::hex;

    static RLP_EIP7702_UNSIGNED: &[u8] = &hex!("04f8e3018203118080809470997970c51812dc3a010c7d01b50e0d17dc79c8880de0b6b3a764000080c0f8baf85c0194fba3912ca04dd458c843e2ee08967fc04f3579c28201a480a060fdd29ff912ce880cd3edaf9f932dc61d3dae823ea77e0323f94adb9f6a72fea060fdd29ff912ce880cd3edaf9f932dc61d3dae823ea77e0323f94adb9f6a72fef85a0a9400000000000000000000000000000000000000004501a060fdd29ff912ce880cd3edaf9f932dc61d3dae823ea77e0323f94adb9f6a72fea060fdd29ff912ce880cd3edaf9f932dc61d3dae823ea77e0323f94adb9f6a72fe");
    static RLP_EIP7702_SIGNED: &[u8] = &hex!("04f90126018203118080809470997970c51812dc3a010c7d01b50e0d17dc79c8880de0b6b3a764000080c0f8baf85c0194fba3912ca04dd458c843e2ee08967fc04f3579c28201a480a060fdd29ff912ce880cd3edaf9f932dc61d3dae823ea77e0323f94adb9f6a72fea060fdd29ff912ce880cd3edaf9f932dc61d3dae823ea77e0323f94adb9f6a72fef85a0a9400000000000000000000000000000000000000004501a060fdd29ff912ce880cd3edaf9f932dc61d3dae823ea77e0323f94adb9f6a72fea060fdd29ff912ce880cd3edaf9f932dc61d3dae823ea77e0323f94adb9f6a72fe01a060fdd29ff912ce880cd3edaf9f932dc61d3dae823ea77e0323f94adb9f6a72fea060fdd29ff912ce880cd3edaf9f932dc61d3dae823ea77e0323f94adb9f6a72fe");

    fn signature(y_parity: u64) -> Signature {
        let rs = hex!("60fdd29ff912ce880cd3edaf9f932dc61d3dae823ea77e0323f94adb9f6a72fe");
        Signature { v: RecoveryId::new(y_parity), r: rs.into(), s: rs.into() }
    }

    pub fn build_eip7702() -> Eip7702Transaction {
        Eip7702Transaction {
            chain_id: 1,
            nonce: 785,
            to: hex!("70997970c51812dc3a010c7d01b50e0d17dc79c8").into(),
            value: 1_000_000_000_000_000_000u128.into(),
            authorization_list: AuthorizationList(vec![
                Authorization {
                    chain_id: 1,
                    address: hex!("fba3912ca04dd458c843e2ee08967fc04f3579c2").into(),
                    nonce: 420,
                    signature: Some(signature(0)),
                },
                Authorization {
                    chain_id: 10,
                    address: Address::zero(),
                    nonce: 69,
                    signature: Some(signature(1)),
                },
            ]),
            ..Default::default()
        }
    }

    fn decode(raw: &[u8]) -> Result<(Eip7702Transaction, Option<Signature>), Error> {
        assert_eq!(raw[0], 0x04);
        Eip7702Transaction::rlp_decode(&rlp::decode(&raw[1..])?)
    }

    #[test]
    fn rlp_codec_works() {
        let tx = build_eip7702();
        assert_eq!(tx.rlp_unsigned().unwrap(), Bytes::from_static(RLP_EIP7702_UNSIGNED));
        assert_eq!(tx.rlp_signed(&signature(1)).unwrap(), Bytes::from_static(RLP_EIP7702_SIGNED));
        assert_eq!(decode(RLP_EIP7702_UNSIGNED).unwrap(), (tx.clone(), None));
        assert_eq!(decode(RLP_EIP7702_SIGNED).unwrap(), (tx, Some(signature(1))));
    }

    #[test]
    fn unsigned_authorization_is_rejected() {
        let mut tx = build_eip7702();
        tx.authorization_list.0[1].signature = None;
        assert_eq!(tx.rlp_unsigned(), Err(Error::UnsignedAuthorization(1)));
    }
}
