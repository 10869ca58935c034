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

/// Celo transactions with type 0x7c, introduced in CIP-42 and superseded by CIP-64. Fees are
/// paid in `fee_currency` when set, and a full node may charge a gateway fee on top.
///
/// Either a fee currency or a gateway fee recipient must be set.
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
pub struct Cip42Transaction {
    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub chain_id: u64,

    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub nonce: u64,

    pub max_priority_fee_per_gas: U256,

    pub max_fee_per_gas: U256,

    #[cfg_attr(feature = "serde", serde(rename = "gas", with = "uint_to_hex"))]
    pub gas_limit: u64,

    /// Token the fees are paid in, the native token when `None`.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub fee_currency: Option<Address>,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub gateway_fee_recipient: Option<Address>,

    pub gateway_fee: U256,

    /// Recipient address (None for contract creation)
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub to: Option<Address>,

    pub value: U256,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Bytes::is_empty"))]
    pub data: Bytes,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "AccessList::is_empty"))]
    pub access_list: AccessList,
}

impl Cip42Transaction {
    fn check_gateway(&self) -> Result<(), Error> {
        let fields: &[&'static str] = match (self.gateway_fee_recipient, self.fee_currency) {
            (Some(_), _) if self.gateway_fee.is_zero() => &["gatewayFee"],
            (None, _) if !self.gateway_fee.is_zero() => &["gatewayFeeRecipient"],
            (None, None) => &["feeCurrency", "gatewayFeeRecipient"],
            _ => return Ok(()),
        };
        Err(Error::InvalidTransactionType { tx_type: TxType::Cip42, fields: fields.to_vec() })
    }
}

impl RlpEncodableTransaction for Cip42Transaction {
    const TX_TYPE: TxType = TxType::Cip42;

    fn validate(&self) -> Result<(), Error> {
        check_chain_id(self.chain_id)?;
        check_fee_cap(self.max_priority_fee_per_gas, self.max_fee_per_gas)?;
        self.check_gateway()
    }

    fn rlp_items(&self, signature: Option<&Signature>) -> Result<Vec<RlpValue>, Error> {
        let mut builder = RlpListBuilder::with_capacity(15);
        builder
            .append(&self.chain_id)
            .append(&self.nonce)
            .append(&self.max_priority_fee_per_gas)
            .append(&self.max_fee_per_gas)
            .append(&self.gas_limit)
            .append(&self.fee_currency)
            .append(&self.gateway_fee_recipient)
            .append(&self.gateway_fee)
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

impl RlpDecodableTransaction for Cip42Transaction {
    fn rlp_decode(payload: &RlpValue) -> Result<(Self, Option<Signature>), Error> {
        let (fields, signed) = FieldDecoder::new(TxType::Cip42, payload)?;
        let tx = Self {
            chain_id: fields.decode(0)?,
            nonce: fields.decode(1)?,
            max_priority_fee_per_gas: fields.decode(2)?,
            max_fee_per_gas: fields.decode(3)?,
            gas_limit: fields.decode(4)?,
            fee_currency: fields.decode(5)?,
            gateway_fee_recipient: fields.decode(6)?,
            gateway_fee: fields.decode(7)?,
            to: fields.decode(8)?,
            value: fields.decode(9)?,
            data: fields.decode(10)?,
            access_list: fields.decode(11)?,
        };
        let signature = if signed { Some(fields.y_parity_signature(12)?) } else { None };
        Ok((tx, signature))
    }
}

impl TransactionT for Cip42Transaction {
    fn encode(&self, signature: Option<&Signature>) -> Result<Bytes, Error> {
        self.rlp_encode(signature)
    }

    fn tx_type(&self) -> TxType {
        TxType::Cip42
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

#[cfg(test)]
pub(crate) mod tests {
    use super::Cip42Transaction;
    use crate::{
        bytes::Bytes,
        error::Error,
        eth_hash::{Address, H256},
        rlp::{self, RlpValue},
        rlp_utils::{RlpDecodableTransaction, RlpEncodableTransaction},
        transactions::{
            access_list::{AccessList, AccessListItem},
            signature::{RecoveryId, Signature},
            tx_type::TxType,
        },
    };
    use hex_literal::hex;

    static RLP_CIP42_FEE_CURRENCY: &[u8] = &hex!("7cf84682a4ec80847735940084773594008094765de816845861e75a25fca122bb6898b8b1282a808094f39fd6e51aad88f6f4ce6ab8827279cfffb92266880de0b6b3a764000080c0");
    static RLP_CIP42_GATEWAY_FEE: &[u8] = &hex!("7cf85282a51e82031184773594008477359400825209809470997970c51812dc3a010c7d01b50e0d17dc79c888016345785d8a00009490f79bf6eb2c4f870365e785982e1f101e93b906880de0b6b3a764000080c0");
    static RLP_CIP42_ACCESS_LIST: &[u8] = &hex!("7cf8ae82a51e82031184773594008477359400825209809470997970c51812dc3a010c7d01b50e0d17dc79c888016345785d8a00009490f79bf6eb2c4f870365e785982e1f101e93b906880de0b6b3a764000080f85bf859940000000000000000000000000000000000000000f842a00000000000000000000000000000000000000000000000000000000000000001a060fdd29ff912ce880cd3edaf9f932dc61d3dae823ea77e0323f94adb9f6a72fe");
    static RLP_CIP42_DATA: &[u8] = &hex!("7cf85482a51e82031184773594008477359400825209809470997970c51812dc3a010c7d01b50e0d17dc79c888016345785d8a00009490f79bf6eb2c4f870365e785982e1f101e93b906880de0b6b3a7640000821234c0");

    pub fn build_cip42() -> Cip42Transaction {
        Cip42Transaction {
            chain_id: 42_270,
            nonce: 785,
            max_priority_fee_per_gas: 2_000_000_000u64.into(),
            max_fee_per_gas: 2_000_000_000u64.into(),
            gas_limit: 21_001,
            gateway_fee_recipient: Some(hex!("70997970c51812dc3a010c7d01b50e0d17dc79c8").into()),
            gateway_fee: 100_000_000_000_000_000u64.into(),
            to: Some(hex!("90f79bf6eb2c4f870365e785982e1f101e93b906").into()),
            value: 1_000_000_000_000_000_000u128.into(),
            ..Default::default()
        }
    }

    fn decode(raw: &[u8]) -> Result<(Cip42Transaction, Option<Signature>), Error> {
        assert_eq!(raw[0], 0x7c);
        Cip42Transaction::rlp_decode(&rlp::decode(&raw[1..])?)
    }

    #[test]
    fn rlp_codec_works() {
        let tx = Cip42Transaction {
            chain_id: 42_220,
            max_priority_fee_per_gas: 2_000_000_000u64.into(),
            max_fee_per_gas: 2_000_000_000u64.into(),
            fee_currency: Some(hex!("765de816845861e75a25fca122bb6898b8b1282a").into()),
            to: Some(hex!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266").into()),
            value: 1_000_000_000_000_000_000u128.into(),
            ..Default::default()
        };
        assert_eq!(tx.rlp_unsigned().unwrap(), Bytes::from_static(RLP_CIP42_FEE_CURRENCY));
        assert_eq!(decode(RLP_CIP42_FEE_CURRENCY).unwrap(), (tx, None));
    }

    #[test]
    fn gateway_fee_vectors() {
        let tx = build_cip42();
        assert_eq!(tx.rlp_unsigned().unwrap(), Bytes::from_static(RLP_CIP42_GATEWAY_FEE));
        assert_eq!(decode(RLP_CIP42_GATEWAY_FEE).unwrap(), (tx.clone(), None));

        let with_access_list = Cip42Transaction {
            access_list: AccessList(vec![AccessListItem {
                address: Address::zero(),
                storage_keys: vec![
                    H256::from_low_u64_be(1),
                    H256(hex!("60fdd29ff912ce880cd3edaf9f932dc61d3dae823ea77e0323f94adb9f6a72fe")),
                ],
            }]),
            ..tx.clone()
        };
        assert_eq!(
            with_access_list.rlp_unsigned().unwrap(),
            Bytes::from_static(RLP_CIP42_ACCESS_LIST)
        );
        assert_eq!(decode(RLP_CIP42_ACCESS_LIST).unwrap(), (with_access_list, None));

        let with_data = Cip42Transaction { data: hex!("1234").into(), ..tx };
        assert_eq!(with_data.rlp_unsigned().unwrap(), Bytes::from_static(RLP_CIP42_DATA));
        assert_eq!(decode(RLP_CIP42_DATA).unwrap(), (with_data, None));
    }

    #[test]
    fn signed_round_trip() {
        let tx = build_cip42();
        let rs = hex!("60fdd29ff912ce880cd3edaf9f932dc61d3dae823ea77e0323f94adb9f6a72fe");
        let signature = Signature { v: RecoveryId::new(1), r: rs.into(), s: rs.into() };
        let encoded = tx.rlp_signed(&signature).unwrap();
        let payload = rlp::decode(&encoded[1..]).unwrap();
        assert_eq!(payload.as_list().map(<[RlpValue]>::len), Some(15));
        assert_eq!(decode(&encoded).unwrap(), (tx, Some(signature)));
    }

    #[test]
    fn gateway_fee_needs_its_recipient() {
        let tx = build_cip42();
        let no_fee = Cip42Transaction { gateway_fee: 0u64.into(), ..tx.clone() };
        assert_eq!(
            no_fee.rlp_unsigned(),
            Err(Error::InvalidTransactionType {
                tx_type: TxType::Cip42,
                fields: vec!["gatewayFee"],
            })
        );

        let no_recipient = Cip42Transaction { gateway_fee_recipient: None, ..tx.clone() };
        assert_eq!(
            no_recipient.rlp_unsigned(),
            Err(Error::InvalidTransactionType {
                tx_type: TxType::Cip42,
                fields: vec!["gatewayFeeRecipient"],
            })
        );

        let neither = Cip42Transaction { gateway_fee: 0u64.into(), ..no_recipient };
        assert_eq!(
            neither.rlp_unsigned(),
            Err(Error::InvalidTransactionType {
                tx_type: TxType::Cip42,
                fields: vec!["feeCurrency", "gatewayFeeRecipient"],
            })
        );
    }

    #[test]
    fn missing_fields_are_named() {
        assert_eq!(
            decode(&hex!("7cc0")),
            Err(Error::InvalidSerializedTransaction {
                tx_type: TxType::Cip42,
                missing: TxType::Cip42.fields()[..12].to_vec(),
                extra: 0,
            })
        );
        assert_eq!(
            decode(&hex!("7cc20001")),
            Err(Error::InvalidSerializedTransaction {
                tx_type: TxType::Cip42,
                missing: TxType::Cip42.fields()[2..12].to_vec(),
                extra: 0,
            })
        );
        assert_eq!(
            decode(&hex!("7ccd80808080808080808080808080")),
            Err(Error::InvalidSerializedTransaction {
                tx_type: TxType::Cip42,
                missing: vec!["r", "s"],
                extra: 0,
            })
        );
    }
}
