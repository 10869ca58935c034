use super::{
    access_list::AccessList,
    check_chain_id,
    signature::{RecoveryId, Signature},
    tx_type::TxType,
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

/// Legacy transaction that use the transaction format existing before typed transactions were
/// introduced in EIP-2718. Legacy transactions don’t use access lists or incorporate EIP-1559 fee
/// market changes.
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
pub struct LegacyTransaction {
    /// The nonce of the transaction.
    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub nonce: u64,

    /// Gas price
    pub gas_price: U256,

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

    /// The chain ID of the transaction, `None` for transactions without replay protection.
    ///
    /// Incorporated as part of the Spurious Dragon upgrade via [EIP-155].
    ///
    /// [EIP-155]: https://eips.ethereum.org/EIPS/eip-155
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none", with = "uint_to_hex")
    )]
    pub chain_id: Option<u64>,
}

impl RlpEncodableTransaction for LegacyTransaction {
    const TX_TYPE: TxType = TxType::Legacy;

    fn validate(&self) -> Result<(), Error> {
        let Some(chain_id) = self.chain_id else {
            return Ok(());
        };
        check_chain_id(chain_id)?;
        // both parities must have a replay protected `v`
        if RecoveryId::new(1).as_eip155(chain_id).is_none() {
            return Err(Error::InvalidChainId(chain_id));
        }
        Ok(())
    }

    fn rlp_items(&self, signature: Option<&Signature>) -> Result<Vec<RlpValue>, Error> {
        let mut builder = RlpListBuilder::with_capacity(9);
        builder
            .append(&self.nonce)
            .append(&self.gas_price)
            .append(&self.gas_limit)
            .append(&self.to)
            .append(&self.value)
            .append(&self.data);

        match (self.chain_id, signature) {
            (Some(chain_id), Some(sig)) => {
                let v = sig.v.as_eip155(chain_id).ok_or(Error::InvalidChainId(chain_id))?;
                builder.append(&v).append(&sig.r).append(&sig.s);
            },
            (None, Some(sig)) => {
                builder.append(&sig.v.as_legacy()).append(&sig.r).append(&sig.s);
            },
            // EIP-155 signing payload
            (Some(chain_id), None) => {
                builder.append(&chain_id).append_empty().append_empty();
            },
            (None, None) => {},
        }
        Ok(builder.finish())
    }
}

impl RlpDecodableTransaction for LegacyTransaction {
    fn rlp_decode(payload: &RlpValue) -> Result<(Self, Option<Signature>), Error> {
        let (fields, signed) = FieldDecoder::new(TxType::Legacy, payload)?;
        let mut tx = Self {
            nonce: fields.decode(0)?,
            gas_price: fields.decode(1)?,
            gas_limit: fields.decode(2)?,
            to: fields.decode(3)?,
            value: fields.decode(4)?,
            data: fields.decode(5)?,
            chain_id: None,
        };
        if !signed {
            return Ok((tx, None));
        }

        let v = fields.decode::<u64>(6)?;

        // Unsigned EIP-155 payload, `v` holds the chain id
        if fields.is_empty_at(7) && fields.is_empty_at(8) {
            check_chain_id(v)?;
            tx.chain_id = Some(v);
            return Ok((tx, None));
        }

        tx.chain_id = match v {
            27 | 28 => None,
            v if v >= 37 => Some((v - 35) / 2),
            v => return Err(Error::InvalidLegacyV(v)),
        };
        let signature =
            Signature { v: RecoveryId::new(v), r: fields.decode(7)?, s: fields.decode(8)? };
        Ok((tx, Some(signature)))
    }
}

impl TransactionT for LegacyTransaction {
    fn encode(&self, signature: Option<&Signature>) -> Result<Bytes, Error> {
        self.rlp_encode(signature)
    }

    fn tx_type(&self) -> TxType {
        TxType::Legacy
    }

    fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    fn nonce(&self) -> u64 {
        self.nonce
    }

    fn gas_price(&self) -> GasPrice {
        GasPrice::Legacy(self.gas_price)
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

#[cfg(test)]
pub(crate) mod tests {
    use super::LegacyTransaction;
    use crate::{
        bytes::Bytes,
        error::Error,
        rlp::{self, RlpValue},
        rlp_utils::{RlpDecodableTransaction, RlpEncodableTransaction},
        transactions::signature::{RecoveryId, Signature},
    };
    use hex_literal::hex;
    use primitive_types::U256;

    static RLP_LEGACY_SIGNED: &[u8] = &hex!("f8eb81eb8505fa1b1d728301c044948e5660b4ab70168b5a6feea0e0315cb49c8cd53980b8846f652e1a000000000000000000000000959e104e1a4db6317fa58f8295f586e1a978c29700000000000000000000000000000000000000000000000000000000000008b800000000000000000000000000000000000000000000054b40b1f852bda000000000000000000000000000000000000000000000000000000000017723be258026a0a19fd53308a1c44a3ed22d3f20ed4229aa8909e0d0a90510ca482367ad42caa6a04b88362cca36cc9742366ca474fd777328cb6ee012ceee2da9aa147761e17cbf");

    pub fn build_legacy() -> (LegacyTransaction, Signature) {
        let tx = LegacyTransaction {
            nonce: 235,
            gas_price: 25_670_917_490u128.into(),
            gas_limit: 114_756,
            to: Some(hex!("8e5660b4ab70168b5a6feea0e0315cb49c8cd539").into()),
            value: U256::zero(),
            data: hex!("6f652e1a000000000000000000000000959e104e1a4db6317fa58f8295f586e1a978c29700000000000000000000000000000000000000000000000000000000000008b800000000000000000000000000000000000000000000054b40b1f852bda000000000000000000000000000000000000000000000000000000000017723be2580").into(),
            chain_id: Some(1),
        };
        let signature = Signature {
            v: RecoveryId::new(0x26),
            r: hex!("a19fd53308a1c44a3ed22d3f20ed4229aa8909e0d0a90510ca482367ad42caa6").into(),
            s: hex!("4b88362cca36cc9742366ca474fd777328cb6ee012ceee2da9aa147761e17cbf").into(),
        };
        (tx, signature)
    }

    fn decode(raw: &[u8]) -> Result<(LegacyTransaction, Option<Signature>), Error> {
        LegacyTransaction::rlp_decode(&rlp::decode(raw)?)
    }

    #[test]
    fn rlp_codec_works() {
        let (tx, signature) = build_legacy();
        let actual = tx.rlp_signed(&signature).unwrap();
        assert_eq!(actual, Bytes::from_static(RLP_LEGACY_SIGNED));

        let (decoded, decoded_signature) = decode(RLP_LEGACY_SIGNED).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded_signature, Some(signature));
    }

    #[test]
    fn eip155_signing_payload() {
        let (tx, _) = build_legacy();
        let unsigned = tx.rlp_unsigned().unwrap();
        let items = rlp::decode(&unsigned).unwrap();
        let items = items.as_list().unwrap();
        assert_eq!(items.len(), 9);
        assert_eq!(items[6], RlpValue::from(vec![0x01u8]));
        assert_eq!(items[7], RlpValue::empty());
        assert_eq!(items[8], RlpValue::empty());

        // the chain id is recovered from `v`
        assert_eq!(decode(&unsigned).unwrap(), (tx, None));
    }

    #[test]
    fn all_zero_unsigned_transaction() {
        let tx = LegacyTransaction::default();
        let encoded = tx.rlp_unsigned().unwrap();
        assert_eq!(encoded, hex!("c6808080808080"));
        assert_eq!(decode(&encoded).unwrap(), (tx, None));
    }

    #[test]
    fn pre_eip155_signature() {
        let tx = LegacyTransaction { chain_id: None, ..build_legacy().0 };
        let signature = Signature { v: RecoveryId::new(27), ..build_legacy().1 };
        let encoded = tx.rlp_signed(&signature).unwrap();
        let (decoded, decoded_signature) = decode(&encoded).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded_signature, Some(signature));

        // y parity signatures are converted to 27/28
        let parity = Signature { v: RecoveryId::new(1), ..signature };
        let encoded = tx.rlp_signed(&parity).unwrap();
        assert_eq!(decode(&encoded).unwrap().1.map(|sig| sig.v), Some(RecoveryId::new(28)));
    }

    #[test]
    fn invalid_v_is_rejected() {
        let (tx, signature) = build_legacy();
        let tx = LegacyTransaction { chain_id: None, ..tx };
        let mut items = tx.rlp_items(Some(&signature)).unwrap();
        for v in [0u8, 1, 29, 35, 36] {
            items[6] = RlpValue::from(vec![v]);
            if v == 0 {
                items[6] = RlpValue::empty();
            }
            let encoded = rlp::encode(&RlpValue::List(items.clone())).unwrap();
            assert_eq!(decode(&encoded), Err(Error::InvalidLegacyV(u64::from(v))));
        }
    }

    #[test]
    fn zero_chain_id_is_rejected() {
        let tx = LegacyTransaction { chain_id: Some(0), ..Default::default() };
        assert_eq!(tx.rlp_unsigned(), Err(Error::InvalidChainId(0)));

        let encoded = hex!("c9808080808080808080");
        assert_eq!(decode(&encoded), Err(Error::InvalidChainId(0)));
    }

    #[test]
    fn chain_id_must_fit_in_v() {
        let (tx, signature) = build_legacy();
        let chain_id = u64::MAX / 2;
        let tx = LegacyTransaction { chain_id: Some(chain_id), ..tx };
        assert_eq!(tx.rlp_signed(&signature), Err(Error::InvalidChainId(chain_id)));
        assert_eq!(tx.rlp_unsigned(), Err(Error::InvalidChainId(chain_id)));
        assert_eq!(
            tx.rlp_items(Some(&signature)).map(|items| items.len()),
            Err(Error::InvalidChainId(chain_id))
        );

        let largest = (u64::MAX - 37) / 2;
        let tx = LegacyTransaction { chain_id: Some(largest), ..tx };
        let encoded = tx.rlp_signed(&signature).unwrap();
        let (decoded, decoded_signature) = decode(&encoded).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded_signature.map(|sig| sig.v), Some(RecoveryId::new(u64::MAX - 1)));
    }
}
