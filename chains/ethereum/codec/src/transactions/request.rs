use super::{
    access_list::AccessList, authorization::AuthorizationList, blob::BlobSidecars,
    eip712::Eip712Meta, tx_type::TxType,
};
use crate::{
    bytes::Bytes,
    eth_hash::{Address, H256},
    rstd::vec::Vec,
};
use primitive_types::U256;

#[cfg(feature = "serde")]
use crate::serde_utils::uint_to_hex;

/// Fields only known to a single chain family, each one pins the request to a transaction kind.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(
    feature = "with-codec",
    derive(parity_scale_codec::Encode, parity_scale_codec::Decode, scale_info::TypeInfo)
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum ChainExtension {
    /// OP-stack deposit
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    Deposit { source_hash: H256, from: Address, mint: U256, is_system_tx: bool },
    /// zkSync EIP-712 metadata
    ZkSync(Eip712Meta),
    /// Celo fee currency
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    Celo { fee_currency: Address },
    /// Celo fee currency and full node gateway fee
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    CeloGateway {
        fee_currency: Option<Address>,
        gateway_fee_recipient: Option<Address>,
        gateway_fee: U256,
    },
}

impl ChainExtension {
    /// Attribute reported when the extension is missing or not allowed.
    #[must_use]
    pub const fn field_name(&self) -> &'static str {
        match self {
            Self::Deposit { .. } => "sourceHash",
            Self::ZkSync(_) => "eip712Meta",
            Self::Celo { .. } => "feeCurrency",
            Self::CeloGateway { .. } => "gatewayFee",
        }
    }

    const fn required_by(tx_type: TxType) -> Option<&'static str> {
        match tx_type {
            TxType::Deposit => Some("sourceHash"),
            TxType::Eip712 => Some("eip712Meta"),
            TxType::Cip64 => Some("feeCurrency"),
            TxType::Cip42 => Some("gatewayFee"),
            _ => None,
        }
    }
}

/// A transaction as supplied by the caller, before its kind is known.
///
/// Absent fee fields of fee market kinds are encoded as zero.
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(
    feature = "with-codec",
    derive(parity_scale_codec::Encode, parity_scale_codec::Decode, scale_info::TypeInfo)
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct TransactionRequest {
    /// Explicit transaction kind, inferred from the other fields when absent.
    #[cfg_attr(feature = "serde", serde(rename = "type", skip_serializing_if = "Option::is_none"))]
    pub tx_type: Option<TxType>,

    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", with = "uint_to_hex")
    )]
    pub chain_id: Option<u64>,

    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub nonce: u64,

    #[cfg_attr(feature = "serde", serde(rename = "gas", with = "uint_to_hex"))]
    pub gas_limit: u64,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub to: Option<Address>,

    pub value: U256,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Bytes::is_empty"))]
    pub data: Bytes,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub gas_price: Option<U256>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub max_fee_per_gas: Option<U256>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub max_priority_fee_per_gas: Option<U256>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub access_list: Option<AccessList>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub max_fee_per_blob_gas: Option<U256>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub blob_versioned_hashes: Option<Vec<H256>>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub sidecars: Option<BlobSidecars>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub authorization_list: Option<AuthorizationList>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub extension: Option<ChainExtension>,
}

impl TransactionRequest {
    #[must_use]
    pub const fn has_blob_fields(&self) -> bool {
        self.blob_versioned_hashes.is_some() ||
            self.max_fee_per_blob_gas.is_some() ||
            self.sidecars.is_some()
    }

    #[must_use]
    pub const fn has_fee_market_fields(&self) -> bool {
        self.max_fee_per_gas.is_some() || self.max_priority_fee_per_gas.is_some()
    }

    /// Names every attribute that is set but not part of `tx_type`, or required by `tx_type`
    /// but missing, in field order.
    #[must_use]
    pub fn presence_violations(&self, tx_type: TxType) -> Vec<&'static str> {
        // deposits carry neither, they are bound to the chain by their source hash
        let forbidden = [
            ("chainId", self.chain_id.is_some(), tx_type != TxType::Deposit),
            ("nonce", self.nonce != 0, tx_type != TxType::Deposit),
            (
                "gasPrice",
                self.gas_price.is_some(),
                matches!(tx_type, TxType::Legacy | TxType::Eip2930),
            ),
            ("maxFeePerGas", self.max_fee_per_gas.is_some(), tx_type.is_fee_market()),
            (
                "maxPriorityFeePerGas",
                self.max_priority_fee_per_gas.is_some(),
                tx_type.is_fee_market(),
            ),
            (
                "accessList",
                self.access_list.is_some(),
                !matches!(tx_type, TxType::Legacy | TxType::Deposit | TxType::Eip712),
            ),
            ("maxFeePerBlobGas", self.max_fee_per_blob_gas.is_some(), tx_type == TxType::Eip4844),
            (
                "blobVersionedHashes",
                self.blob_versioned_hashes.is_some(),
                tx_type == TxType::Eip4844,
            ),
            ("sidecars", self.sidecars.is_some(), tx_type == TxType::Eip4844),
            ("authorizationList", self.authorization_list.is_some(), tx_type == TxType::Eip7702),
        ];
        let required = [
            (
                "chainId",
                self.chain_id.is_some(),
                !matches!(tx_type, TxType::Legacy | TxType::Deposit),
            ),
            ("to", self.to.is_some(), matches!(tx_type, TxType::Eip4844 | TxType::Eip7702)),
            (
                "blobVersionedHashes",
                self.blob_versioned_hashes.is_some(),
                tx_type == TxType::Eip4844,
            ),
            ("authorizationList", self.authorization_list.is_some(), tx_type == TxType::Eip7702),
        ];

        let mut fields: Vec<&'static str> = required
            .into_iter()
            .filter(|(_, present, needed)| *needed && !present)
            .chain(forbidden.into_iter().filter(|(_, present, allowed)| *present && !allowed))
            .map(|(name, _, _)| name)
            .collect();

        let extension = self.extension.as_ref();
        if let Some(extension) = extension.filter(|extension| extension.tx_type() != tx_type) {
            fields.push(extension.field_name());
        }
        match ChainExtension::required_by(tx_type) {
            Some(name) if extension.map(ChainExtension::tx_type) != Some(tx_type) => {
                fields.push(name);
            },
            _ => {},
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::{ChainExtension, TransactionRequest};
    use crate::{
        eth_hash::{Address, H256},
        transactions::{
            access_list::AccessList, authorization::AuthorizationList, blob::BlobSidecars,
            eip712::Eip712Meta, tx_type::TxType,
        },
    };
    use primitive_types::U256;

    #[test]
    fn legacy_rejects_typed_fields() {
        let request = TransactionRequest {
            max_fee_per_gas: Some(U256::one()),
            access_list: Some(AccessList::default()),
            authorization_list: Some(AuthorizationList::default()),
            extension: Some(ChainExtension::Celo { fee_currency: Address::zero() }),
            ..Default::default()
        };
        assert_eq!(
            request.presence_violations(TxType::Legacy),
            vec!["maxFeePerGas", "accessList", "authorizationList", "feeCurrency"]
        );
    }

    #[test]
    fn typed_kinds_require_a_chain_id() {
        let request = TransactionRequest { gas_price: Some(U256::one()), ..Default::default() };
        assert!(request.presence_violations(TxType::Legacy).is_empty());
        assert_eq!(request.presence_violations(TxType::Eip2930), vec!["chainId"]);
        assert_eq!(request.presence_violations(TxType::Eip1559), vec!["chainId", "gasPrice"]);
    }

    #[test]
    fn blob_kind_requires_hashes() {
        let request = TransactionRequest {
            chain_id: Some(1),
            to: Some(Address::zero()),
            sidecars: Some(BlobSidecars::default()),
            ..Default::default()
        };
        assert_eq!(request.presence_violations(TxType::Eip4844), vec!["blobVersionedHashes"]);
        assert_eq!(request.presence_violations(TxType::Eip1559), vec!["sidecars"]);

        let request = TransactionRequest {
            blob_versioned_hashes: Some(vec![H256::zero()]),
            ..request
        };
        assert!(request.presence_violations(TxType::Eip4844).is_empty());
    }

    #[test]
    fn extensions_pin_their_kind() {
        let request = TransactionRequest {
            chain_id: Some(324),
            extension: Some(ChainExtension::ZkSync(Eip712Meta::default())),
            ..Default::default()
        };
        assert!(request.presence_violations(TxType::Eip712).is_empty());
        assert_eq!(request.presence_violations(TxType::Eip1559), vec!["eip712Meta"]);
        assert_eq!(request.presence_violations(TxType::Cip64), vec!["eip712Meta", "feeCurrency"]);
        assert_eq!(
            TransactionRequest::default().presence_violations(TxType::Deposit),
            vec!["sourceHash"]
        );
    }

    #[test]
    fn deposits_reject_chain_id_and_nonce() {
        let request = TransactionRequest {
            chain_id: Some(10),
            nonce: 7,
            extension: Some(ChainExtension::Deposit {
                source_hash: H256::repeat_byte(0x11),
                from: Address::repeat_byte(0x22),
                mint: U256::zero(),
                is_system_tx: false,
            }),
            ..Default::default()
        };
        assert_eq!(request.presence_violations(TxType::Deposit), vec!["chainId", "nonce"]);

        let request = TransactionRequest { chain_id: None, nonce: 0, ..request };
        assert!(request.presence_violations(TxType::Deposit).is_empty());
    }

    #[test]
    fn gateway_extension_pins_cip42() {
        let request = TransactionRequest {
            chain_id: Some(42_220),
            extension: Some(ChainExtension::CeloGateway {
                fee_currency: Some(Address::repeat_byte(0x76)),
                gateway_fee_recipient: None,
                gateway_fee: U256::zero(),
            }),
            ..Default::default()
        };
        assert!(request.presence_violations(TxType::Cip42).is_empty());
        assert_eq!(TxType::infer(&request), TxType::Cip42);
        assert_eq!(request.presence_violations(TxType::Cip64), vec!["gatewayFee", "feeCurrency"]);
        assert_eq!(
            TransactionRequest { extension: None, ..request }.presence_violations(TxType::Cip42),
            vec!["gatewayFee"]
        );
    }
}
