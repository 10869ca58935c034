use crate::{
    error::Error,
    rstd::{fmt, vec::Vec},
    transactions::request::{ChainExtension, TransactionRequest},
};

const LOG_TARGET: &str = "tx-type";

const LEGACY_FIELDS: [&str; 9] = ["nonce", "gasPrice", "gas", "to", "value", "data", "v", "r", "s"];

const EIP2930_FIELDS: [&str; 11] = [
    "chainId",
    "nonce",
    "gasPrice",
    "gas",
    "to",
    "value",
    "data",
    "accessList",
    "yParity",
    "r",
    "s",
];

const EIP1559_FIELDS: [&str; 12] = [
    "chainId",
    "nonce",
    "maxPriorityFeePerGas",
    "maxFeePerGas",
    "gas",
    "to",
    "value",
    "data",
    "accessList",
    "yParity",
    "r",
    "s",
];

const EIP4844_FIELDS: [&str; 14] = [
    "chainId",
    "nonce",
    "maxPriorityFeePerGas",
    "maxFeePerGas",
    "gas",
    "to",
    "value",
    "data",
    "accessList",
    "maxFeePerBlobGas",
    "blobVersionedHashes",
    "yParity",
    "r",
    "s",
];

const EIP7702_FIELDS: [&str; 13] = [
    "chainId",
    "nonce",
    "maxPriorityFeePerGas",
    "maxFeePerGas",
    "gas",
    "to",
    "value",
    "data",
    "accessList",
    "authorizationList",
    "yParity",
    "r",
    "s",
];

const CIP64_FIELDS: [&str; 13] = [
    "chainId",
    "nonce",
    "maxPriorityFeePerGas",
    "maxFeePerGas",
    "gas",
    "to",
    "value",
    "data",
    "accessList",
    "feeCurrency",
    "yParity",
    "r",
    "s",
];

const CIP42_FIELDS: [&str; 15] = [
    "chainId",
    "nonce",
    "maxPriorityFeePerGas",
    "maxFeePerGas",
    "gas",
    "feeCurrency",
    "gatewayFeeRecipient",
    "gatewayFee",
    "to",
    "value",
    "data",
    "accessList",
    "yParity",
    "r",
    "s",
];

const DEPOSIT_FIELDS: [&str; 8] =
    ["sourceHash", "from", "to", "mint", "value", "gas", "isSystemTx", "data"];

const EIP712_FIELDS: [&str; 16] = [
    "nonce",
    "maxPriorityFeePerGas",
    "maxFeePerGas",
    "gas",
    "to",
    "value",
    "data",
    "v",
    "r",
    "s",
    "chainId",
    "from",
    "gasPerPubdata",
    "factoryDeps",
    "customSignature",
    "paymasterParams",
];

/// Transaction kinds supported by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "with-codec",
    derive(parity_scale_codec::Encode, parity_scale_codec::Decode, scale_info::TypeInfo)
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum TxType {
    /// Pre EIP-2718 transaction, optionally replay protected by [EIP-155](https://eips.ethereum.org/EIPS/eip-155)
    Legacy,
    /// [EIP-2930](https://eips.ethereum.org/EIPS/eip-2930) access list transaction
    Eip2930,
    /// [EIP-1559](https://eips.ethereum.org/EIPS/eip-1559) fee market transaction
    Eip1559,
    /// [EIP-4844](https://eips.ethereum.org/EIPS/eip-4844) blob transaction
    Eip4844,
    /// [EIP-7702](https://eips.ethereum.org/EIPS/eip-7702) set code transaction
    Eip7702,
    /// OP-stack L1 to L2 deposit transaction
    Deposit,
    /// zkSync EIP-712 transaction
    Eip712,
    /// Celo CIP-64 transaction, pays fees in an ERC-20 token
    Cip64,
    /// Celo CIP-42 transaction, superseded by CIP-64, with an optional full node gateway fee
    Cip42,
}

impl TxType {
    pub const ALL: [Self; 9] = [
        Self::Legacy,
        Self::Eip2930,
        Self::Eip1559,
        Self::Eip4844,
        Self::Eip7702,
        Self::Deposit,
        Self::Eip712,
        Self::Cip64,
        Self::Cip42,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Eip2930 => "eip2930",
            Self::Eip1559 => "eip1559",
            Self::Eip4844 => "eip4844",
            Self::Eip7702 => "eip7702",
            Self::Deposit => "deposit",
            Self::Eip712 => "eip712",
            Self::Cip64 => "cip64",
            Self::Cip42 => "cip42",
        }
    }

    /// [EIP-2718](https://eips.ethereum.org/EIPS/eip-2718) type byte, `None` for legacy.
    #[must_use]
    pub const fn discriminator(self) -> Option<u8> {
        match self {
            Self::Legacy => None,
            Self::Eip2930 => Some(0x01),
            Self::Eip1559 => Some(0x02),
            Self::Eip4844 => Some(0x03),
            Self::Eip7702 => Some(0x04),
            Self::Eip712 => Some(0x71),
            Self::Cip64 => Some(0x7b),
            Self::Cip42 => Some(0x7c),
            Self::Deposit => Some(0x7e),
        }
    }

    #[must_use]
    pub const fn from_discriminator(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(Self::Eip2930),
            0x02 => Some(Self::Eip1559),
            0x03 => Some(Self::Eip4844),
            0x04 => Some(Self::Eip7702),
            0x71 => Some(Self::Eip712),
            0x7b => Some(Self::Cip64),
            0x7c => Some(Self::Cip42),
            0x7e => Some(Self::Deposit),
            _ => None,
        }
    }

    /// Field names in wire order, signature fields last.
    #[must_use]
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Legacy => &LEGACY_FIELDS,
            Self::Eip2930 => &EIP2930_FIELDS,
            Self::Eip1559 => &EIP1559_FIELDS,
            Self::Eip4844 => &EIP4844_FIELDS,
            Self::Eip7702 => &EIP7702_FIELDS,
            Self::Deposit => &DEPOSIT_FIELDS,
            Self::Eip712 => &EIP712_FIELDS,
            Self::Cip64 => &CIP64_FIELDS,
            Self::Cip42 => &CIP42_FIELDS,
        }
    }

    /// Number of items of the unsigned encoding.
    ///
    /// Deposit transactions are never signed, and zkSync transactions keep the signature
    /// positions in their unsigned form, so both have a single legal item count.
    #[must_use]
    pub const fn unsigned_len(self) -> usize {
        match self {
            Self::Deposit | Self::Eip712 => self.fields().len(),
            _ => self.fields().len() - 3,
        }
    }

    /// Whether the type uses the fee market fields instead of a gas price.
    #[must_use]
    pub const fn is_fee_market(self) -> bool {
        !matches!(self, Self::Legacy | Self::Eip2930 | Self::Deposit)
    }

    /// Infers the type of a request from the fields it has set.
    ///
    /// The precedence is fixed: chain extension, blob fields, authorization list, fee market
    /// fields, access list, and legacy otherwise. The inferred type is not validated, see
    /// [`TransactionRequest::presence_violations`].
    #[must_use]
    pub fn infer(request: &TransactionRequest) -> Self {
        let tx_type = match request.extension.as_ref() {
            Some(extension) => extension.tx_type(),
            None if request.has_blob_fields() => Self::Eip4844,
            None if request.authorization_list.is_some() => Self::Eip7702,
            None if request.has_fee_market_fields() => Self::Eip1559,
            None if request.access_list.is_some() => Self::Eip2930,
            None => Self::Legacy,
        };
        tracing::trace!(target: LOG_TARGET, "inferred transaction type {}", tx_type);
        tx_type
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ChainExtension {
    /// The transaction kind an extension pins the request to.
    #[must_use]
    pub const fn tx_type(&self) -> TxType {
        match self {
            Self::Deposit { .. } => TxType::Deposit,
            Self::ZkSync(_) => TxType::Eip712,
            Self::Celo { .. } => TxType::Cip64,
            Self::CeloGateway { .. } => TxType::Cip42,
        }
    }
}

/// The set of transaction types a network accepts.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "with-codec",
    derive(parity_scale_codec::Encode, parity_scale_codec::Decode, scale_info::TypeInfo)
)]
pub struct TypeRegistry(u16);

impl TypeRegistry {
    /// Ethereum mainnet and its testnets.
    pub const ETHEREUM: Self = Self::empty()
        .with(TxType::Legacy)
        .with(TxType::Eip2930)
        .with(TxType::Eip1559)
        .with(TxType::Eip4844)
        .with(TxType::Eip7702);

    /// EVM chains which didn't adopt blob transactions.
    pub const EVM: Self =
        Self::empty().with(TxType::Legacy).with(TxType::Eip2930).with(TxType::Eip1559);

    /// OP-stack rollups, blobs are only posted on L1.
    pub const OP_STACK: Self = Self::EVM.with(TxType::Eip7702).with(TxType::Deposit);

    pub const ZKSYNC: Self = Self::EVM.with(TxType::Eip712);

    pub const CELO: Self = Self::EVM.with(TxType::Cip64).with(TxType::Cip42);

    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn all() -> Self {
        let mut registry = Self::empty();
        let mut i = 0;
        while i < TxType::ALL.len() {
            registry = registry.with(TxType::ALL[i]);
            i += 1;
        }
        registry
    }

    const fn bit(tx_type: TxType) -> u16 {
        1 << tx_type as u16
    }

    #[must_use]
    pub const fn with(self, tx_type: TxType) -> Self {
        Self(self.0 | Self::bit(tx_type))
    }

    #[must_use]
    pub const fn without(self, tx_type: TxType) -> Self {
        Self(self.0 & !Self::bit(tx_type))
    }

    #[must_use]
    pub const fn contains(self, tx_type: TxType) -> bool {
        self.0 & Self::bit(tx_type) != 0
    }

    pub fn iter(self) -> impl Iterator<Item = TxType> {
        TxType::ALL.into_iter().filter(move |tx_type| self.contains(*tx_type))
    }

    /// Resolves the discriminator of a typed envelope.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedTransactionType`] if the byte is unknown or its type is not
    /// enabled.
    pub fn resolve(self, discriminator: u8) -> Result<TxType, Error> {
        TxType::from_discriminator(discriminator)
            .filter(|tx_type| self.contains(*tx_type))
            .ok_or(Error::UnsupportedTransactionType(discriminator))
    }

    /// # Errors
    /// Returns [`Error::TransactionTypeNotEnabled`] if `tx_type` is not part of the registry.
    pub fn ensure_enabled(self, tx_type: TxType) -> Result<(), Error> {
        if self.contains(tx_type) {
            Ok(())
        } else {
            Err(Error::TransactionTypeNotEnabled(tx_type))
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<TxType> for TypeRegistry {
    fn from_iter<I: IntoIterator<Item = TxType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl From<TypeRegistry> for Vec<TxType> {
    fn from(registry: TypeRegistry) -> Self {
        registry.iter().collect()
    }
}
