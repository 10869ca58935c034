use super::{
    access_list::AccessList,
    cip42::Cip42Transaction,
    cip64::Cip64Transaction,
    deposit::DepositTransaction,
    eip1559::Eip1559Transaction,
    eip2930::Eip2930Transaction,
    eip4844::Eip4844Transaction,
    eip712::Eip712Transaction,
    eip7702::Eip7702Transaction,
    legacy::LegacyTransaction,
    request::{ChainExtension, TransactionRequest},
    signature::Signature,
    tx_type::{TxType, TypeRegistry},
    GasPrice, TransactionT,
};
use crate::{
    bytes::Bytes,
    crypto::Hasher,
    cursor::Cursor,
    error::Error,
    eth_hash::{Address, H256},
    rlp::{self, RlpValue},
    rlp_utils::{RlpDecodableTransaction, RlpEncodableTransaction},
};
use primitive_types::U256;

const LOG_TARGET: &str = "typed-transaction";

/// The [`TypedTransaction`] enum represents all supported transaction kinds.
///
/// Its variants correspond to specific allowed transactions:
/// 1. Legacy (pre-EIP2718) [`LegacyTransaction`]
/// 2. EIP2930 (state access lists) [`Eip2930Transaction`]
/// 3. EIP1559 [`Eip1559Transaction`]
/// 4. EIP4844 (blobs) [`Eip4844Transaction`]
/// 5. EIP7702 (set code) [`Eip7702Transaction`]
/// 6. OP-stack deposit [`DepositTransaction`]
/// 7. zkSync EIP712 [`Eip712Transaction`]
/// 8. Celo CIP64 [`Cip64Transaction`]
/// 9. Celo CIP42 (gateway fees) [`Cip42Transaction`]
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(
    feature = "with-codec",
    derive(parity_scale_codec::Encode, parity_scale_codec::Decode, scale_info::TypeInfo)
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "lowercase")
)]
pub enum TypedTransaction {
    Legacy(LegacyTransaction),
    Eip2930(Eip2930Transaction),
    Eip1559(Eip1559Transaction),
    Eip4844(Eip4844Transaction),
    Eip7702(Eip7702Transaction),
    Deposit(DepositTransaction),
    Eip712(Eip712Transaction),
    Cip64(Cip64Transaction),
    Cip42(Cip42Transaction),
}

macro_rules! dispatch {
    ($self: expr, $tx: ident => $body: expr) => {
        match $self {
            Self::Legacy($tx) => $body,
            Self::Eip2930($tx) => $body,
            Self::Eip1559($tx) => $body,
            Self::Eip4844($tx) => $body,
            Self::Eip7702($tx) => $body,
            Self::Deposit($tx) => $body,
            Self::Eip712($tx) => $body,
            Self::Cip64($tx) => $body,
            Self::Cip42($tx) => $body,
        }
    };
}

fn lift<T>(payload: &RlpValue) -> Result<(TypedTransaction, Option<Signature>), Error>
where
    T: RlpDecodableTransaction + RlpEncodableTransaction + Into<TypedTransaction>,
{
    let (tx, signature) = T::rlp_decode(payload)?;
    tx.validate()?;
    Ok((tx.into(), signature))
}

impl TypedTransaction {
    /// Checks the field values of the transaction.
    ///
    /// # Errors
    /// Returns `Err` if a field value is not allowed by the transaction kind.
    pub fn validate(&self) -> Result<(), Error> {
        dispatch!(self, tx => RlpEncodableTransaction::validate(tx))
    }

    /// Builds the transaction of kind `tx_type` from a request.
    ///
    /// Fee fields absent from fee market kinds default to zero.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTransactionType`] naming every attribute of `request` that
    /// doesn't fit `tx_type`.
    pub fn try_from_request(request: &TransactionRequest, tx_type: TxType) -> Result<Self, Error> {
        let fields = request.presence_violations(tx_type);
        if !fields.is_empty() {
            tracing::debug!(
                target: LOG_TARGET,
                "request doesn't fit {} transactions: {:?}",
                tx_type,
                fields
            );
            return Err(Error::InvalidTransactionType { tx_type, fields });
        }

        let chain_id = request.chain_id.unwrap_or_default();
        let max_priority_fee_per_gas = request.max_priority_fee_per_gas.unwrap_or_default();
        let max_fee_per_gas = request.max_fee_per_gas.unwrap_or_default();
        let access_list = request.access_list.clone().unwrap_or_default();
        let tx = match (tx_type, request.extension.as_ref()) {
            (TxType::Legacy, _) => Self::Legacy(LegacyTransaction {
                nonce: request.nonce,
                gas_price: request.gas_price.unwrap_or_default(),
                gas_limit: request.gas_limit,
                to: request.to,
                value: request.value,
                data: request.data.clone(),
                chain_id: request.chain_id,
            }),
            (TxType::Eip2930, _) => Self::Eip2930(Eip2930Transaction {
                chain_id,
                nonce: request.nonce,
                gas_price: request.gas_price.unwrap_or_default(),
                gas_limit: request.gas_limit,
                to: request.to,
                value: request.value,
                data: request.data.clone(),
                access_list,
            }),
            (TxType::Eip1559, _) => Self::Eip1559(Eip1559Transaction {
                chain_id,
                nonce: request.nonce,
                max_priority_fee_per_gas,
                max_fee_per_gas,
                gas_limit: request.gas_limit,
                to: request.to,
                value: request.value,
                data: request.data.clone(),
                access_list,
            }),
            (TxType::Eip4844, _) => Self::Eip4844(Eip4844Transaction {
                chain_id,
                nonce: request.nonce,
                max_priority_fee_per_gas,
                max_fee_per_gas,
                gas_limit: request.gas_limit,
                to: request.to.unwrap_or_default(),
                value: request.value,
                data: request.data.clone(),
                access_list,
                max_fee_per_blob_gas: request.max_fee_per_blob_gas.unwrap_or_default(),
                blob_versioned_hashes: request.blob_versioned_hashes.clone().unwrap_or_default(),
                sidecars: request.sidecars.clone(),
            }),
            (TxType::Eip7702, _) => Self::Eip7702(Eip7702Transaction {
                chain_id,
                nonce: request.nonce,
                max_priority_fee_per_gas,
                max_fee_per_gas,
                gas_limit: request.gas_limit,
                to: request.to.unwrap_or_default(),
                value: request.value,
                data: request.data.clone(),
                access_list,
                authorization_list: request.authorization_list.clone().unwrap_or_default(),
            }),
            (
                TxType::Deposit,
                Some(ChainExtension::Deposit { source_hash, from, mint, is_system_tx }),
            ) => Self::Deposit(DepositTransaction {
                source_hash: *source_hash,
                from: *from,
                to: request.to,
                mint: *mint,
                value: request.value,
                gas_limit: request.gas_limit,
                is_system_tx: *is_system_tx,
                data: request.data.clone(),
            }),
            (TxType::Eip712, Some(ChainExtension::ZkSync(meta))) => Self::Eip712(Eip712Transaction {
                nonce: request.nonce,
                max_priority_fee_per_gas,
                max_fee_per_gas,
                gas_limit: request.gas_limit,
                to: request.to,
                value: request.value,
                data: request.data.clone(),
                chain_id,
                meta: meta.clone(),
            }),
            (TxType::Cip64, Some(ChainExtension::Celo { fee_currency })) => {
                Self::Cip64(Cip64Transaction {
                    chain_id,
                    nonce: request.nonce,
                    max_priority_fee_per_gas,
                    max_fee_per_gas,
                    gas_limit: request.gas_limit,
                    to: request.to,
                    value: request.value,
                    data: request.data.clone(),
                    access_list,
                    fee_currency: *fee_currency,
                })
            },
            (
                TxType::Cip42,
                Some(ChainExtension::CeloGateway {
                    fee_currency,
                    gateway_fee_recipient,
                    gateway_fee,
                }),
            ) => Self::Cip42(Cip42Transaction {
                chain_id,
                nonce: request.nonce,
                max_priority_fee_per_gas,
                max_fee_per_gas,
                gas_limit: request.gas_limit,
                fee_currency: *fee_currency,
                gateway_fee_recipient: *gateway_fee_recipient,
                gateway_fee: *gateway_fee,
                to: request.to,
                value: request.value,
                data: request.data.clone(),
                access_list,
            }),
            // Extension kinds without their extension were rejected above
            (TxType::Deposit | TxType::Eip712 | TxType::Cip64 | TxType::Cip42, _) => {
                return Err(Error::InvalidTransactionType {
                    tx_type,
                    fields: request.presence_violations(tx_type),
                })
            },
        };
        Ok(tx)
    }

    /// Parses a serialized envelope, restricted to the kinds enabled in `registry`.
    ///
    /// # Errors
    /// Returns `Err` if the input is empty, its kind is unknown or not enabled, or the payload
    /// is not the canonical encoding of a valid transaction of that kind.
    pub fn decode(raw: &[u8], registry: TypeRegistry) -> Result<(Self, Option<Signature>), Error> {
        let cursor = Cursor::new(raw);
        let first = cursor.peek_byte()?;

        // legacy transactions always start with a list prefix >= 0xc0.
        let (tx_type, payload) = if first >= 0xc0 {
            registry.ensure_enabled(TxType::Legacy)?;
            (TxType::Legacy, rlp::decode(raw)?)
        } else {
            let tx_type = registry.resolve(first)?;
            (tx_type, rlp::decode(&raw[1..])?)
        };
        tracing::trace!(target: LOG_TARGET, "decoding {} transaction", tx_type);

        match tx_type {
            TxType::Legacy => lift::<LegacyTransaction>(&payload),
            TxType::Eip2930 => lift::<Eip2930Transaction>(&payload),
            TxType::Eip1559 => lift::<Eip1559Transaction>(&payload),
            TxType::Eip4844 => lift::<Eip4844Transaction>(&payload),
            TxType::Eip7702 => lift::<Eip7702Transaction>(&payload),
            TxType::Deposit => lift::<DepositTransaction>(&payload),
            TxType::Eip712 => lift::<Eip712Transaction>(&payload),
            TxType::Cip64 => lift::<Cip64Transaction>(&payload),
            TxType::Cip42 => lift::<Cip42Transaction>(&payload),
        }
    }
}

impl From<LegacyTransaction> for TypedTransaction {
    fn from(tx: LegacyTransaction) -> Self {
        Self::Legacy(tx)
    }
}

impl From<Eip2930Transaction> for TypedTransaction {
    fn from(tx: Eip2930Transaction) -> Self {
        Self::Eip2930(tx)
    }
}

impl From<Eip1559Transaction> for TypedTransaction {
    fn from(tx: Eip1559Transaction) -> Self {
        Self::Eip1559(tx)
    }
}

impl From<Eip4844Transaction> for TypedTransaction {
    fn from(tx: Eip4844Transaction) -> Self {
        Self::Eip4844(tx)
    }
}

impl From<Eip7702Transaction> for TypedTransaction {
    fn from(tx: Eip7702Transaction) -> Self {
        Self::Eip7702(tx)
    }
}

impl From<DepositTransaction> for TypedTransaction {
    fn from(tx: DepositTransaction) -> Self {
        Self::Deposit(tx)
    }
}

impl From<Eip712Transaction> for TypedTransaction {
    fn from(tx: Eip712Transaction) -> Self {
        Self::Eip712(tx)
    }
}

impl From<Cip64Transaction> for TypedTransaction {
    fn from(tx: Cip64Transaction) -> Self {
        Self::Cip64(tx)
    }
}

impl From<Cip42Transaction> for TypedTransaction {
    fn from(tx: Cip42Transaction) -> Self {
        Self::Cip42(tx)
    }
}

/// Converts a transaction back to a request with an explicit type.
impl From<TypedTransaction> for TransactionRequest {
    fn from(tx: TypedTransaction) -> Self {
        let tx_type = Some(tx.tx_type());
        match tx {
            TypedTransaction::Legacy(tx) => Self {
                tx_type,
                chain_id: tx.chain_id,
                nonce: tx.nonce,
                gas_limit: tx.gas_limit,
                to: tx.to,
                value: tx.value,
                data: tx.data,
                gas_price: Some(tx.gas_price),
                ..Self::default()
            },
            TypedTransaction::Eip2930(tx) => Self {
                tx_type,
                chain_id: Some(tx.chain_id),
                nonce: tx.nonce,
                gas_limit: tx.gas_limit,
                to: tx.to,
                value: tx.value,
                data: tx.data,
                gas_price: Some(tx.gas_price),
                access_list: Some(tx.access_list),
                ..Self::default()
            },
            TypedTransaction::Eip1559(tx) => Self {
                tx_type,
                chain_id: Some(tx.chain_id),
                nonce: tx.nonce,
                gas_limit: tx.gas_limit,
                to: tx.to,
                value: tx.value,
                data: tx.data,
                max_fee_per_gas: Some(tx.max_fee_per_gas),
                max_priority_fee_per_gas: Some(tx.max_priority_fee_per_gas),
                access_list: Some(tx.access_list),
                ..Self::default()
            },
            TypedTransaction::Eip4844(tx) => Self {
                tx_type,
                chain_id: Some(tx.chain_id),
                nonce: tx.nonce,
                gas_limit: tx.gas_limit,
                to: Some(tx.to),
                value: tx.value,
                data: tx.data,
                max_fee_per_gas: Some(tx.max_fee_per_gas),
                max_priority_fee_per_gas: Some(tx.max_priority_fee_per_gas),
                access_list: Some(tx.access_list),
                max_fee_per_blob_gas: Some(tx.max_fee_per_blob_gas),
                blob_versioned_hashes: Some(tx.blob_versioned_hashes),
                sidecars: tx.sidecars,
                ..Self::default()
            },
            TypedTransaction::Eip7702(tx) => Self {
                tx_type,
                chain_id: Some(tx.chain_id),
                nonce: tx.nonce,
                gas_limit: tx.gas_limit,
                to: Some(tx.to),
                value: tx.value,
                data: tx.data,
                max_fee_per_gas: Some(tx.max_fee_per_gas),
                max_priority_fee_per_gas: Some(tx.max_priority_fee_per_gas),
                access_list: Some(tx.access_list),
                authorization_list: Some(tx.authorization_list),
                ..Self::default()
            },
            TypedTransaction::Deposit(tx) => Self {
                tx_type,
                gas_limit: tx.gas_limit,
                to: tx.to,
                value: tx.value,
                data: tx.data,
                extension: Some(ChainExtension::Deposit {
                    source_hash: tx.source_hash,
                    from: tx.from,
                    mint: tx.mint,
                    is_system_tx: tx.is_system_tx,
                }),
                ..Self::default()
            },
            TypedTransaction::Eip712(tx) => Self {
                tx_type,
                chain_id: Some(tx.chain_id),
                nonce: tx.nonce,
                gas_limit: tx.gas_limit,
                to: tx.to,
                value: tx.value,
                data: tx.data,
                max_fee_per_gas: Some(tx.max_fee_per_gas),
                max_priority_fee_per_gas: Some(tx.max_priority_fee_per_gas),
                extension: Some(ChainExtension::ZkSync(tx.meta)),
                ..Self::default()
            },
            TypedTransaction::Cip64(tx) => Self {
                tx_type,
                chain_id: Some(tx.chain_id),
                nonce: tx.nonce,
                gas_limit: tx.gas_limit,
                to: tx.to,
                value: tx.value,
                data: tx.data,
                max_fee_per_gas: Some(tx.max_fee_per_gas),
                max_priority_fee_per_gas: Some(tx.max_priority_fee_per_gas),
                access_list: Some(tx.access_list),
                extension: Some(ChainExtension::Celo { fee_currency: tx.fee_currency }),
                ..Self::default()
            },
            TypedTransaction::Cip42(tx) => Self {
                tx_type,
                chain_id: Some(tx.chain_id),
                nonce: tx.nonce,
                gas_limit: tx.gas_limit,
                to: tx.to,
                value: tx.value,
                data: tx.data,
                max_fee_per_gas: Some(tx.max_fee_per_gas),
                max_priority_fee_per_gas: Some(tx.max_priority_fee_per_gas),
                access_list: Some(tx.access_list),
                extension: Some(ChainExtension::CeloGateway {
                    fee_currency: tx.fee_currency,
                    gateway_fee_recipient: tx.gateway_fee_recipient,
                    gateway_fee: tx.gateway_fee,
                }),
                ..Self::default()
            },
        }
    }
}

impl TransactionT for TypedTransaction {
    fn encode(&self, signature: Option<&Signature>) -> Result<Bytes, Error> {
        dispatch!(self, tx => TransactionT::encode(tx, signature))
    }

    fn sighash<H: Hasher>(&self) -> Result<H256, Error> {
        dispatch!(self, tx => TransactionT::sighash::<H>(tx))
    }

    fn compute_tx_hash<H: Hasher>(&self, signature: &Signature) -> Result<H256, Error> {
        dispatch!(self, tx => TransactionT::compute_tx_hash::<H>(tx, signature))
    }

    fn tx_type(&self) -> TxType {
        dispatch!(self, tx => TransactionT::tx_type(tx))
    }

    fn chain_id(&self) -> Option<u64> {
        dispatch!(self, tx => TransactionT::chain_id(tx))
    }

    fn nonce(&self) -> u64 {
        dispatch!(self, tx => TransactionT::nonce(tx))
    }

    fn gas_price(&self) -> GasPrice {
        dispatch!(self, tx => TransactionT::gas_price(tx))
    }

    fn gas_limit(&self) -> u64 {
        dispatch!(self, tx => TransactionT::gas_limit(tx))
    }

    fn to(&self) -> Option<Address> {
        dispatch!(self, tx => TransactionT::to(tx))
    }

    fn value(&self) -> U256 {
        dispatch!(self, tx => TransactionT::value(tx))
    }

    fn data(&self) -> &[u8] {
        dispatch!(self, tx => TransactionT::data(tx))
    }

    fn access_list(&self) -> Option<&AccessList> {
        dispatch!(self, tx => TransactionT::access_list(tx))
    }
}

#[cfg(test)]
mod tests {
    use super::TypedTransaction;
    use crate::{
        error::{CursorError, Error, RlpError},
        eth_hash::Address,
        transactions::{
            eip1559::tests::build_eip1559,
            eip2930::tests::build_eip2930,
            legacy::tests::build_legacy,
            request::{ChainExtension, TransactionRequest},
            tx_type::{TxType, TypeRegistry},
            TransactionT,
        },
    };
    use hex_literal::hex;
    use primitive_types::U256;

    #[test]
    fn decode_dispatches_on_first_byte() {
        let samples: [(TypedTransaction, _); 3] = [
            (build_legacy().0.into(), build_legacy().1),
            (build_eip2930().0.into(), build_eip2930().1),
            (build_eip1559().0.into(), build_eip1559().1),
        ];
        for (tx, signature) in samples {
            let encoded = tx.encode(Some(&signature)).unwrap();
            let decoded = TypedTransaction::decode(&encoded, TypeRegistry::all()).unwrap();
            assert_eq!(decoded, (tx, Some(signature)));
        }
    }

    #[test]
    fn empty_input_is_an_underrun() {
        assert_eq!(
            TypedTransaction::decode(&[], TypeRegistry::all()),
            Err(Error::Rlp(RlpError::Cursor(CursorError::Underrun {
                position: 0,
                requested: 1,
                length: 0,
            })))
        );
    }

    #[test]
    fn registry_gates_decoding() {
        assert_eq!(
            TypedTransaction::decode(&hex!("05c0"), TypeRegistry::all()),
            Err(Error::UnsupportedTransactionType(0x05))
        );
        let deposit = hex!("7ef83ca018040f35752170c3339ddcd850f185c9cc46bdef4d6e1f2ab323f4d3d710431994977f82a600a1414e583f7f13623f1ac5d58b1c0b808080808080");
        assert!(TypedTransaction::decode(&deposit, TypeRegistry::OP_STACK).is_ok());
        assert_eq!(
            TypedTransaction::decode(&deposit, TypeRegistry::ETHEREUM),
            Err(Error::UnsupportedTransactionType(0x7e))
        );
        assert_eq!(
            TypedTransaction::decode(
                &hex!("c6808080808080"),
                TypeRegistry::all().without(TxType::Legacy)
            ),
            Err(Error::TransactionTypeNotEnabled(TxType::Legacy))
        );
    }

    #[test]
    fn parsed_transactions_are_validated() {
        // eip1559 with chain id zero
        let (mut tx, _, _) = build_eip1559();
        tx.chain_id = 0;
        let mut raw = vec![0x02];
        let items = crate::rlp_utils::RlpEncodableTransaction::rlp_items(&tx, None).unwrap();
        raw.extend_from_slice(&crate::rlp::encode(&crate::rlp::RlpValue::List(items)).unwrap());
        assert_eq!(
            TypedTransaction::decode(&raw, TypeRegistry::all()),
            Err(Error::InvalidChainId(0))
        );
    }

    #[test]
    fn request_round_trip() {
        let samples: [TypedTransaction; 3] =
            [build_legacy().0.into(), build_eip2930().0.into(), build_eip1559().0.into()];
        for tx in samples {
            let request = TransactionRequest::from(tx.clone());
            assert_eq!(request.tx_type, Some(tx.tx_type()));
            assert_eq!(TxType::infer(&request), tx.tx_type());
            assert_eq!(TypedTransaction::try_from_request(&request, tx.tx_type()), Ok(tx));
        }
    }

    #[test]
    fn absent_fees_are_zero() {
        let request = TransactionRequest {
            chain_id: Some(1),
            max_fee_per_gas: Some(U256::from(10)),
            ..Default::default()
        };
        let Ok(TypedTransaction::Eip1559(tx)) =
            TypedTransaction::try_from_request(&request, TxType::Eip1559)
        else {
            panic!("expected an eip1559 transaction");
        };
        assert_eq!(tx.max_priority_fee_per_gas, U256::zero());
        assert_eq!(tx.max_fee_per_gas, U256::from(10));
    }

    #[test]
    fn explicit_type_must_fit_the_request() {
        let request = TransactionRequest {
            chain_id: Some(10),
            gas_price: Some(U256::one()),
            extension: Some(ChainExtension::Celo { fee_currency: Address::zero() }),
            ..Default::default()
        };
        assert_eq!(
            TypedTransaction::try_from_request(&request, TxType::Deposit),
            Err(Error::InvalidTransactionType {
                tx_type: TxType::Deposit,
                fields: vec!["chainId", "gasPrice", "feeCurrency", "sourceHash"],
            })
        );
    }
}
