//! Entry point of the codec, binds the transaction dispatcher to a network configuration.
use crate::{
    bytes::Bytes,
    config::CodecConfig,
    error::Error,
    transactions::{
        request::TransactionRequest, signature::Signature, tx_type::TxType,
        typed_transaction::TypedTransaction, TransactionT,
    },
};

const LOG_TARGET: &str = "codec";

/// Serializes and parses transaction envelopes for a single network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionCodec {
    config: CodecConfig,
}

impl TransactionCodec {
    #[must_use]
    pub const fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    fn check_chain_id(&self, tx: &TypedTransaction) -> Result<(), Error> {
        match (self.config.chain_id, tx.chain_id()) {
            (Some(expected), Some(actual)) if expected != actual => {
                tracing::debug!(
                    target: LOG_TARGET,
                    "{} transaction bound to chain {}, {} expects {}",
                    tx.tx_type(),
                    actual,
                    self.config.network,
                    expected
                );
                Err(Error::ChainIdMismatch { expected, actual })
            },
            _ => Ok(()),
        }
    }

    /// Serializes `request` with its explicit type, or the type inferred from the fields it
    /// sets. The signature is appended when given.
    ///
    /// # Errors
    /// Returns `Err` if the type is not enabled, the request doesn't fit the type, a field
    /// value is invalid, or the transaction is bound to another chain.
    pub fn serialize(
        &self,
        request: &TransactionRequest,
        signature: Option<&Signature>,
    ) -> Result<Bytes, Error> {
        let tx_type = request.tx_type.unwrap_or_else(|| TxType::infer(request));
        self.config.registry.ensure_enabled(tx_type)?;
        let tx = TypedTransaction::try_from_request(request, tx_type)?;
        self.check_chain_id(&tx)?;
        tx.encode(signature)
    }

    /// Parses a serialized envelope into its transaction and optional signature.
    ///
    /// # Errors
    /// Returns `Err` if the envelope is not the canonical encoding of a valid transaction of
    /// an enabled type, or the transaction is bound to another chain.
    pub fn parse(&self, raw: &[u8]) -> Result<(TypedTransaction, Option<Signature>), Error> {
        let (tx, signature) = TypedTransaction::decode(raw, self.config.registry)?;
        self.check_chain_id(&tx)?;
        Ok((tx, signature))
    }
}
