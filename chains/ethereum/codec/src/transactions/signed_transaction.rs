use derivative::Derivative;

use super::{
    access_list::AccessList,
    signature::Signature,
    tx_type::{TxType, TypeRegistry},
    typed_transaction::TypedTransaction,
    GasPrice, TransactionT,
};
use crate::{
    bytes::Bytes,
    crypto::{DefaultCrypto, Hasher, Signer},
    error::Error,
    eth_hash::{Address, TxHash, H256},
    rstd::vec::Vec,
};
use primitive_types::U256;

#[cfg_attr(
    feature = "with-codec",
    derive(parity_scale_codec::Encode, parity_scale_codec::Decode, scale_info::TypeInfo),
    codec(dumb_trait_bound)
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Derivative)]
#[derivative(Clone, PartialEq, Eq, Debug)]
pub struct SignedTransaction<T> {
    #[cfg_attr(feature = "serde", serde(rename = "hash"))]
    pub tx_hash: TxHash,
    #[cfg_attr(
        feature = "serde",
        serde(bound = "T: serde::Serialize + serde::de::DeserializeOwned", flatten)
    )]
    pub payload: T,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub signature: Signature,
}

impl<T> SignedTransaction<T>
where
    T: TransactionT,
{
    /// # Errors
    /// Returns `Err` if the payload can't be encoded with `signature`.
    pub fn new(payload: T, signature: Signature) -> Result<Self, Error> {
        let tx_hash = payload.compute_tx_hash::<DefaultCrypto>(&signature)?;
        Ok(Self { tx_hash, payload, signature })
    }

    /// Signs the payload sighash with an external signer.
    ///
    /// # Errors
    /// Returns `Err` if the payload is invalid or the signer fails.
    pub fn sign<S>(payload: T, signer: &S) -> Result<Self, S::Error>
    where
        S: Signer,
        S::Error: From<Error>,
    {
        let sighash = payload.sighash::<DefaultCrypto>()?;
        let signature = signer.sign_prehash(sighash, payload.chain_id())?;
        Ok(Self::new(payload, signature)?)
    }

    /// # Errors
    /// Same as [`TransactionT::encode`].
    pub fn encode_signed(&self) -> Result<Bytes, Error> {
        self.payload.encode(Some(&self.signature))
    }
}

impl SignedTransaction<TypedTransaction> {
    /// Parses a signed envelope, unsigned envelopes are rejected.
    ///
    /// # Errors
    /// Returns `Err` if the envelope is invalid or carries no signature.
    pub fn decode(raw: &[u8], registry: TypeRegistry) -> Result<Self, Error> {
        let (payload, signature) = TypedTransaction::decode(raw, registry)?;
        let Some(signature) = signature else {
            let tx_type = payload.tx_type();
            let fields = tx_type.fields();
            let missing = match tx_type {
                TxType::Deposit => {
                    return Err(Error::InvalidTransactionType {
                        tx_type,
                        fields: Vec::from(["signature"]),
                    })
                },
                TxType::Eip712 => &fields[7..10],
                _ => &fields[tx_type.unsigned_len()..],
            };
            return Err(Error::InvalidSerializedTransaction {
                tx_type,
                missing: missing.to_vec(),
                extra: 0,
            });
        };
        Self::new(payload, signature)
    }
}

impl<T> TransactionT for SignedTransaction<T>
where
    T: TransactionT,
{
    fn encode(&self, signature: Option<&Signature>) -> Result<Bytes, Error> {
        self.payload.encode(signature)
    }
    fn sighash<H: Hasher>(&self) -> Result<H256, Error> {
        self.payload.sighash::<H>()
    }
    fn compute_tx_hash<H: Hasher>(&self, signature: &Signature) -> Result<H256, Error> {
        self.payload.compute_tx_hash::<H>(signature)
    }
    fn tx_type(&self) -> TxType {
        self.payload.tx_type()
    }
    fn chain_id(&self) -> Option<u64> {
        self.payload.chain_id()
    }
    fn nonce(&self) -> u64 {
        self.payload.nonce()
    }
    fn gas_price(&self) -> GasPrice {
        self.payload.gas_price()
    }
    fn gas_limit(&self) -> u64 {
        self.payload.gas_limit()
    }
    fn to(&self) -> Option<Address> {
        self.payload.to()
    }
    fn value(&self) -> U256 {
        self.payload.value()
    }
    fn data(&self) -> &[u8] {
        self.payload.data()
    }
    fn access_list(&self) -> Option<&AccessList> {
        self.payload.access_list()
    }
}

#[cfg(test)]
mod tests {
    use super::SignedTransaction;
    use crate::{
        crypto::{DefaultCrypto, Signer},
        error::Error,
        eth_hash::H256,
        transactions::{
            eip2930::tests::build_eip2930,
            signature::Signature,
            tx_type::{TxType, TypeRegistry},
            TransactionT, TypedTransaction,
        },
    };
    use core::cell::Cell;
    use hex_literal::hex;

    struct MockSigner {
        signature: Signature,
        prehash: Cell<Option<(H256, Option<u64>)>>,
    }

    impl Signer for MockSigner {
        type Error = Error;

        fn sign_prehash(&self, prehash: H256, chain_id: Option<u64>) -> Result<Signature, Error> {
            self.prehash.set(Some((prehash, chain_id)));
            Ok(self.signature)
        }
    }

    #[test]
    fn tx_hash_works() {
        let (tx, signature) = build_eip2930();
        let signed_tx = SignedTransaction::new(tx, signature).unwrap();
        assert_eq!(
            signed_tx.tx_hash,
            H256(hex!("a777326ad77731344d00263b06843be6ef05cbe9ab699e2ed0d1448f8b2b50a3"))
        );
    }

    #[test]
    fn sign_uses_the_sighash() {
        let (tx, signature) = build_eip2930();
        let signer = MockSigner { signature, prehash: Cell::new(None) };
        let signed_tx = SignedTransaction::sign(tx.clone(), &signer).unwrap();
        assert_eq!(signer.prehash.get(), Some((tx.sighash::<DefaultCrypto>().unwrap(), Some(1))));
        assert_eq!(signed_tx, SignedTransaction::new(tx, signature).unwrap());
    }

    #[test]
    fn decode_requires_a_signature() {
        let (tx, signature) = build_eip2930();
        let typed = TypedTransaction::from(tx);
        let raw = typed.encode(Some(&signature)).unwrap();
        let signed_tx = SignedTransaction::decode(&raw, TypeRegistry::all()).unwrap();
        assert_eq!(signed_tx.signature, signature);
        assert_eq!(signed_tx.encode_signed().unwrap(), raw);

        let raw = typed.encode(None).unwrap();
        assert_eq!(
            SignedTransaction::decode(&raw, TypeRegistry::all()),
            Err(Error::InvalidSerializedTransaction {
                tx_type: TxType::Eip2930,
                missing: vec!["yParity", "r", "s"],
                extra: 0,
            })
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let (tx, signature) = build_eip2930();
        let signed_tx = SignedTransaction::new(tx, signature).unwrap();
        let json = serde_json::to_value(&signed_tx).unwrap();
        assert_eq!(
            json["hash"],
            "0xa777326ad77731344d00263b06843be6ef05cbe9ab699e2ed0d1448f8b2b50a3"
        );
        assert_eq!(json["v"], "0x1");
        let decoded = serde_json::from_value::<SignedTransaction<_>>(json).unwrap();
        assert_eq!(signed_tx, decoded);
    }
}
