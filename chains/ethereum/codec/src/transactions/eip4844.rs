use super::{
    access_list::AccessList, blob::BlobSidecars, check_chain_id, check_fee_cap,
    signature::Signature, tx_type::TxType, GasPrice, TransactionT,
};
use crate::{
    bytes::Bytes,
    crypto::Hasher,
    error::Error,
    eth_hash::{Address, H256},
    rlp::RlpValue,
    rlp_utils::{
        encode_envelope, FieldDecoder, RlpDecodableTransaction, RlpEncodableTransaction,
        RlpListBuilder,
    },
    rstd::vec::Vec,
};
use primitive_types::U256;

#[cfg(feature = "serde")]
use crate::serde_utils::uint_to_hex;

/// Version byte of KZG versioned hashes.
pub const VERSIONED_HASH_VERSION_KZG: u8 = 0x01;

const WRAPPER_FIELDS: [&str; 4] = ["transaction", "blobs", "commitments", "proofs"];

/// Transactions with type 0x3 are blob-carrying transactions introduced in EIP-4844, they commit
/// to blobs by their versioned hashes. The blobs themselves, with their KZG commitments and proofs,
/// only travel in the network form `[tx, blobs, commitments, proofs]`, which is emitted whenever
/// sidecars are set. Hashes are always computed over the bare transaction.
///
/// Blob transactions can't create contracts, so the recipient is mandatory.
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
pub struct Eip4844Transaction {
    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub chain_id: u64,

    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub nonce: u64,

    pub max_priority_fee_per_gas: U256,

    pub max_fee_per_gas: U256,

    /// Supplied gas
    #[cfg_attr(feature = "serde", serde(rename = "gas", with = "uint_to_hex"))]
    pub gas_limit: u64,

    pub to: Address,

    pub value: U256,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Bytes::is_empty"))]
    pub data: Bytes,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "AccessList::is_empty"))]
    pub access_list: AccessList,

    /// Maximum fee per unit of blob gas.
    pub max_fee_per_blob_gas: U256,

    /// Versioned hashes of the blobs, `0x01 || sha256(commitment)[1..]`.
    pub blob_versioned_hashes: Vec<H256>,

    /// Blobs, commitments and proofs, part of the network form only.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub sidecars: Option<BlobSidecars>,
}

impl Eip4844Transaction {
    /// Encodes the unsigned transaction without its sidecars, which is the form the sighash
    /// commits to.
    ///
    /// # Errors
    /// Returns `Err` if the transaction fails validation.
    pub fn rlp_unsigned_canonical(&self) -> Result<Bytes, Error> {
        self.validate()?;
        let items = self.rlp_items(None)?;
        encode_envelope(TxType::Eip4844, &RlpValue::List(items))
    }

    /// Encodes the signed transaction without its sidecars, which is the form the
    /// transaction hash commits to.
    ///
    /// # Errors
    /// Returns `Err` if the transaction fails validation.
    pub fn rlp_signed_canonical(&self, signature: &Signature) -> Result<Bytes, Error> {
        self.validate()?;
        let items = self.rlp_items(Some(signature))?;
        encode_envelope(TxType::Eip4844, &RlpValue::List(items))
    }

    fn decode_flat(payload: &RlpValue) -> Result<(Self, Option<Signature>), Error> {
        let (fields, signed) = FieldDecoder::new(TxType::Eip4844, payload)?;
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
            max_fee_per_blob_gas: fields.decode(9)?,
            blob_versioned_hashes: fields.decode(10)?,
            sidecars: None,
        };
        let signature = if signed { Some(fields.y_parity_signature(11)?) } else { None };
        Ok((tx, signature))
    }
}

impl RlpEncodableTransaction for Eip4844Transaction {
    const TX_TYPE: TxType = TxType::Eip4844;

    fn validate(&self) -> Result<(), Error> {
        check_chain_id(self.chain_id)?;
        check_fee_cap(self.max_priority_fee_per_gas, self.max_fee_per_gas)?;
        if self.blob_versioned_hashes.is_empty() {
            return Err(Error::EmptyBlobHashes);
        }
        for (index, hash) in self.blob_versioned_hashes.iter().enumerate() {
            let version = hash[0];
            if version != VERSIONED_HASH_VERSION_KZG {
                return Err(Error::InvalidBlobHashVersion { index, version });
            }
        }
        self.sidecars.as_ref().map_or(Ok(()), BlobSidecars::validate)
    }

    fn rlp_items(&self, signature: Option<&Signature>) -> Result<Vec<RlpValue>, Error> {
        let mut builder = RlpListBuilder::with_capacity(14);
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
            .append(&self.max_fee_per_blob_gas)
            .append(&self.blob_versioned_hashes);
        if let Some(signature) = signature {
            builder.append_y_parity_signature(signature);
        }
        Ok(builder.finish())
    }

    /// Transactions with sidecars are wrapped in their network form, signed or not.
    fn rlp_payload(&self, signature: Option<&Signature>) -> Result<RlpValue, Error> {
        let tx = RlpValue::List(self.rlp_items(signature)?);
        match self.sidecars.as_ref() {
            Some(sidecars) => {
                let [blobs, commitments, proofs] = sidecars.rlp_values();
                Ok(RlpValue::List(Vec::from([tx, blobs, commitments, proofs])))
            },
            None => Ok(tx),
        }
    }
}

impl RlpDecodableTransaction for Eip4844Transaction {
    fn rlp_decode(payload: &RlpValue) -> Result<(Self, Option<Signature>), Error> {
        let items = payload.as_list().ok_or(Error::ExpectedList(TxType::Eip4844))?;

        // Network form, the first item is the transaction list itself
        if matches!(items.first(), Some(RlpValue::List(_))) {
            let [tx, blobs, commitments, proofs] = items else {
                return Err(Error::InvalidSerializedTransaction {
                    tx_type: TxType::Eip4844,
                    missing: WRAPPER_FIELDS.get(items.len()..).unwrap_or_default().to_vec(),
                    extra: items.len().saturating_sub(WRAPPER_FIELDS.len()),
                });
            };
            // the inner transaction is never wrapped again
            let (mut tx, signature) = Self::decode_flat(tx)?;
            tx.sidecars = Some(BlobSidecars::from_rlp_values(blobs, commitments, proofs)?);
            return Ok((tx, signature));
        }

        Self::decode_flat(payload)
    }
}

impl TransactionT for Eip4844Transaction {
    fn encode(&self, signature: Option<&Signature>) -> Result<Bytes, Error> {
        self.rlp_encode(signature)
    }

    fn sighash<H: Hasher>(&self) -> Result<H256, Error> {
        self.rlp_unsigned_canonical().map(H::keccak256)
    }

    fn compute_tx_hash<H: Hasher>(&self, signature: &Signature) -> Result<H256, Error> {
        self.rlp_signed_canonical(signature).map(H::keccak256)
    }

    fn tx_type(&self) -> TxType {
        TxType::Eip4844
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
