use crate::{
    bytes::Bytes,
    error::{Error, FieldError},
    rlp::RlpValue,
    rlp_utils::{Decodable, Encodable},
    rstd::vec::Vec,
};

/// Size of a KZG commitment and of a KZG proof.
pub const KZG_BYTES: usize = 48;

/// A blob with its KZG commitment and proof, only carried by the network form of an
/// [EIP-4844](https://eips.ethereum.org/EIPS/eip-4844) transaction.
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
pub struct BlobSidecar {
    pub blob: Bytes,
    pub commitment: Bytes,
    pub proof: Bytes,
}

#[derive(Clone, Default, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(
    feature = "with-codec",
    derive(parity_scale_codec::Encode, parity_scale_codec::Decode, scale_info::TypeInfo)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlobSidecars(pub Vec<BlobSidecar>);

impl BlobSidecars {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// # Errors
    /// Returns `Err` if a commitment or a proof is not 48 bytes long.
    pub fn validate(&self) -> Result<(), Error> {
        for sidecar in &self.0 {
            check_kzg_len("commitments", &sidecar.commitment)?;
            check_kzg_len("proofs", &sidecar.proof)?;
        }
        Ok(())
    }

    /// The `blobs`, `commitments` and `proofs` lists of the network wrapper.
    #[must_use]
    pub fn rlp_values(&self) -> [RlpValue; 3] {
        [
            self.column(|sidecar| &sidecar.blob),
            self.column(|sidecar| &sidecar.commitment),
            self.column(|sidecar| &sidecar.proof),
        ]
    }

    fn column(&self, field: fn(&BlobSidecar) -> &Bytes) -> RlpValue {
        RlpValue::List(self.0.iter().map(|sidecar| field(sidecar).rlp_value()).collect())
    }

    /// Zips the three lists of the network wrapper back into sidecars.
    ///
    /// # Errors
    /// Returns `Err` if the lists have different lengths, or contain malformed items.
    pub fn from_rlp_values(
        blobs: &RlpValue,
        commitments: &RlpValue,
        proofs: &RlpValue,
    ) -> Result<Self, Error> {
        let decode = |field: &'static str, value: &RlpValue| {
            Vec::<Bytes>::rlp_decode(value).map_err(|reason| Error::invalid_field(field, reason))
        };
        let blobs = decode("blobs", blobs)?;
        let commitments = decode("commitments", commitments)?;
        let proofs = decode("proofs", proofs)?;
        if blobs.len() != commitments.len() || blobs.len() != proofs.len() {
            return Err(Error::InvalidSidecars {
                blobs: blobs.len(),
                commitments: commitments.len(),
                proofs: proofs.len(),
            });
        }
        let sidecars = Self(
            blobs
                .into_iter()
                .zip(commitments)
                .zip(proofs)
                .map(|((blob, commitment), proof)| BlobSidecar { blob, commitment, proof })
                .collect(),
        );
        sidecars.validate()?;
        Ok(sidecars)
    }
}

fn check_kzg_len(field: &'static str, bytes: &Bytes) -> Result<(), Error> {
    if bytes.len() == KZG_BYTES {
        Ok(())
    } else {
        Err(Error::invalid_field(
            field,
            FieldError::InvalidLength { expected: KZG_BYTES, actual: bytes.len() },
        ))
    }
}

impl From<Vec<BlobSidecar>> for BlobSidecars {
    fn from(src: Vec<BlobSidecar>) -> Self {
        Self(src)
    }
}
