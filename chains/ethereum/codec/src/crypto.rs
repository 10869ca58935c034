pub use crate::{eth_hash::H256, transactions::signature::Signature};
use core::convert::AsRef;

/// Hash function used to compute transaction and signing hashes.
pub trait Hasher {
    fn keccak256_to(data: impl AsRef<[u8]>, output: &mut [u8; 32]);

    fn keccak256(data: impl AsRef<[u8]>) -> H256 {
        let mut hash = [0u8; 32];
        Self::keccak256_to(data, &mut hash);
        hash.into()
    }
}

/// Produces signatures over transaction signing hashes, the codec never signs by itself.
pub trait Signer {
    type Error;

    /// Attempt to sign the given message digest, returning a digital signature
    /// on success, or an error if something went wrong.
    ///
    /// For legacy transactions with a `chain_id`, the returned `v` must already follow
    /// [EIP-155](https://eips.ethereum.org/EIPS/eip-155).
    ///
    /// # Errors
    /// Returns `Err` if the message can't be signed.
    fn sign_prehash(&self, prehash: H256, chain_id: Option<u64>) -> Result<Signature, Self::Error>;
}

#[cfg(feature = "with-crypto")]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DefaultCrypto;

#[cfg(feature = "with-crypto")]
impl Hasher for DefaultCrypto {
    fn keccak256_to(data: impl AsRef<[u8]>, output: &mut [u8; 32]) {
        use sha3::Digest;
        let mut hasher = sha3::Keccak256::new();
        hasher.update(data);
        hasher.finalize_into(output.into());
    }

    fn keccak256(data: impl AsRef<[u8]>) -> H256 {
        use sha3::Digest;
        let hash: [u8; 32] = sha3::Keccak256::digest(data).into();
        hash.into()
    }
}

#[cfg(all(test, feature = "with-crypto"))]
mod tests {
    use super::{DefaultCrypto, Hasher, H256};
    use hex_literal::hex;

    #[test]
    fn keccak256_works() {
        let expected =
            H256(hex!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"));
        assert_eq!(DefaultCrypto::keccak256(b""), expected);

        let mut output = [0u8; 32];
        DefaultCrypto::keccak256_to(b"hello", &mut output);
        assert_eq!(
            output,
            hex!("1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8")
        );
    }
}
