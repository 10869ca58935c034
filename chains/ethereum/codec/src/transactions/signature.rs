#[cfg(feature = "serde")]
use crate::serde_utils::uint_to_hex;
use primitive_types::U256;

/// An ECDSA signature, produced by an external [`crate::crypto::Signer`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with-codec", derive(scale_info::TypeInfo))]
#[cfg_attr(feature = "with-codec", derive(parity_scale_codec::Encode, parity_scale_codec::Decode))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Signature {
    /// The ECDSA recovery id, this value encodes the parity of the y-coordinate of the secp256k1
    /// signature. May also encode the chain_id for legacy EIP-155 transactions.
    pub v: RecoveryId,
    /// The ECDSA signature r
    pub r: U256,
    /// The ECDSA signature s
    pub s: U256,
}

impl Signature {
    /// Signature with a y parity recovery id, as carried by every typed transaction.
    #[must_use]
    pub const fn with_y_parity(y_parity: bool, r: U256, s: U256) -> Self {
        Self { v: RecoveryId::new(y_parity as u64), r, s }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.r.is_zero() && self.s.is_zero()
    }
}

/// The ECDSA recovery id, encodes the parity of the y-coordinate and for EIP-155 compatible
/// transactions also encodes the chain id
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with-codec", derive(scale_info::TypeInfo))]
#[cfg_attr(feature = "with-codec", derive(parity_scale_codec::Encode, parity_scale_codec::Decode))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct RecoveryId(#[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))] u64);

impl RecoveryId {
    #[must_use]
    pub const fn new(v: u64) -> Self {
        Self(v)
    }

    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the parity (0 for even, 1 for odd) of the y-value of a secp256k1 signature.
    #[must_use]
    pub const fn y_parity(self) -> u64 {
        let v = self.as_u64();

        // if v is greather or equal to 35, it is an EIP-155 signature
        // [EIP-155]: https://eips.ethereum.org/EIPS/eip-155
        if v >= 35 {
            return (v - 35) & 1;
        }

        // 27 or 28, it is a legacy signature
        if v == 27 || v == 28 {
            return v - 27;
        }

        // otherwise, simply return the parity of the least significant bit
        v & 1
    }

    #[must_use]
    pub const fn chain_id(self) -> Option<u64> {
        let v = self.as_u64();
        if v >= 35 {
            Some((v - 35) >> 1)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn is_eip155(self) -> bool {
        self.chain_id().is_some()
    }

    /// Applies [EIP155](https://github.com/ethereum/EIPs/blob/master/EIPS/eip-155.md), `None`
    /// if `v` doesn't fit in a `u64`.
    #[must_use]
    pub const fn as_eip155(self, chain_id: u64) -> Option<u64> {
        match chain_id.checked_mul(2) {
            Some(doubled) => doubled.checked_add(35 + self.y_parity()),
            None => None,
        }
    }

    /// Returns the pre EIP-155 `v`, 27 or 28.
    #[must_use]
    pub const fn as_legacy(self) -> u64 {
        self.y_parity() + 27
    }
}

impl From<RecoveryId> for u64 {
    fn from(v: RecoveryId) -> Self {
        v.as_u64()
    }
}

impl From<u64> for RecoveryId {
    fn from(v: u64) -> Self {
        Self::new(v)
    }
}

#[cfg(test)]
mod tests {
    use super::RecoveryId;

    #[test]
    fn recovery_id_conversions() {
        let v = RecoveryId::new(0x26);
        assert_eq!(v.y_parity(), 1);
        assert_eq!(v.chain_id(), Some(1));
        assert_eq!(v.as_legacy(), 28);
        assert_eq!(v.as_eip155(137), Some(310));

        let v = RecoveryId::new(27);
        assert_eq!(v.y_parity(), 0);
        assert!(!v.is_eip155());
        assert_eq!(v.as_eip155(1), Some(37));

        assert_eq!(RecoveryId::new(1).y_parity(), 1);
        assert_eq!(RecoveryId::new(1).as_legacy(), 28);
    }

    #[test]
    fn eip155_v_overflow() {
        let largest = (u64::MAX - 37) / 2;
        assert_eq!(RecoveryId::new(1).as_eip155(largest), Some(u64::MAX - 1));
        assert_eq!(RecoveryId::new(0).as_eip155(largest + 1), Some(u64::MAX));
        assert_eq!(RecoveryId::new(1).as_eip155(largest + 1), None);
        assert_eq!(RecoveryId::new(0).as_eip155(u64::MAX / 2 + 1), None);
    }
}
