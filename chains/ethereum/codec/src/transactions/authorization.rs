#[cfg(feature = "serde")]
use crate::serde_utils::uint_to_hex;
use crate::{
    error::{Error, FieldError},
    eth_hash::Address,
    rlp::RlpValue,
    rlp_utils::{Decodable, Encodable},
    rstd::vec::Vec,
    transactions::signature::{RecoveryId, Signature},
};
use primitive_types::U256;

/// An [EIP-7702](https://eips.ethereum.org/EIPS/eip-7702) authorization, delegates the code of
/// the signer account to `address`.
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
pub struct Authorization {
    /// Chain the authorization is valid on, zero means any chain.
    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub chain_id: u64,
    /// Contract the account delegates to.
    pub address: Address,
    #[cfg_attr(feature = "serde", serde(with = "uint_to_hex"))]
    pub nonce: u64,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub signature: Option<Signature>,
}

impl Authorization {
    fn try_rlp_value(&self, index: usize) -> Result<RlpValue, Error> {
        let Some(signature) = self.signature.as_ref() else {
            return Err(Error::UnsignedAuthorization(index));
        };
        Ok(RlpValue::List(Vec::from([
            self.chain_id.rlp_value(),
            self.address.rlp_value(),
            self.nonce.rlp_value(),
            signature.v.y_parity().rlp_value(),
            signature.r.rlp_value(),
            signature.s.rlp_value(),
        ])))
    }
}

impl Decodable for Authorization {
    fn rlp_decode(value: &RlpValue) -> Result<Self, FieldError> {
        let items = value.as_list().ok_or(FieldError::ExpectedList)?;
        let [chain_id, address, nonce, y_parity, r, s] = items else {
            return Err(FieldError::InvalidLength { expected: 6, actual: items.len() });
        };
        let y_parity = u64::rlp_decode(y_parity)?;
        if y_parity > 1 {
            return Err(FieldError::InvalidYParity);
        }
        Ok(Self {
            chain_id: u64::rlp_decode(chain_id)?,
            address: Address::rlp_decode(address)?,
            nonce: u64::rlp_decode(nonce)?,
            signature: Some(Signature {
                v: RecoveryId::new(y_parity),
                r: U256::rlp_decode(r)?,
                s: U256::rlp_decode(s)?,
            }),
        })
    }
}

#[derive(Clone, Default, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(
    feature = "with-codec",
    derive(parity_scale_codec::Encode, parity_scale_codec::Decode, scale_info::TypeInfo)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuthorizationList(pub Vec<Authorization>);

impl AuthorizationList {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowers the list, every authorization must be signed.
    ///
    /// # Errors
    /// Returns [`Error::UnsignedAuthorization`] with the index of the first unsigned entry.
    pub fn try_rlp_value(&self) -> Result<RlpValue, Error> {
        self.0
            .iter()
            .enumerate()
            .map(|(index, authorization)| authorization.try_rlp_value(index))
            .collect::<Result<Vec<_>, _>>()
            .map(RlpValue::List)
    }
}

impl From<Vec<Authorization>> for AuthorizationList {
    fn from(src: Vec<Authorization>) -> Self {
        Self(src)
    }
}

impl Decodable for AuthorizationList {
    fn rlp_decode(value: &RlpValue) -> Result<Self, FieldError> {
        Vec::rlp_decode(value).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::{Authorization, AuthorizationList};
    use crate::{
        error::{Error, FieldError},
        eth_hash::Address,
        rlp::{self, RlpValue},
        rlp_utils::Decodable,
        transactions::signature::Signature,
    };
    use hex_literal::hex;
    use primitive_types::U256;

    const R: [u8; 32] = hex!("60fdd29ff912ce880cd3edaf9f932dc61d3dae823ea77e0323f94adb9f6a72fe");

    fn authorization() -> Authorization {
        Authorization {
            chain_id: 1,
            address: Address::from(hex!("fba3912ca04dd458c843e2ee08967fc04f3579c2")),
            nonce: 420,
            signature: Some(Signature::with_y_parity(false, U256::from(R), U256::from(R))),
        }
    }

    #[test]
    fn rlp_layout() {
        let list = AuthorizationList(vec![authorization()]);
        let value = list.try_rlp_value().unwrap();
        let expected = hex!("f85ef85c0194fba3912ca04dd458c843e2ee08967fc04f3579c28201a480a060fdd29ff912ce880cd3edaf9f932dc61d3dae823ea77e0323f94adb9f6a72fea060fdd29ff912ce880cd3edaf9f932dc61d3dae823ea77e0323f94adb9f6a72fe");
        assert_eq!(rlp::encode(&value).unwrap(), expected);
        assert_eq!(AuthorizationList::rlp_decode(&value), Ok(list));
    }

    #[test]
    fn unsigned_authorization_is_rejected() {
        let unsigned = Authorization { signature: None, ..authorization() };
        let list = AuthorizationList(vec![authorization(), unsigned]);
        assert_eq!(list.try_rlp_value(), Err(Error::UnsignedAuthorization(1)));
    }

    #[test]
    fn rejects_malformed_items() {
        let value = RlpValue::List(vec![RlpValue::List(vec![RlpValue::empty(); 5])]);
        assert_eq!(
            AuthorizationList::rlp_decode(&value),
            Err(FieldError::InvalidLength { expected: 6, actual: 5 })
        );

        let mut items = vec![RlpValue::empty(); 6];
        items[1] = RlpValue::from(&[0u8; 20][..]);
        items[3] = RlpValue::from(&[0x02u8][..]);
        let value = RlpValue::List(vec![RlpValue::List(items)]);
        assert_eq!(AuthorizationList::rlp_decode(&value), Err(FieldError::InvalidYParity));
    }
}
