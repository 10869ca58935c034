use crate::{
    error::FieldError,
    eth_hash::{Address, H256},
    rlp::RlpValue,
    rlp_utils::{Decodable, Encodable},
    rstd::vec::Vec,
};

/// [EIP-2930](https://eips.ethereum.org/EIPS/eip-2930) access list
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
pub struct AccessList(pub Vec<AccessListItem>);

impl AccessList {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<AccessListItem>> for AccessList {
    fn from(src: Vec<AccessListItem>) -> Self {
        Self(src)
    }
}

/// Access list item
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
pub struct AccessListItem {
    /// Accessed address
    pub address: Address,
    /// Accessed storage keys
    pub storage_keys: Vec<H256>,
}

impl Encodable for AccessListItem {
    fn rlp_value(&self) -> RlpValue {
        RlpValue::List(Vec::from([self.address.rlp_value(), self.storage_keys.rlp_value()]))
    }
}

impl Decodable for AccessListItem {
    fn rlp_decode(value: &RlpValue) -> Result<Self, FieldError> {
        match value.as_list() {
            Some([address, storage_keys]) => Ok(Self {
                address: Address::rlp_decode(address)?,
                storage_keys: Vec::rlp_decode(storage_keys)?,
            }),
            Some(items) => Err(FieldError::InvalidLength { expected: 2, actual: items.len() }),
            None => Err(FieldError::ExpectedList),
        }
    }
}

impl Encodable for AccessList {
    fn rlp_value(&self) -> RlpValue {
        self.0.rlp_value()
    }
}

impl Decodable for AccessList {
    fn rlp_decode(value: &RlpValue) -> Result<Self, FieldError> {
        Vec::rlp_decode(value).map(Self)
    }
}
