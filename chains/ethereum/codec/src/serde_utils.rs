use crate::rstd::result::Result;
use impl_serde_macro::serialize::{deserialize_check_len, serialize_uint, ExpectedLen};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// serde functions for converting `u64` to and from hexadecimal string
pub mod uint_to_hex {
    use super::{DeserializableNumber, SerializableNumber};
    use serde::{Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    /// # Errors
    /// Returns `Err` if the value cannot be encoded as bytes
    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: SerializableNumber + core::fmt::Debug,
        S: Serializer,
    {
        T::serialize_eth_uint(value, serializer)
    }

    /// # Errors
    /// Returns `Err` source is not a valid hexadecimal string
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: DeserializableNumber<'de>,
        D: Deserializer<'de>,
    {
        T::deserialize_eth_uint(deserializer)
    }
}

/// Serialize a primitive uint as hexadecimal string, must be used with `#[serde(with =
/// "uint_to_hex")]` attribute
pub trait SerializableNumber {
    /// # Errors
    /// should never fails
    fn serialize_eth_uint<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer;
}

impl<T> SerializableNumber for Option<T>
where
    T: SerializableNumber,
{
    fn serialize_eth_uint<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wrapped = self.as_ref().map(SerializeWrapper);
        <Option<SerializeWrapper<T>> as Serialize>::serialize(&wrapped, serializer)
    }
}

pub trait DeserializableNumber<'de>: Sized {
    /// Deserialize a primitive uint from hexadecimal string
    /// # Errors
    /// Returns `Err` if the string is not a `0x` prefixed hexadecimal number
    fn deserialize_eth_uint<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>;
}

impl<'de, T> DeserializableNumber<'de> for Option<T>
where
    T: DeserializableNumber<'de>,
{
    fn deserialize_eth_uint<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wrapped =
            <Option<DeserializeWrapper<T>> as Deserialize<'de>>::deserialize(deserializer)?;
        Ok(wrapped.map(|wrapped| wrapped.0))
    }
}

/// Helper for deserializing optional uints from hexadecimal string
struct DeserializeWrapper<T>(T);

impl<'de, T> Deserialize<'de> for DeserializeWrapper<T>
where
    T: DeserializableNumber<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        <T as DeserializableNumber<'de>>::deserialize_eth_uint(deserializer).map(Self)
    }
}

/// Helper for serializing optional uints to hexadecimal string
struct SerializeWrapper<'a, T>(&'a T);

impl<'a, T> Serialize for SerializeWrapper<'a, T>
where
    T: SerializableNumber,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        <T as SerializableNumber>::serialize_eth_uint(self.0, serializer)
    }
}

macro_rules! impl_serialize_uint {
    ($name: ident) => {
        impl SerializableNumber for $name {
            fn serialize_eth_uint<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                const LEN: usize = $name::BITS as usize;

                let mut slice = [0u8; 2 + 2 * LEN];
                let bytes = self.to_be_bytes();
                serialize_uint(&mut slice, &bytes, serializer)
            }
        }

        impl<'de> DeserializableNumber<'de> for $name {
            fn deserialize_eth_uint<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                const LEN: usize = $name::BITS as usize;
                let mut bytes = [0u8; LEN / 8];
                let wrote =
                    deserialize_check_len(deserializer, ExpectedLen::Between(0, &mut bytes))?;
                if wrote == 0 {
                    return Ok(0);
                }
                Ok($name::from_be_bytes(bytes) >> (LEN - (wrote * 8)))
            }
        }
    };
}

impl_serialize_uint!(u64);

#[cfg(test)]
mod tests {
    use super::uint_to_hex;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    struct Numbers {
        #[serde(with = "uint_to_hex")]
        nonce: u64,
        #[serde(with = "uint_to_hex")]
        chain_id: Option<u64>,
    }

    #[test]
    fn u64_as_hex_string() {
        let numbers = Numbers { nonce: 0x0311, chain_id: Some(1) };
        let json = serde_json::to_string(&numbers).unwrap();
        assert_eq!(json, r#"{"nonce":"0x311","chain_id":"0x1"}"#);
        assert_eq!(serde_json::from_str::<Numbers>(&json).unwrap(), numbers);

        let numbers = Numbers { nonce: 0, chain_id: None };
        let json = serde_json::to_string(&numbers).unwrap();
        assert_eq!(json, r#"{"nonce":"0x0","chain_id":null}"#);
        assert_eq!(serde_json::from_str::<Numbers>(&json).unwrap(), numbers);
    }
}
