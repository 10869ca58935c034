//! Conversions between transaction fields and [`RlpValue`]s.
//!
//! Integers are lowered to their minimal big-endian representation, so zero is the empty
//! byte-string, and lifting rejects anything the lowering wouldn't produce.
use crate::{
    bytes::Bytes,
    cursor::Cursor,
    error::{Error, FieldError},
    eth_hash::{H160, H256},
    rlp::{self, RlpValue},
    rstd::vec::Vec,
    transactions::{
        signature::{RecoveryId, Signature},
        tx_type::TxType,
    },
};
use primitive_types::U256;

const LOG_TARGET: &str = "rlp-utils";

pub trait Encodable {
    fn rlp_value(&self) -> RlpValue;
}

pub trait Decodable: Sized {
    /// # Errors
    /// Returns `Err` if `value` is not the canonical lowering of `Self`.
    fn rlp_decode(value: &RlpValue) -> Result<Self, FieldError>;
}

fn expect_bytes(value: &RlpValue) -> Result<&Bytes, FieldError> {
    value.as_bytes().ok_or(FieldError::ExpectedBytes)
}

fn expect_list(value: &RlpValue) -> Result<&[RlpValue], FieldError> {
    value.as_list().ok_or(FieldError::ExpectedList)
}

fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let zeros = bytes.iter().take_while(|byte| **byte == 0).count();
    &bytes[zeros..]
}

/// Validates a big-endian integer of at most `max_bytes` without leading zeros.
fn uint_bytes(value: &RlpValue, max_bytes: usize) -> Result<&[u8], FieldError> {
    let bytes = expect_bytes(value)?;
    if bytes.first() == Some(&0) {
        return Err(FieldError::LeadingZero);
    }
    if bytes.len() > max_bytes {
        return Err(FieldError::Overflow { max_bytes });
    }
    Ok(bytes.as_ref())
}

impl Encodable for u64 {
    fn rlp_value(&self) -> RlpValue {
        RlpValue::from(trim_leading_zeros(&self.to_be_bytes()))
    }
}

impl Decodable for u64 {
    fn rlp_decode(value: &RlpValue) -> Result<Self, FieldError> {
        let bytes = uint_bytes(value, 8)?;
        Ok(bytes.iter().fold(0, |acc, byte| (acc << 8) | Self::from(*byte)))
    }
}

impl Encodable for U256 {
    fn rlp_value(&self) -> RlpValue {
        let mut bytes = [0u8; 32];
        self.to_big_endian(&mut bytes);
        RlpValue::from(trim_leading_zeros(&bytes))
    }
}

impl Decodable for U256 {
    fn rlp_decode(value: &RlpValue) -> Result<Self, FieldError> {
        uint_bytes(value, 32).map(Self::from_big_endian)
    }
}

impl Encodable for bool {
    fn rlp_value(&self) -> RlpValue {
        u64::from(*self).rlp_value()
    }
}

impl Decodable for bool {
    fn rlp_decode(value: &RlpValue) -> Result<Self, FieldError> {
        match expect_bytes(value)?.as_ref() {
            [] => Ok(false),
            [1] => Ok(true),
            _ => Err(FieldError::InvalidBool),
        }
    }
}

macro_rules! impl_fixed_hash_rlp {
    ($hash: ident, $n_bytes: expr) => {
        impl Encodable for $hash {
            fn rlp_value(&self) -> RlpValue {
                RlpValue::from(self.as_bytes())
            }
        }

        impl Decodable for $hash {
            fn rlp_decode(value: &RlpValue) -> Result<Self, FieldError> {
                let bytes = expect_bytes(value)?;
                if bytes.len() != $n_bytes {
                    return Err(FieldError::InvalidLength {
                        expected: $n_bytes,
                        actual: bytes.len(),
                    });
                }
                Ok(Self::from_slice(bytes))
            }
        }
    };
}

impl_fixed_hash_rlp!(H160, 20);
impl_fixed_hash_rlp!(H256, 32);

impl Encodable for Bytes {
    fn rlp_value(&self) -> RlpValue {
        RlpValue::Bytes(self.clone())
    }
}

impl Decodable for Bytes {
    fn rlp_decode(value: &RlpValue) -> Result<Self, FieldError> {
        expect_bytes(value).cloned()
    }
}

/// `None` is the empty byte-string, used for the recipient of contract creations.
impl<T: Encodable> Encodable for Option<T> {
    fn rlp_value(&self) -> RlpValue {
        self.as_ref().map_or_else(RlpValue::empty, Encodable::rlp_value)
    }
}

impl<T: Decodable> Decodable for Option<T> {
    fn rlp_decode(value: &RlpValue) -> Result<Self, FieldError> {
        match value {
            RlpValue::Bytes(bytes) if bytes.is_empty() => Ok(None),
            value => T::rlp_decode(value).map(Some),
        }
    }
}

impl<T: Encodable> Encodable for Vec<T> {
    fn rlp_value(&self) -> RlpValue {
        RlpValue::List(self.iter().map(Encodable::rlp_value).collect())
    }
}

impl<T: Decodable> Decodable for Vec<T> {
    fn rlp_decode(value: &RlpValue) -> Result<Self, FieldError> {
        expect_list(value)?.iter().map(T::rlp_decode).collect()
    }
}

/// Builds the item list of a transaction in wire order.
#[derive(Debug, Default)]
pub struct RlpListBuilder {
    items: Vec<RlpValue>,
}

impl RlpListBuilder {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { items: Vec::with_capacity(capacity) }
    }

    pub fn append<E: Encodable + ?Sized>(&mut self, value: &E) -> &mut Self {
        self.items.push(value.rlp_value());
        self
    }

    pub fn append_raw(&mut self, value: RlpValue) -> &mut Self {
        self.items.push(value);
        self
    }

    pub fn append_empty(&mut self) -> &mut Self {
        self.items.push(RlpValue::empty());
        self
    }

    /// Appends `[yParity, r, s]`, used by every typed transaction.
    pub fn append_y_parity_signature(&mut self, signature: &Signature) -> &mut Self {
        self.append(&signature.v.y_parity()).append(&signature.r).append(&signature.s)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn finish(self) -> Vec<RlpValue> {
        self.items
    }

    #[must_use]
    pub fn into_value(self) -> RlpValue {
        RlpValue::List(self.items)
    }
}

/// Checks the number of decoded items against the layouts of `tx_type`.
///
/// Returns `true` when the signature fields are present.
///
/// # Errors
/// Returns [`Error::InvalidSerializedTransaction`] naming every attribute that couldn't be
/// filled, extra trailing items are reported as a count.
pub fn check_field_count(tx_type: TxType, count: usize) -> Result<bool, Error> {
    let fields = tx_type.fields();
    let unsigned = tx_type.unsigned_len();
    if count == unsigned {
        return Ok(false);
    }
    if count == fields.len() {
        return Ok(true);
    }

    let missing = if count < unsigned {
        &fields[count..unsigned]
    } else {
        fields.get(count..).unwrap_or_default()
    };
    let extra = count.saturating_sub(fields.len());
    tracing::debug!(
        target: LOG_TARGET,
        "{} transaction has {} items, missing {:?}, extra {}",
        tx_type,
        count,
        missing,
        extra
    );
    Err(Error::InvalidSerializedTransaction { tx_type, missing: missing.to_vec(), extra })
}

/// Positional access to the items of a decoded transaction, errors carry the field name.
#[derive(Debug, Clone, Copy)]
pub struct FieldDecoder<'a> {
    tx_type: TxType,
    items: &'a [RlpValue],
}

impl<'a> FieldDecoder<'a> {
    /// Returns the decoder and whether the transaction carries a signature.
    ///
    /// # Errors
    /// Returns `Err` if the payload is not a list or has the wrong number of items.
    pub fn new(tx_type: TxType, payload: &'a RlpValue) -> Result<(Self, bool), Error> {
        let items = payload.as_list().ok_or(Error::ExpectedList(tx_type))?;
        let signed = check_field_count(tx_type, items.len())?;
        Ok((Self { tx_type, items }, signed))
    }

    fn field(&self, index: usize) -> &'static str {
        self.tx_type.fields().get(index).copied().unwrap_or("unknown")
    }

    /// # Errors
    /// Returns `Err` if the item at `index` is missing.
    pub fn value(&self, index: usize) -> Result<&'a RlpValue, Error> {
        self.items.get(index).ok_or_else(|| Error::InvalidSerializedTransaction {
            tx_type: self.tx_type,
            missing: Vec::from([self.field(index)]),
            extra: 0,
        })
    }

    /// # Errors
    /// Returns `Err` if the item at `index` is missing or not a canonical `T`.
    pub fn decode<T: Decodable>(&self, index: usize) -> Result<T, Error> {
        let value = self.value(index)?;
        T::rlp_decode(value).map_err(|reason| Error::invalid_field(self.field(index), reason))
    }

    /// Whether the item at `index` is the empty byte-string.
    #[must_use]
    pub fn is_empty_at(&self, index: usize) -> bool {
        matches!(self.items.get(index), Some(RlpValue::Bytes(bytes)) if bytes.is_empty())
    }

    /// Decodes `[yParity, r, s]` starting at `index`.
    ///
    /// # Errors
    /// Returns `Err` if the y parity is not 0 or 1, or `r` and `s` are not canonical integers.
    pub fn y_parity_signature(&self, index: usize) -> Result<Signature, Error> {
        let y_parity = self.decode::<u64>(index)?;
        if y_parity > 1 {
            return Err(Error::invalid_field(self.field(index), FieldError::InvalidYParity));
        }
        Ok(Signature {
            v: RecoveryId::new(y_parity),
            r: self.decode(index + 1)?,
            s: self.decode(index + 2)?,
        })
    }
}

/// Lowering of a transaction kind into its serialized envelope.
pub trait RlpEncodableTransaction {
    const TX_TYPE: TxType;

    /// Checks the field values, called before every encoding.
    ///
    /// # Errors
    /// Returns `Err` if a field value is not allowed by the transaction kind.
    fn validate(&self) -> Result<(), Error> {
        Ok(())
    }

    /// Items of the transaction list in wire order, followed by the signature if provided.
    ///
    /// # Errors
    /// Returns `Err` if the signature or a nested item can't be encoded by this kind.
    fn rlp_items(&self, signature: Option<&Signature>) -> Result<Vec<RlpValue>, Error>;

    /// The value following the type byte.
    ///
    /// # Errors
    /// Same as [`RlpEncodableTransaction::rlp_items`].
    fn rlp_payload(&self, signature: Option<&Signature>) -> Result<RlpValue, Error> {
        self.rlp_items(signature).map(RlpValue::List)
    }

    /// # Errors
    /// Returns `Err` if the transaction fails validation or can't be encoded.
    fn rlp_encode(&self, signature: Option<&Signature>) -> Result<Bytes, Error> {
        self.validate()?;
        let payload = self.rlp_payload(signature)?;
        encode_envelope(Self::TX_TYPE, &payload)
    }

    /// # Errors
    /// Same as [`RlpEncodableTransaction::rlp_encode`].
    fn rlp_unsigned(&self) -> Result<Bytes, Error> {
        self.rlp_encode(None)
    }

    /// # Errors
    /// Same as [`RlpEncodableTransaction::rlp_encode`].
    fn rlp_signed(&self, signature: &Signature) -> Result<Bytes, Error> {
        self.rlp_encode(Some(signature))
    }
}

pub trait RlpDecodableTransaction: Sized {
    /// Lifts the payload following the type byte.
    ///
    /// # Errors
    /// Returns `Err` if the payload doesn't have the layout of this kind.
    fn rlp_decode(payload: &RlpValue) -> Result<(Self, Option<Signature>), Error>;
}

/// Writes the type byte of typed transactions followed by the RLP payload.
///
/// # Errors
/// Returns `Err` if the payload is too large to be encoded.
pub fn encode_envelope(tx_type: TxType, payload: &RlpValue) -> Result<Bytes, Error> {
    let Some(discriminator) = tx_type.discriminator() else {
        return Ok(rlp::encode(payload)?);
    };
    let mut cursor = Cursor::with_capacity(1 + payload.encoded_len());
    cursor.push_byte(discriminator)?;
    rlp::encode_to(payload, &mut cursor)?;
    Ok(Bytes::from(cursor.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::{check_field_count, Decodable, Encodable};
    use crate::{
        bytes::Bytes,
        error::{Error, FieldError},
        eth_hash::{Address, H256},
        rlp::RlpValue,
        transactions::tx_type::TxType,
    };
    use primitive_types::U256;

    fn bytes(data: &[u8]) -> RlpValue {
        RlpValue::from(data)
    }

    #[test]
    fn integers_are_minimal() {
        assert_eq!(0u64.rlp_value(), RlpValue::empty());
        assert_eq!(1u64.rlp_value(), bytes(&[0x01]));
        assert_eq!(0x0400u64.rlp_value(), bytes(&[0x04, 0x00]));
        assert_eq!(u64::MAX.rlp_value(), bytes(&[0xff; 8]));
        assert_eq!(U256::zero().rlp_value(), RlpValue::empty());
        assert_eq!(U256::MAX.rlp_value(), bytes(&[0xff; 32]));
        assert_eq!(
            U256::from(1_000_000_000_000_000_000u128).rlp_value(),
            bytes(&[0x0d, 0xe0, 0xb6, 0xb3, 0xa7, 0x64, 0x00, 0x00])
        );
    }

    #[test]
    fn integers_reject_non_canonical_bytes() {
        assert_eq!(u64::rlp_decode(&RlpValue::empty()), Ok(0));
        assert_eq!(u64::rlp_decode(&bytes(&[0x00])), Err(FieldError::LeadingZero));
        assert_eq!(u64::rlp_decode(&bytes(&[0x00, 0x01])), Err(FieldError::LeadingZero));
        assert_eq!(u64::rlp_decode(&bytes(&[0x01; 9])), Err(FieldError::Overflow { max_bytes: 8 }));
        assert_eq!(
            U256::rlp_decode(&bytes(&[0x01; 33])),
            Err(FieldError::Overflow { max_bytes: 32 })
        );
        assert_eq!(u64::rlp_decode(&RlpValue::empty_list()), Err(FieldError::ExpectedBytes));
    }

    #[test]
    fn fixed_size_fields() {
        let address = Address::repeat_byte(0xaa);
        assert_eq!(Address::rlp_decode(&address.rlp_value()), Ok(address));
        assert_eq!(
            Address::rlp_decode(&bytes(&[0xaa; 19])),
            Err(FieldError::InvalidLength { expected: 20, actual: 19 })
        );
        assert_eq!(
            H256::rlp_decode(&bytes(&[0xaa; 20])),
            Err(FieldError::InvalidLength { expected: 32, actual: 20 })
        );
        assert_eq!(Option::<Address>::rlp_decode(&RlpValue::empty()), Ok(None));
        assert_eq!(Option::<Address>::None.rlp_value(), RlpValue::empty());
    }

    #[test]
    fn booleans() {
        assert_eq!(true.rlp_value(), bytes(&[0x01]));
        assert_eq!(false.rlp_value(), RlpValue::empty());
        assert_eq!(bool::rlp_decode(&bytes(&[0x01])), Ok(true));
        assert_eq!(bool::rlp_decode(&RlpValue::empty()), Ok(false));
        assert_eq!(bool::rlp_decode(&bytes(&[0x02])), Err(FieldError::InvalidBool));
    }

    #[test]
    fn lists_of_fields() {
        let deps = vec![Bytes::from_static(&[0xde, 0xad]), Bytes::new()];
        let value = deps.rlp_value();
        assert_eq!(value, RlpValue::List(vec![bytes(&[0xde, 0xad]), RlpValue::empty()]));
        assert_eq!(Vec::<Bytes>::rlp_decode(&value), Ok(deps));
        assert_eq!(Vec::<Bytes>::rlp_decode(&RlpValue::empty()), Err(FieldError::ExpectedList));
    }

    #[test]
    fn field_count_names_every_missing_attribute() {
        assert_eq!(check_field_count(TxType::Eip1559, 9), Ok(false));
        assert_eq!(check_field_count(TxType::Eip1559, 12), Ok(true));
        assert_eq!(
            check_field_count(TxType::Eip1559, 10),
            Err(Error::InvalidSerializedTransaction {
                tx_type: TxType::Eip1559,
                missing: vec!["r", "s"],
                extra: 0,
            })
        );
        assert_eq!(
            check_field_count(TxType::Legacy, 4),
            Err(Error::InvalidSerializedTransaction {
                tx_type: TxType::Legacy,
                missing: vec!["value", "data"],
                extra: 0,
            })
        );
        assert_eq!(
            check_field_count(TxType::Eip2930, 13),
            Err(Error::InvalidSerializedTransaction {
                tx_type: TxType::Eip2930,
                missing: vec![],
                extra: 2,
            })
        );
    }
}
