use super::{
    is_single_byte, length_of_length, RlpValue, LIST_OFFSET, LONG_LIST_OFFSET,
    LONG_STRING_OFFSET, SHORT_PAYLOAD_MAX, STRING_OFFSET,
};
use crate::{bytes::Bytes, cursor::Cursor, error::RlpError};

/// Encodes `value` into a buffer allocated with its exact encoded length.
///
/// # Errors
/// Returns `Err` if the encoding is larger than 4GiB, length prefixes are limited to 4 bytes.
pub fn encode(value: &RlpValue) -> Result<Bytes, RlpError> {
    let len = value.encoded_len();
    if u32::try_from(len).is_err() {
        return Err(RlpError::PayloadTooLarge(len));
    }
    let mut cursor = Cursor::with_capacity(len);

    // No nested payload is longer than the whole encoding, and the buffer
    // has exactly the size computed by `encoded_len`.
    #[allow(clippy::expect_used)]
    encode_to(value, &mut cursor).expect("buffer has the exact encoded length; qed");
    debug_assert!(cursor.is_exhausted(), "encoded_len doesn't match the encoded bytes");

    Ok(Bytes::from(cursor.into_inner()))
}

/// Writes the canonical encoding of `value` at the cursor position.
///
/// # Errors
/// Returns `Err` if the cursor doesn't have enough capacity left.
pub fn encode_to<T>(value: &RlpValue, cursor: &mut Cursor<T>) -> Result<(), RlpError>
where
    T: AsRef<[u8]> + AsMut<[u8]>,
{
    match value {
        RlpValue::Bytes(bytes) if is_single_byte(bytes) => cursor.push_byte(bytes[0])?,
        RlpValue::Bytes(bytes) => {
            write_header(cursor, STRING_OFFSET, LONG_STRING_OFFSET, bytes.len())?;
            cursor.push_bytes(bytes)?;
        },
        RlpValue::List(items) => {
            write_header(cursor, LIST_OFFSET, LONG_LIST_OFFSET, value.payload_len())?;
            for item in items {
                encode_to(item, cursor)?;
            }
        },
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn write_header<T>(
    cursor: &mut Cursor<T>,
    offset: u8,
    long_offset: u8,
    payload_len: usize,
) -> Result<(), RlpError>
where
    T: AsRef<[u8]> + AsMut<[u8]>,
{
    if payload_len <= SHORT_PAYLOAD_MAX {
        cursor.push_byte(offset + payload_len as u8)?;
        return Ok(());
    }

    let len = u32::try_from(payload_len).map_err(|_| RlpError::PayloadTooLarge(payload_len))?;
    let len_of_len = length_of_length(payload_len);
    cursor.push_byte(long_offset + len_of_len as u8)?;
    match len_of_len {
        1 => cursor.push_u8(len as u8)?,
        2 => cursor.push_u16(len as u16)?,
        3 => cursor.push_u24(len)?,
        _ => cursor.push_u32(len)?,
    }
    Ok(())
}
