use super::{
    RlpValue, LIST_OFFSET, LOG_TARGET, LONG_LIST_OFFSET, LONG_STRING_OFFSET, SHORT_PAYLOAD_MAX,
    STRING_OFFSET,
};
use crate::{
    bytes::Bytes,
    cursor::Cursor,
    error::{NonCanonical, RlpError},
    rstd::vec::Vec,
};

/// Maximum nesting of lists, transactions never nest more than a few levels deep.
const MAX_DEPTH: usize = 64;

/// Decodes a single canonical RLP item spanning the whole input.
///
/// # Errors
/// Returns `Err` if the input is truncated, has trailing bytes, or isn't the canonical encoding
/// of its value.
pub fn decode(input: &[u8]) -> Result<RlpValue, RlpError> {
    let mut cursor = Cursor::new(input);
    let value = decode_item(&mut cursor, 0)?;
    if !cursor.is_exhausted() {
        let error =
            RlpError::TrailingBytes { position: cursor.position(), remaining: cursor.remaining() };
        tracing::debug!(target: LOG_TARGET, "rejecting rlp input: {:?}", error);
        return Err(error);
    }
    Ok(value)
}

/// Decodes the input as a list, returns `None` if it is a canonical byte-string instead.
///
/// # Errors
/// Same as [`decode`].
pub fn decode_list(input: &[u8]) -> Result<Option<Vec<RlpValue>>, RlpError> {
    match decode(input)? {
        RlpValue::List(items) => Ok(Some(items)),
        RlpValue::Bytes(_) => Ok(None),
    }
}

fn non_canonical(position: usize, reason: NonCanonical) -> RlpError {
    tracing::debug!(target: LOG_TARGET, "non-canonical rlp at byte {}: {:?}", position, reason);
    RlpError::NonCanonical { position, reason }
}

fn decode_item(cursor: &mut Cursor<&[u8]>, depth: usize) -> Result<RlpValue, RlpError> {
    let position = cursor.position();
    let prefix = cursor.read_byte()?;
    match prefix {
        // single byte
        0x00..=0x7f => Ok(RlpValue::Bytes(Bytes::copy_from_slice(&[prefix]))),

        // short string
        STRING_OFFSET..=LONG_STRING_OFFSET => {
            let len = usize::from(prefix - STRING_OFFSET);
            let bytes = cursor.read_bytes(len)?;
            if let [byte] = bytes {
                if *byte < STRING_OFFSET {
                    return Err(non_canonical(position, NonCanonical::SingleByteWithPrefix));
                }
            }
            Ok(RlpValue::Bytes(Bytes::copy_from_slice(bytes)))
        },

        // long string
        0xb8..=0xbf => {
            let len = read_long_length(cursor, position, prefix - LONG_STRING_OFFSET)?;
            let bytes = cursor.read_bytes(len)?;
            Ok(RlpValue::Bytes(Bytes::copy_from_slice(bytes)))
        },

        // short list
        LIST_OFFSET..=LONG_LIST_OFFSET => {
            let len = usize::from(prefix - LIST_OFFSET);
            decode_list_payload(cursor, position, len, depth)
        },

        // long list
        0xf8..=0xff => {
            let len = read_long_length(cursor, position, prefix - LONG_LIST_OFFSET)?;
            decode_list_payload(cursor, position, len, depth)
        },
    }
}

/// Reads the big-endian payload length of a long form prefix.
fn read_long_length(
    cursor: &mut Cursor<&[u8]>,
    position: usize,
    len_of_len: u8,
) -> Result<usize, RlpError> {
    let len = match len_of_len {
        1..=4 => {
            if cursor.peek_byte()? == 0 {
                return Err(non_canonical(position, NonCanonical::LeadingZeroLength));
            }
            match len_of_len {
                1 => u32::from(cursor.read_u8()?),
                2 => u32::from(cursor.read_u16()?),
                3 => cursor.read_u24()?,
                _ => cursor.read_u32()?,
            }
        },
        _ => {
            return Err(RlpError::UnsupportedLength {
                position,
                len_of_len: usize::from(len_of_len),
            })
        },
    };
    let len = usize::try_from(len).map_err(|_| RlpError::UnsupportedLength {
        position,
        len_of_len: usize::from(len_of_len),
    })?;
    if len <= SHORT_PAYLOAD_MAX {
        return Err(non_canonical(position, NonCanonical::ShortFormAvailable));
    }
    Ok(len)
}

fn decode_list_payload(
    cursor: &mut Cursor<&[u8]>,
    position: usize,
    len: usize,
    depth: usize,
) -> Result<RlpValue, RlpError> {
    if depth >= MAX_DEPTH {
        return Err(RlpError::RecursionLimit { position });
    }
    let remaining = cursor.remaining();
    if len > remaining {
        return Err(RlpError::Cursor(crate::error::CursorError::Underrun {
            position: cursor.position(),
            requested: len,
            length: cursor.capacity(),
        }));
    }

    let start = cursor.position();
    let end = start + len;
    let mut items = Vec::new();
    while cursor.position() < end {
        items.push(decode_item(cursor, depth + 1)?);
    }
    if cursor.position() != end {
        let error = RlpError::ListLengthMismatch {
            position,
            expected: len,
            actual: cursor.position() - start,
        };
        tracing::debug!(target: LOG_TARGET, "rejecting rlp input: {:?}", error);
        return Err(error);
    }
    Ok(RlpValue::List(items))
}
