//! Position tracked reader and writer over a fixed size byte buffer.
use crate::{error::CursorError, rstd::vec::Vec};

/// A byte buffer with a position, reads and writes never go past the end of the buffer.
///
/// Writers are allocated with the exact size of the output, see [`Cursor::with_capacity`],
/// the buffer never grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor<T> {
    inner: T,
    position: usize,
}

impl<T> Cursor<T> {
    pub const fn new(inner: T) -> Self {
        Self { inner, position: 0 }
    }

    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl Cursor<Vec<u8>> {
    /// Allocates a zeroed buffer of exactly `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(vec![0; capacity])
    }
}

impl<T: AsRef<[u8]>> Cursor<T> {
    /// Total size of the underlying buffer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.as_ref().len()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity().saturating_sub(self.position)
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    const fn underrun(&self, requested: usize, length: usize) -> CursorError {
        CursorError::Underrun { position: self.position, requested, length }
    }

    /// # Errors
    /// Returns `Err` if the cursor is at the end of the buffer.
    pub fn peek_byte(&self) -> Result<u8, CursorError> {
        let buf = self.inner.as_ref();
        buf.get(self.position).copied().ok_or_else(|| self.underrun(1, buf.len()))
    }

    /// # Errors
    /// Returns `Err` if the cursor is at the end of the buffer.
    pub fn read_byte(&mut self) -> Result<u8, CursorError> {
        let byte = self.peek_byte()?;
        self.position += 1;
        Ok(byte)
    }

    /// Reads the next `len` bytes.
    ///
    /// # Errors
    /// Returns `Err` if less than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<&[u8], CursorError> {
        let start = self.position;
        let length = self.capacity();
        let end = start.checked_add(len).filter(|end| *end <= length);
        let Some(end) = end else {
            return Err(self.underrun(len, length));
        };
        self.position = end;
        Ok(&self.inner.as_ref()[start..end])
    }

    /// Reads a big-endian unsigned integer of `width` bytes, `width` must be in `1..=4`.
    fn read_uint(&mut self, width: usize) -> Result<u32, CursorError> {
        debug_assert!((1..=4).contains(&width));
        let bytes = self.read_bytes(width)?;
        Ok(bytes.iter().fold(0u32, |acc, byte| (acc << 8) | u32::from(*byte)))
    }

    /// # Errors
    /// Returns `Err` if the cursor is at the end of the buffer.
    pub fn read_u8(&mut self) -> Result<u8, CursorError> {
        self.read_byte()
    }

    /// # Errors
    /// Returns `Err` if less than 2 bytes remain.
    #[allow(clippy::cast_possible_truncation)]
    pub fn read_u16(&mut self) -> Result<u16, CursorError> {
        self.read_uint(2).map(|value| value as u16)
    }

    /// # Errors
    /// Returns `Err` if less than 3 bytes remain.
    pub fn read_u24(&mut self) -> Result<u32, CursorError> {
        self.read_uint(3)
    }

    /// # Errors
    /// Returns `Err` if less than 4 bytes remain.
    pub fn read_u32(&mut self) -> Result<u32, CursorError> {
        self.read_uint(4)
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Cursor<T> {
    fn reserve(&mut self, requested: usize) -> Result<&mut [u8], CursorError> {
        let start = self.position;
        let capacity = self.capacity();
        let end = start.checked_add(requested).filter(|end| *end <= capacity);
        let Some(end) = end else {
            return Err(CursorError::Overrun { position: start, requested, capacity });
        };
        self.position = end;
        Ok(&mut self.inner.as_mut()[start..end])
    }

    /// # Errors
    /// Returns `Err` if the buffer is full.
    pub fn push_byte(&mut self, byte: u8) -> Result<(), CursorError> {
        self.reserve(1)?[0] = byte;
        Ok(())
    }

    /// # Errors
    /// Returns `Err` if less than `bytes.len()` bytes of capacity remain.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<(), CursorError> {
        self.reserve(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Writes the `width` least significant bytes of `value` in big-endian order.
    fn push_uint(&mut self, value: u32, width: usize) -> Result<(), CursorError> {
        debug_assert!((1..=4).contains(&width));
        debug_assert!(
            width == 4 || value >> (width * 8) == 0,
            "value doesn't fit in {width} bytes"
        );
        let bytes = value.to_be_bytes();
        self.push_bytes(&bytes[4 - width..])
    }

    /// # Errors
    /// Returns `Err` if the buffer is full.
    pub fn push_u8(&mut self, value: u8) -> Result<(), CursorError> {
        self.push_byte(value)
    }

    /// # Errors
    /// Returns `Err` if less than 2 bytes of capacity remain.
    pub fn push_u16(&mut self, value: u16) -> Result<(), CursorError> {
        self.push_uint(u32::from(value), 2)
    }

    /// # Errors
    /// Returns `Err` if less than 3 bytes of capacity remain.
    pub fn push_u24(&mut self, value: u32) -> Result<(), CursorError> {
        self.push_uint(value, 3)
    }

    /// # Errors
    /// Returns `Err` if less than 4 bytes of capacity remain.
    pub fn push_u32(&mut self, value: u32) -> Result<(), CursorError> {
        self.push_uint(value, 4)
    }
}

#[cfg(test)]
mod tests {
    use super::Cursor;
    use crate::error::CursorError;

    #[test]
    fn push_fixed_width_integers() {
        let mut cursor = Cursor::with_capacity(10);
        cursor.push_u8(0xab).unwrap();
        cursor.push_u16(0x1770).unwrap();
        cursor.push_u24(0x01_0203).unwrap();
        cursor.push_u32(0xdead_beef).unwrap();
        assert_eq!(cursor.position(), 10);
        assert!(cursor.is_exhausted());
        assert_eq!(
            cursor.into_inner(),
            vec![0xab, 0x17, 0x70, 0x01, 0x02, 0x03, 0xde, 0xad, 0xbe, 0xef]
        );
    }

    #[test]
    fn writer_starts_zeroed() {
        let cursor = Cursor::with_capacity(4);
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.into_inner(), vec![0; 4]);
    }

    #[test]
    fn push_past_capacity_overruns() {
        let mut cursor = Cursor::with_capacity(3);
        cursor.push_bytes(&[1, 2]).unwrap();
        assert_eq!(
            cursor.push_u16(0xffff),
            Err(CursorError::Overrun { position: 2, requested: 2, capacity: 3 })
        );
        // a failed push doesn't move the cursor
        assert_eq!(cursor.position(), 2);
        cursor.push_byte(3).unwrap();
        assert_eq!(
            cursor.push_byte(4),
            Err(CursorError::Overrun { position: 3, requested: 1, capacity: 3 })
        );
    }

    #[test]
    fn read_matches_push() {
        let data = [0x7f, 0x17, 0x70, 0x01, 0x02, 0x03, 0xde, 0xad, 0xbe, 0xef, 0x42];
        let mut cursor = Cursor::new(&data[..]);
        assert_eq!(cursor.peek_byte(), Ok(0x7f));
        assert_eq!(cursor.read_u8(), Ok(0x7f));
        assert_eq!(cursor.read_u16(), Ok(0x1770));
        assert_eq!(cursor.read_u24(), Ok(0x01_0203));
        assert_eq!(cursor.read_u32(), Ok(0xdead_beef));
        assert_eq!(cursor.remaining(), 1);
        assert_eq!(cursor.read_bytes(1), Ok(&[0x42][..]));
    }

    #[test]
    fn read_past_end_underruns() {
        let data = [0x01, 0x02];
        let mut cursor = Cursor::new(&data[..]);
        assert_eq!(
            cursor.read_bytes(3),
            Err(CursorError::Underrun { position: 0, requested: 3, length: 2 })
        );
        assert_eq!(cursor.read_u16(), Ok(0x0102));
        assert_eq!(
            cursor.peek_byte(),
            Err(CursorError::Underrun { position: 2, requested: 1, length: 2 })
        );
        assert_eq!(
            cursor.read_byte(),
            Err(CursorError::Underrun { position: 2, requested: 1, length: 2 })
        );
    }
}
