use crate::de::error::DecodeError;

/// Represents an ongoing parse.
pub struct Parser<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Parser<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Return the next `size` bytes.
    ///
    /// # Errors
    ///
    /// This function returns an error if:
    ///
    /// - There are not enough bytes to fill a buffer of size `size`.
    pub fn read_bytes(&mut self, size: usize) -> Result<&'a [u8], DecodeError> {
        let (result, data) = self.data.split_at_checked(size).ok_or_else(|| {
            DecodeError::TruncatedData {
                needed: size.saturating_sub(self.data.len()),
                frame: None,
            }
        })?;

        self.data = data;
        self.offset += size;
        Ok(result)
    }

    /// Return the next `N` bytes as an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let bytes = self.read_bytes(N)?;
        let mut array = [0; N];
        array.copy_from_slice(bytes);
        Ok(array)
    }

    /// Collect the data of a chain of sub-blocks, up to and including the empty terminator.
    ///
    /// Each sub-block is a length byte followed by that many bytes of data.
    pub fn read_sub_blocks(&mut self) -> Result<Vec<u8>, DecodeError> {
        let mut data = Vec::new();

        loop {
            let size = usize::from(self.read_u8()?);
            if size == 0 {
                return Ok(data);
            }
            data.extend_from_slice(self.read_bytes(size)?);
        }
    }

    /// Skip a chain of sub-blocks, up to and including the empty terminator.
    pub fn skip_sub_blocks(&mut self) -> Result<(), DecodeError> {
        loop {
            let size = usize::from(self.read_u8()?);
            if size == 0 {
                return Ok(());
            }
            self.read_bytes(size)?;
        }
    }
}

impl Parser<'_> {
    pub const fn bytes_remaining(&self) -> usize {
        self.data.len()
    }

    /// Number of bytes consumed so far.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let [value] = self.read_array::<1>()?;
        Ok(value)
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        // GIF stores multi-byte integers least significant byte first.
        self.read_array::<2>().map(u16::from_le_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn little_endian() {
        let mut parser = Parser::new(&[0x34, 0x12, 0xFF]);
        assert_eq!(parser.read_u16().expect("expected two bytes"), 0x1234);
        assert_eq!(parser.offset(), 2);
        assert_eq!(parser.bytes_remaining(), 1);
    }

    #[test]
    fn sub_blocks() {
        let data = [2, b'a', b'b', 1, b'c', 0, 0x3B];
        let mut parser = Parser::new(&data);
        assert_eq!(parser.read_sub_blocks().expect("expected valid sub-blocks"), b"abc");
        assert_eq!(parser.bytes_remaining(), 1);
    }

    #[test]
    fn truncated_sub_blocks() {
        let data = [5, b'a', b'b'];
        let mut parser = Parser::new(&data);
        let err = parser.skip_sub_blocks().expect_err("expected missing bytes");
        assert!(matches!(err, DecodeError::TruncatedData { needed: 3, .. }));
    }
}
