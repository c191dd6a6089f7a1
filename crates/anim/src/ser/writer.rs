/// Represents an ongoing write into memory.
#[derive(Debug, Default)]
pub struct Writer {
    buffer: Vec<u8>,
}

impl Writer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        // GIF stores multi-byte integers least significant byte first.
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Write `data` as a chain of sub-blocks of at most 255 bytes, followed by the terminator.
    pub fn write_sub_blocks(&mut self, data: &[u8]) {
        for chunk in data.chunks(usize::from(u8::MAX)) {
            self.write_u8(u8::try_from(chunk.len()).unwrap_or(u8::MAX));
            self.write_bytes(chunk);
        }
        self.write_u8(0);
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_blocks_are_split_at_255_bytes() {
        let data = vec![7; 300];
        let mut writer = Writer::default();
        writer.write_sub_blocks(&data);
        let bytes = writer.into_inner();

        assert_eq!(bytes.len(), 1 + 255 + 1 + 45 + 1);
        assert_eq!(bytes[0], 255);
        assert_eq!(bytes[256], 45);
        assert_eq!(bytes.last(), Some(&0));
    }

    #[test]
    fn empty_data_is_just_a_terminator() {
        let mut writer = Writer::default();
        writer.write_sub_blocks(&[]);
        assert_eq!(writer.into_inner(), [0]);
    }
}
