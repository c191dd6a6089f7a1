use std::{error, fmt, io};

/// Indicates GIF data could not be decoded.
#[non_exhaustive]
#[derive(Debug)]
pub enum DecodeError {
    /// An error occurred while attempting to read from a file.
    ReadFailure {
        /// The underlying error that caused the failure.
        source: io::Error,
    },

    /// The data does not start with a `GIF87a` or `GIF89a` signature.
    MalformedHeader {
        /// The first six bytes of the data (zero-filled if shorter).
        signature: [u8; 6],
    },

    /// Attempted to read more bytes than were available.
    TruncatedData {
        /// The number of bytes needed to complete the operation.
        needed: usize,
        /// The frame being read, if any.
        frame: Option<usize>,
    },

    /// The stream contains an extension this decoder does not know.
    UnsupportedExtension {
        /// The extension label that follows the `0x21` introducer.
        label: u8,
        /// The frame being read, if any.
        frame: Option<usize>,
    },

    /// The next byte does not introduce an extension, an image or the trailer.
    UnexpectedBlock {
        /// The byte found where a block introducer was expected.
        introducer: u8,
        /// Position of the byte in the data.
        offset: usize,
        /// The frame being read, if any.
        frame: Option<usize>,
    },

    /// A fixed-size extension block declares the wrong size.
    InvalidBlockSize {
        /// The extension label.
        label: u8,
        /// The size required by the file format.
        expected: u8,
        /// The size found in the data.
        actual: u8,
        /// The frame being read, if any.
        frame: Option<usize>,
    },

    /// The LZW minimum code size is outside `2..=8`.
    InvalidCodeSize {
        /// The code size found in the data.
        size: u8,
        /// The frame being read, if any.
        frame: Option<usize>,
    },

    /// The compressed pixel data is corrupt.
    Lzw {
        /// The underlying error that caused the failure.
        source: weezl::LzwError,
        /// The frame being read, if any.
        frame: Option<usize>,
    },

    /// The compressed pixel data does not decode to `width * height` pixels.
    PixelCountMismatch {
        /// The number of pixels the image descriptor calls for.
        expected: usize,
        /// The number of pixels decoded.
        actual: usize,
        /// The frame being read, if any.
        frame: Option<usize>,
    },

    /// Neither the frame nor the document has a color table.
    MissingPalette {
        /// The frame being read, if any.
        frame: Option<usize>,
    },

    /// The transparency index does not refer to an entry of the frame's palette.
    TransparencyOutOfRange {
        /// The transparency index found in the Graphic Control Extension.
        index: u8,
        /// The length of the frame's effective palette.
        palette_len: usize,
        /// The frame being read, if any.
        frame: Option<usize>,
    },
}

impl DecodeError {
    /// The index of the frame that was being read when the error occurred.
    #[must_use]
    pub const fn frame(&self) -> Option<usize> {
        match *self {
            Self::ReadFailure { .. } | Self::MalformedHeader { .. } => None,
            Self::TruncatedData { frame, .. }
            | Self::UnsupportedExtension { frame, .. }
            | Self::UnexpectedBlock { frame, .. }
            | Self::InvalidBlockSize { frame, .. }
            | Self::InvalidCodeSize { frame, .. }
            | Self::Lzw { frame, .. }
            | Self::PixelCountMismatch { frame, .. }
            | Self::MissingPalette { frame }
            | Self::TransparencyOutOfRange { frame, .. } => frame,
        }
    }

    /// Attach the index of the frame being read, unless one is already set.
    #[must_use]
    pub(crate) fn at_frame(mut self, index: usize) -> Self {
        match self {
            Self::ReadFailure { .. } | Self::MalformedHeader { .. } => {}
            Self::TruncatedData { ref mut frame, .. }
            | Self::UnsupportedExtension { ref mut frame, .. }
            | Self::UnexpectedBlock { ref mut frame, .. }
            | Self::InvalidBlockSize { ref mut frame, .. }
            | Self::InvalidCodeSize { ref mut frame, .. }
            | Self::Lzw { ref mut frame, .. }
            | Self::PixelCountMismatch { ref mut frame, .. }
            | Self::MissingPalette { ref mut frame }
            | Self::TransparencyOutOfRange { ref mut frame, .. } => {
                frame.get_or_insert(index);
            }
        }
        self
    }
}

impl error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Self::ReadFailure { ref source } => Some(source),
            Self::Lzw { ref source, .. } => Some(source),
            Self::MalformedHeader { .. }
            | Self::TruncatedData { .. }
            | Self::UnsupportedExtension { .. }
            | Self::UnexpectedBlock { .. }
            | Self::InvalidBlockSize { .. }
            | Self::InvalidCodeSize { .. }
            | Self::PixelCountMismatch { .. }
            | Self::MissingPalette { .. }
            | Self::TransparencyOutOfRange { .. } => None,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ReadFailure { .. } => f.write_str("failed to read GIF file")?,
            Self::MalformedHeader { signature } => {
                let signature = String::from_utf8_lossy(&signature).to_string();
                write!(f, "expected signature \"GIF89a\" or \"GIF87a\", got {signature:?}")?;
            }
            Self::TruncatedData { needed, .. } => {
                write!(f, "not enough data (needed {needed} additional bytes)")?;
            }
            Self::UnsupportedExtension { label, .. } => {
                write!(f, "unsupported extension label 0x{label:02X}")?;
            }
            Self::UnexpectedBlock {
                introducer, offset, ..
            } => {
                write!(f, "unexpected block introducer 0x{introducer:02X} at offset {offset}")?;
            }
            Self::InvalidBlockSize {
                label,
                expected,
                actual,
                ..
            } => {
                write!(
                    f,
                    "expected extension 0x{label:02X} to be {expected} bytes, got {actual}"
                )?;
            }
            Self::InvalidCodeSize { size, .. } => {
                write!(f, "expected LZW minimum code size between 2 and 8, got {size}")?;
            }
            Self::Lzw { .. } => f.write_str("failed to decompress pixel data")?,
            Self::PixelCountMismatch {
                expected, actual, ..
            } => {
                write!(f, "expected {expected} pixels, got {actual}")?;
            }
            Self::MissingPalette { .. } => f.write_str("no local or global color table")?,
            Self::TransparencyOutOfRange {
                index, palette_len, ..
            } => {
                write!(
                    f,
                    "transparency index {index} is outside a palette of {palette_len} colors"
                )?;
            }
        }

        if let Some(frame) = self.frame() {
            write!(f, " (frame {frame})")?;
        }

        Ok(())
    }
}
