use std::{error, fmt};

/// Indicates a document could not be encoded as GIF data.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum EncodeError {
    /// Neither the frame nor the document has a color table.
    MissingPalette {
        /// The offending frame.
        frame: usize,
    },

    /// The pixel buffer does not hold `width * height` entries.
    PixelCountMismatch {
        /// The offending frame.
        frame: usize,
        /// The number of pixels the frame's dimensions call for.
        expected: usize,
        /// The number of pixels in the buffer.
        actual: usize,
    },

    /// A pixel refers to a color the frame's palette does not define.
    PixelOutOfRange {
        /// The offending frame.
        frame: usize,
        /// Position of the first offending pixel in the buffer.
        position: usize,
        /// The palette index stored in that pixel.
        index: u8,
        /// The length of the frame's effective palette.
        palette_len: usize,
    },

    /// The transparency index refers to a color the frame's palette does not define.
    TransparencyOutOfRange {
        /// The offending frame.
        frame: usize,
        /// The transparency index.
        index: u8,
        /// The length of the frame's effective palette.
        palette_len: usize,
    },

    /// The pixel data could not be compressed.
    Lzw {
        /// The offending frame.
        frame: usize,
        /// The underlying error that caused the failure.
        source: weezl::LzwError,
    },
}

impl EncodeError {
    /// The index of the frame that could not be encoded.
    #[must_use]
    pub const fn frame(&self) -> usize {
        match *self {
            Self::MissingPalette { frame }
            | Self::PixelCountMismatch { frame, .. }
            | Self::PixelOutOfRange { frame, .. }
            | Self::TransparencyOutOfRange { frame, .. }
            | Self::Lzw { frame, .. } => frame,
        }
    }
}

impl PartialEq for EncodeError {
    /// LZW failures compare by frame only.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MissingPalette { frame: a }, Self::MissingPalette { frame: b })
            | (Self::Lzw { frame: a, .. }, Self::Lzw { frame: b, .. }) => a == b,
            (
                Self::PixelCountMismatch {
                    frame,
                    expected,
                    actual,
                },
                Self::PixelCountMismatch {
                    frame: other_frame,
                    expected: other_expected,
                    actual: other_actual,
                },
            ) => (frame, expected, actual) == (other_frame, other_expected, other_actual),
            (
                Self::PixelOutOfRange {
                    frame,
                    position,
                    index,
                    palette_len,
                },
                Self::PixelOutOfRange {
                    frame: other_frame,
                    position: other_position,
                    index: other_index,
                    palette_len: other_palette_len,
                },
            ) => {
                (frame, position, index, palette_len)
                    == (other_frame, other_position, other_index, other_palette_len)
            }
            (
                Self::TransparencyOutOfRange {
                    frame,
                    index,
                    palette_len,
                },
                Self::TransparencyOutOfRange {
                    frame: other_frame,
                    index: other_index,
                    palette_len: other_palette_len,
                },
            ) => (frame, index, palette_len) == (other_frame, other_index, other_palette_len),
            _ => false,
        }
    }
}

impl Eq for EncodeError {}

impl error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Self::Lzw { ref source, .. } => Some(source),
            Self::MissingPalette { .. }
            | Self::PixelCountMismatch { .. }
            | Self::PixelOutOfRange { .. }
            | Self::TransparencyOutOfRange { .. } => None,
        }
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::MissingPalette { frame } => {
                write!(f, "frame {frame} has no local or global color table")
            }
            Self::PixelCountMismatch {
                frame,
                expected,
                actual,
            } => write!(f, "frame {frame}: expected {expected} pixels, got {actual}"),
            Self::PixelOutOfRange {
                frame,
                position,
                index,
                palette_len,
            } => write!(
                f,
                "frame {frame}: pixel {position} uses index {index}, outside a palette of \
                {palette_len} colors"
            ),
            Self::TransparencyOutOfRange {
                frame,
                index,
                palette_len,
            } => write!(
                f,
                "frame {frame}: transparency index {index} is outside a palette of {palette_len} \
                colors"
            ),
            Self::Lzw { frame, .. } => write!(f, "frame {frame}: failed to compress pixel data"),
        }
    }
}
