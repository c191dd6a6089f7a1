use std::ops::Range;
use std::{error, fmt};

use crate::ser::EncodeError;

/// Indicates a requested frame range cannot be split out of a document.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// No ranges were requested.
    NoRanges,

    /// The range contains no frames.
    Empty {
        /// First frame of the range.
        start: usize,
        /// One past the last frame of the range.
        end: usize,
    },

    /// The range reaches past the last frame.
    OutOfBounds {
        /// First frame of the range.
        start: usize,
        /// One past the last frame of the range.
        end: usize,
        /// The number of frames in the document.
        frame_count: usize,
    },
}

impl error::Error for RangeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NoRanges => f.write_str("no frame ranges requested"),
            Self::Empty { start, end } => write!(f, "frame range {start}..{end} is empty"),
            Self::OutOfBounds {
                start,
                end,
                frame_count,
            } => write!(
                f,
                "frame range {start}..{end} is out of bounds for {frame_count} frames"
            ),
        }
    }
}

/// Indicates a document could not be split.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    /// A requested range is invalid.
    Range {
        /// The underlying error that caused the failure.
        source: RangeError,
    },

    /// A frame of the range cannot be written as a standalone animation.
    Encode {
        /// The range being split.
        range: Range<usize>,
        /// The underlying error that caused the failure.
        source: EncodeError,
    },
}

impl From<RangeError> for SplitError {
    fn from(source: RangeError) -> Self {
        Self::Range { source }
    }
}

impl error::Error for SplitError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Self::Range { ref source } => Some(source),
            Self::Encode { ref source, .. } => Some(source),
        }
    }
}

impl fmt::Display for SplitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Range { .. } => f.write_str("invalid frame range"),
            Self::Encode { ref range, .. } => write!(
                f,
                "failed to encode frames {}..{} as a standalone animation",
                range.start, range.end
            ),
        }
    }
}
