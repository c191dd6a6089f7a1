//! Split an animation into standalone animations.
//!
//! Every frame of a split carries the palette it was drawn with in the source as an explicit
//! local color table. A standalone file never relies on a shared table it does not declare, so
//! frames after the first keep their exact palette and transparency index.

mod error;

use std::collections::BTreeMap;
use std::ops::Range;

pub use error::{RangeError, SplitError};
use tracing::debug;

use crate::document::AnimationDocument;
use crate::ser::{self, validate_frame};

/// Split `document` into one new document per range.
///
/// Ranges are half-open (`start..end`) frame indices and may overlap. Output documents keep the
/// logical screen size and loop count of the source, declare no global palette, and number their
/// frames from 0.
///
/// # Errors
///
/// This function returns an error if:
///
/// - `ranges` is empty.
/// - A range is empty or reaches past the last frame.
/// - A frame has no palette, or a pixel or transparency index outside its palette.
pub fn split(
    document: &AnimationDocument,
    ranges: &[Range<usize>],
) -> Result<Vec<AnimationDocument>, SplitError> {
    if ranges.is_empty() {
        return Err(RangeError::NoRanges.into());
    }

    ranges
        .iter()
        .map(|range| split_range(document, range.clone()))
        .collect()
}

/// Split `document` and encode every part as a GIF89a stream.
///
/// All parts are encoded into memory before any is returned, so a failure in one range never
/// leaves the caller with a partial set of outputs.
///
/// # Errors
///
/// This function returns the same errors as [`split`].
pub fn split_encoded(
    document: &AnimationDocument,
    ranges: &[Range<usize>],
) -> Result<Vec<Vec<u8>>, SplitError> {
    split(document, ranges)?
        .iter()
        .zip(ranges)
        .map(|(part, range)| {
            ser::encode(part).map_err(|source| SplitError::Encode {
                range: range.clone(),
                source,
            })
        })
        .collect()
}

fn split_range(
    document: &AnimationDocument,
    range: Range<usize>,
) -> Result<AnimationDocument, SplitError> {
    check_range(&range, document.len())?;

    let mut output = AnimationDocument::new(document.width(), document.height())
        .with_loop_count(document.loop_count());

    for frame in &document.frames()[range.clone()] {
        let palette = validate_frame(frame, document.effective_palette(frame)).map_err(
            |source| SplitError::Encode {
                range: range.clone(),
                source,
            },
        )?;

        output.push_frame(frame.clone().with_local_palette(Some(palette.clone())));
    }

    debug!(
        "split frames {}..{} into a standalone animation",
        range.start, range.end
    );
    Ok(output)
}

fn check_range(range: &Range<usize>, frame_count: usize) -> Result<(), RangeError> {
    if range.is_empty() {
        return Err(RangeError::Empty {
            start: range.start,
            end: range.end,
        });
    }

    if range.end > frame_count {
        return Err(RangeError::OutOfBounds {
            start: range.start,
            end: range.end,
            frame_count,
        });
    }

    Ok(())
}

/// A named, contiguous range of frames that starts at a keyframe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Motion {
    name: String,
    range: Range<usize>,
}

impl Motion {
    /// Create a motion covering `range`.
    #[must_use]
    pub fn new(name: impl Into<String>, range: Range<usize>) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }

    /// The name of the motion.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The frames of the motion, half-open.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// The file name of the motion's animation when split out of `stem.gif`.
    #[must_use]
    pub fn file_name(&self, stem: &str) -> String {
        file_name(stem, &self.range, Some(&self.name))
    }
}

/// Turn keyframes (start frame, name) into motions.
///
/// Each motion runs from its keyframe up to the frame before the next keyframe, the last one up
/// to the final frame. A later duplicate keyframe replaces an earlier one.
///
/// # Errors
///
/// This function returns an error if:
///
/// - There are no keyframes.
/// - A keyframe lies at or beyond `frame_count`.
pub fn motions<I, S>(keyframes: I, frame_count: usize) -> Result<Vec<Motion>, RangeError>
where
    I: IntoIterator<Item = (usize, S)>,
    S: Into<String>,
{
    let keyframes = keyframes
        .into_iter()
        .map(|(start, name)| (start, name.into()))
        .collect::<BTreeMap<_, _>>();

    if keyframes.is_empty() {
        return Err(RangeError::NoRanges);
    }

    if let Some((&start, _)) = keyframes.range(frame_count..).next() {
        return Err(RangeError::OutOfBounds {
            start,
            end: start + 1,
            frame_count,
        });
    }

    let starts = keyframes.keys().copied().collect::<Vec<_>>();
    let motions = keyframes
        .into_iter()
        .enumerate()
        .map(|(i, (start, name))| {
            let end = starts.get(i + 1).copied().unwrap_or(frame_count);
            Motion::new(name, start..end)
        })
        .collect();

    Ok(motions)
}

/// The output file name for the frames `range` of `stem.gif`.
///
/// Frame numbers are 1-based and inclusive, e.g. `walk_01-04_idle.gif` for the range `0..4`. A
/// named range keeps its separator even when the name sanitizes to nothing (`walk_01-04_.gif`).
#[must_use]
pub fn file_name(stem: &str, range: &Range<usize>, name: Option<&str>) -> String {
    let first = range.start + 1;
    let last = range.end;

    match name {
        Some(name) => format!("{stem}_{first:02}-{last:02}_{}.gif", sanitize(name)),
        None => format!("{stem}_{first:02}-{last:02}.gif"),
    }
}

/// Replace characters that are unsafe in file names.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_end()
        .to_owned()
}
