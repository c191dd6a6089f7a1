//! Encode GIF animations.

mod error;
pub(crate) mod writer;

pub use error::EncodeError;
use tracing::debug;
use weezl::BitOrder;
use writer::Writer;

use crate::block::{
    self, GraphicControl, ImageDescriptor, SIGNATURE_89A, ScreenDescriptor, TRAILER,
};
use crate::document::{AnimationDocument, Frame, Palette};

/// Encode `document` as a GIF89a stream.
///
/// Every frame is validated before any byte is produced, so either the whole stream is returned
/// or nothing is.
///
/// # Errors
///
/// This function returns an error if:
///
/// - A frame has no local palette and the document has no global palette.
/// - A frame's pixel buffer does not match its dimensions.
/// - A pixel or the transparency index lies outside the frame's effective palette.
pub fn encode(document: &AnimationDocument) -> Result<Vec<u8>, EncodeError> {
    let palettes = document
        .frames()
        .iter()
        .map(|frame| validate_frame(frame, document.effective_palette(frame)))
        .collect::<Result<Vec<_>, _>>()?;

    let estimate = document
        .frames()
        .iter()
        .map(|frame| frame.pixel_count() + 800)
        .sum::<usize>();
    let mut writer = Writer::with_capacity(estimate + 800);

    writer.write_bytes(SIGNATURE_89A);
    ScreenDescriptor::new(
        document.width(),
        document.height(),
        document.global_palette(),
        document.background_index(),
    )
    .write(&mut writer);

    if let Some(palette) = document.global_palette() {
        writer.write_bytes(&palette.to_table_bytes());
    }

    if let Some(loop_count) = document.loop_count() {
        block::write_loop_extension(&mut writer, loop_count);
    }

    for (frame, palette) in document.frames().iter().zip(palettes) {
        write_frame(&mut writer, frame, palette)?;
    }

    writer.write_u8(TRAILER);

    let bytes = writer.into_inner();
    debug!("encoded {} frames into {} bytes", document.len(), bytes.len());
    Ok(bytes)
}

/// Check that `frame` can be drawn with `palette` and return that palette.
///
/// # Errors
///
/// This function returns an error if:
///
/// - `palette` is `None`.
/// - The pixel buffer does not hold `width * height` entries.
/// - A pixel or the transparency index lies outside `palette`.
pub fn validate_frame<'a>(
    frame: &Frame,
    palette: Option<&'a Palette>,
) -> Result<&'a Palette, EncodeError> {
    let palette = palette.ok_or(EncodeError::MissingPalette {
        frame: frame.index(),
    })?;

    if frame.pixels().len() != frame.pixel_count() {
        return Err(EncodeError::PixelCountMismatch {
            frame: frame.index(),
            expected: frame.pixel_count(),
            actual: frame.pixels().len(),
        });
    }

    if let Some(index) = frame.transparent_index()
        && !palette.contains_index(index)
    {
        return Err(EncodeError::TransparencyOutOfRange {
            frame: frame.index(),
            index,
            palette_len: palette.len(),
        });
    }

    if let Some((position, &index)) = frame
        .pixels()
        .iter()
        .enumerate()
        .find(|&(_, &index)| !palette.contains_index(index))
    {
        return Err(EncodeError::PixelOutOfRange {
            frame: frame.index(),
            position,
            index,
            palette_len: palette.len(),
        });
    }

    Ok(palette)
}

fn write_frame(writer: &mut Writer, frame: &Frame, palette: &Palette) -> Result<(), EncodeError> {
    if let Some(control) = GraphicControl::for_frame(frame) {
        control.write(writer);
    }

    ImageDescriptor::for_frame(frame).write(writer);

    if let Some(local) = frame.local_palette() {
        writer.write_bytes(&local.to_table_bytes());
    }

    // Codes must cover every index of the table; the format requires at least 2 bits.
    let code_size = palette.table_bits().max(2);
    let data = weezl::encode::Encoder::new(BitOrder::Lsb, code_size)
        .encode(frame.pixels())
        .map_err(|source| EncodeError::Lzw {
            frame: frame.index(),
            source,
        })?;

    writer.write_u8(code_size);
    writer.write_sub_blocks(&data);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DisposalMethod, Rgb};

    fn palette(len: usize) -> Palette {
        let colors = (0..len)
            .map(|i| {
                let v = u8::try_from(i).expect("expected test palettes to fit in u8");
                Rgb::new(v, 255 - v, v / 2)
            })
            .collect();
        Palette::new(colors).expect("expected test palette to be valid")
    }

    fn checkerboard(width: u16, height: u16, colors: u8) -> Vec<u8> {
        (0..usize::from(width) * usize::from(height))
            .map(|i| u8::try_from(i % usize::from(colors)).expect("expected index to fit"))
            .collect()
    }

    #[test]
    fn round_trip_preserves_pixels() {
        let document = AnimationDocument::new(8, 6)
            .with_global_palette(Some(palette(4)))
            .with_loop_count(Some(0))
            .with_frames(vec![
                Frame::new(8, 6, checkerboard(8, 6, 4)).with_delay(10),
                Frame::new(4, 3, checkerboard(4, 3, 200))
                    .with_position(2, 1)
                    .with_local_palette(Some(palette(200)))
                    .with_transparent_index(Some(199))
                    .with_disposal(DisposalMethod::RestorePrevious)
                    .with_delay(7),
                Frame::new(8, 6, vec![3; 48]).with_disposal(DisposalMethod::DoNotDispose),
            ]);

        let bytes = encode(&document).expect("expected document to encode");
        let decoded =
            AnimationDocument::from_bytes_strict(&bytes).expect("expected output to decode");

        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded.loop_count(), Some(0));
        for (original, decoded) in document.frames().iter().zip(decoded.frames()) {
            assert_eq!(original.pixels(), decoded.pixels());
            assert_eq!(original.transparent_index(), decoded.transparent_index());
            assert_eq!(original.disposal(), decoded.disposal());
            assert_eq!(original.delay(), decoded.delay());
            assert_eq!(
                (original.left(), original.top()),
                (decoded.left(), decoded.top())
            );
        }

        // A 200-color table is padded to 256 entries.
        let local = decoded.frames()[1]
            .local_palette()
            .expect("expected local palette");
        assert_eq!(local.len(), 256);
        assert_eq!(&local.colors()[..200], palette(200).colors());

        let reencoded = encode(&decoded).expect("expected decoded document to encode");
        let again = AnimationDocument::from_bytes_strict(&reencoded).expect("expected to decode");
        assert_eq!(again.frames(), decoded.frames());
    }

    #[test]
    fn no_loop_extension_without_loop_count() {
        let document = AnimationDocument::new(1, 1)
            .with_global_palette(Some(palette(2)))
            .with_frames(vec![Frame::new(1, 1, vec![1])]);

        let bytes = encode(&document).expect("expected document to encode");
        assert!(!bytes.windows(11).any(|window| window == b"NETSCAPE2.0"));
        assert_eq!(bytes.last(), Some(&TRAILER));

        let decoded = AnimationDocument::from_bytes_strict(&bytes).expect("expected to decode");
        assert_eq!(decoded.loop_count(), None);
    }

    #[test]
    fn pixel_outside_palette() {
        let document = AnimationDocument::new(2, 1)
            .with_global_palette(Some(palette(2)))
            .with_frames(vec![
                Frame::new(2, 1, vec![0, 1]),
                Frame::new(2, 1, vec![1, 2]),
            ]);

        let err = encode(&document).expect_err("expected pixel 2 to be rejected");
        assert_eq!(
            err,
            EncodeError::PixelOutOfRange {
                frame: 1,
                position: 1,
                index: 2,
                palette_len: 2,
            }
        );
    }

    #[test]
    fn transparency_outside_palette() {
        let document = AnimationDocument::new(1, 1).with_frames(vec![
            Frame::new(1, 1, vec![0])
                .with_local_palette(Some(palette(4)))
                .with_transparent_index(Some(4)),
        ]);

        let err = encode(&document).expect_err("expected transparency to be rejected");
        assert_eq!(err.frame(), 0);
        assert!(matches!(err, EncodeError::TransparencyOutOfRange { index: 4, .. }));
    }

    #[test]
    fn missing_palette_and_wrong_size() {
        let document = AnimationDocument::new(1, 1).with_frames(vec![Frame::new(1, 1, vec![0])]);
        assert_eq!(
            encode(&document),
            Err(EncodeError::MissingPalette { frame: 0 })
        );

        let document = AnimationDocument::new(2, 2)
            .with_global_palette(Some(palette(2)))
            .with_frames(vec![Frame::new(2, 2, vec![0; 3])]);
        assert_eq!(
            encode(&document),
            Err(EncodeError::PixelCountMismatch {
                frame: 0,
                expected: 4,
                actual: 3,
            })
        );
    }
}
