//! Decode GIF animations.

mod error;
pub(crate) mod parser;

use std::fs;
use std::iter::FusedIterator;
use std::path::Path;

pub use error::DecodeError;
use parser::Parser;
use tracing::{debug, trace, warn};
use weezl::{BitOrder, LzwStatus};

use crate::block::{
    APPLICATION_LABEL, COMMENT_LABEL, EXTENSION_INTRODUCER, GRAPHIC_CONTROL_LABEL,
    GRAPHIC_CONTROL_SIZE, GraphicControl, IMAGE_SEPARATOR, ImageDescriptor, LOOPING_APPLICATIONS,
    PLAIN_TEXT_LABEL, SIGNATURE_87A, SIGNATURE_89A, ScreenDescriptor, TRAILER,
};
use crate::document::{AnimationDocument, Frame, Palette};

/// The smallest and largest LZW minimum code sizes allowed for 8-bit pixel indices.
const CODE_SIZES: std::ops::RangeInclusive<u8> = 2..=8;

impl AnimationDocument {
    /// Read and decode a GIF file.
    ///
    /// # Errors
    ///
    /// This function returns an error if:
    ///
    /// - Cannot read the file at path.
    /// - Data does not follow the GIF file format specification.
    pub fn open(path: &Path, strict: bool) -> Result<Self, DecodeError> {
        let data = fs::read(path).map_err(|err| DecodeError::ReadFailure { source: err })?;

        if strict {
            Self::from_bytes_strict(&data)
        } else {
            Self::from_bytes(&data)
        }
    }

    /// Decode GIF data, rejecting anything that deviates from the file format.
    ///
    /// If the data may come from a sloppy encoder, use [`Self::from_bytes`] instead.
    ///
    /// # Errors
    ///
    /// This function returns an error if:
    ///
    /// - Data has an invalid signature.
    /// - Data does not follow the GIF file format specification.
    /// - A frame has no palette, or a transparency index outside its palette.
    pub fn from_bytes_strict(data: &[u8]) -> Result<Self, DecodeError> {
        Decoder::new_strict(data).and_then(Decoder::into_document)
    }

    /// Decode GIF data.
    ///
    /// This function does its best to recover from common encoder mistakes: a missing trailer,
    /// unknown extensions and short pixel data are tolerated and logged. If you know the data is
    /// well formed, you can use [`Self::from_bytes_strict`] instead.
    ///
    /// # Errors
    ///
    /// This function returns an error if:
    ///
    /// - Data has an invalid signature.
    /// - Data is cut short in the middle of a block.
    /// - Pixel data cannot be decompressed.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        Decoder::new(data).and_then(Decoder::into_document)
    }
}

/// A lazy, single-pass sequence of the frames in a GIF stream.
///
/// The header, logical screen descriptor and global palette are read up front; each call to
/// [`Iterator::next`] reads blocks until the next image. After the first error the decoder
/// yields nothing more.
pub struct Decoder<'a> {
    parser: Parser<'a>,
    screen: ScreenDescriptor,
    global_palette: Option<Palette>,
    loop_count: Option<u16>,
    strict: bool,
    next_index: usize,
    finished: bool,
}

impl<'a> Decoder<'a> {
    /// Start decoding `data`, tolerating common encoder mistakes.
    ///
    /// # Errors
    ///
    /// This function returns an error if the header or the global palette cannot be read.
    pub fn new(data: &'a [u8]) -> Result<Self, DecodeError> {
        Self::with_mode(data, false)
    }

    /// Start decoding `data`, rejecting anything that deviates from the file format.
    ///
    /// # Errors
    ///
    /// This function returns an error if the header or the global palette cannot be read.
    pub fn new_strict(data: &'a [u8]) -> Result<Self, DecodeError> {
        Self::with_mode(data, true)
    }

    fn with_mode(data: &'a [u8], strict: bool) -> Result<Self, DecodeError> {
        let mut parser = Parser::new(data);
        validate_signature(&mut parser)?;

        let screen = ScreenDescriptor::parse(&mut parser)?;
        debug!(
            "logical screen: {}x{}, global table: {:?}",
            screen.width,
            screen.height,
            screen.global_table_len()
        );

        let global_palette = screen
            .global_table_len()
            .map(|len| read_palette(&mut parser, len))
            .transpose()?;

        Ok(Self {
            parser,
            screen,
            global_palette,
            loop_count: None,
            strict,
            next_index: 0,
            finished: false,
        })
    }
}

impl Decoder<'_> {
    /// Width of the logical screen.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.screen.width
    }

    /// Height of the logical screen.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.screen.height
    }

    /// Global palette index of the background color.
    #[must_use]
    pub const fn background_index(&self) -> u8 {
        self.screen.background_index
    }

    /// The palette shared by frames without a local palette.
    #[must_use]
    pub const fn global_palette(&self) -> Option<&Palette> {
        self.global_palette.as_ref()
    }

    /// The loop count found so far.
    ///
    /// The looping extension normally precedes the first frame, but it is only guaranteed to be
    /// known once the decoder is exhausted.
    #[must_use]
    pub const fn loop_count(&self) -> Option<u16> {
        self.loop_count
    }

    /// Decode the remaining frames and assemble them into a document.
    ///
    /// # Errors
    ///
    /// This function returns the first error produced by the remaining frames.
    pub fn into_document(mut self) -> Result<AnimationDocument, DecodeError> {
        let frames = self.by_ref().collect::<Result<Vec<_>, _>>()?;

        Ok(AnimationDocument::new(self.width(), self.height())
            .with_background_index(self.background_index())
            .with_global_palette(self.global_palette)
            .with_loop_count(self.loop_count)
            .with_frames(frames))
    }

    /// Read blocks until the next image, or the end of the stream.
    fn next_frame(&mut self, index: usize) -> Result<Option<Frame>, DecodeError> {
        let mut control = None;

        loop {
            if self.parser.bytes_remaining() == 0 {
                if self.strict {
                    return Err(DecodeError::TruncatedData {
                        needed: 1,
                        frame: None,
                    });
                }

                warn!("GIF trailer missing, treating end of data as end of stream");
                return Ok(None);
            }

            let offset = self.parser.offset();
            let introducer = self.parser.read_u8()?;
            trace!("block 0x{introducer:02X} at offset {offset}");

            match introducer {
                EXTENSION_INTRODUCER => {
                    let label = self.parser.read_u8()?;
                    match label {
                        GRAPHIC_CONTROL_LABEL => {
                            if control.is_some() {
                                debug!("graphic control extension replaced before its image");
                            }
                            control = self.read_graphic_control()?;
                        }
                        APPLICATION_LABEL => self.read_application()?,
                        COMMENT_LABEL => self.parser.skip_sub_blocks()?,
                        PLAIN_TEXT_LABEL => {
                            // A plain text block is a graphic rendering block of its own.
                            self.parser.skip_sub_blocks()?;
                            control = None;
                        }
                        _ if self.strict => {
                            return Err(DecodeError::UnsupportedExtension { label, frame: None });
                        }
                        _ => {
                            warn!("skipping unsupported extension 0x{label:02X}");
                            self.parser.skip_sub_blocks()?;
                        }
                    }
                }
                IMAGE_SEPARATOR => {
                    return self.read_image(index, control.unwrap_or_default()).map(Some);
                }
                TRAILER => return Ok(None),
                _ if self.strict => {
                    return Err(DecodeError::UnexpectedBlock {
                        introducer,
                        offset,
                        frame: None,
                    });
                }
                _ => {
                    warn!(
                        "unexpected block introducer 0x{introducer:02X} at offset {offset}, \
                        treating it as end of stream"
                    );
                    return Ok(None);
                }
            }
        }
    }

    fn read_graphic_control(&mut self) -> Result<Option<GraphicControl>, DecodeError> {
        let size = self.parser.read_u8()?;

        if size == GRAPHIC_CONTROL_SIZE {
            let control = GraphicControl::from_bytes(self.parser.read_array()?);
            self.parser.skip_sub_blocks()?;
            return Ok(Some(control));
        }

        if self.strict {
            return Err(DecodeError::InvalidBlockSize {
                label: GRAPHIC_CONTROL_LABEL,
                expected: GRAPHIC_CONTROL_SIZE,
                actual: size,
                frame: None,
            });
        }

        warn!("graphic control extension has {size} bytes instead of {GRAPHIC_CONTROL_SIZE}");

        // The size byte doubles as the block terminator.
        if size == 0 {
            return Ok(None);
        }

        let bytes = self.parser.read_bytes(usize::from(size))?;
        self.parser.skip_sub_blocks()?;

        Ok(bytes
            .first_chunk::<4>()
            .map(|bytes| GraphicControl::from_bytes(*bytes)))
    }

    fn read_application(&mut self) -> Result<(), DecodeError> {
        let size = self.parser.read_u8()?;
        let identifier = self.parser.read_bytes(usize::from(size))?;
        let data = self.parser.read_sub_blocks()?;

        let is_looping = LOOPING_APPLICATIONS
            .iter()
            .any(|application| identifier == application.as_slice());

        match (is_looping, data.as_slice()) {
            (true, [1, low, high, ..]) => {
                let loop_count = u16::from_le_bytes([*low, *high]);
                debug!("loop count: {loop_count}");
                self.loop_count = Some(loop_count);
            }
            _ => {
                let identifier = String::from_utf8_lossy(identifier);
                debug!("skipping application extension {identifier:?}");
            }
        }

        Ok(())
    }

    fn read_image(&mut self, index: usize, control: GraphicControl) -> Result<Frame, DecodeError> {
        let descriptor = ImageDescriptor::parse(&mut self.parser)?;

        let local_palette = descriptor
            .local_table_len()
            .map(|len| read_palette(&mut self.parser, len))
            .transpose()?;

        let code_size = self.parser.read_u8()?;
        if !CODE_SIZES.contains(&code_size) {
            return Err(DecodeError::InvalidCodeSize {
                size: code_size,
                frame: None,
            });
        }

        let data = self.parser.read_sub_blocks()?;
        let mut pixels = decompress(&data, code_size, descriptor.pixel_count(), self.strict)?;

        let expected = descriptor.pixel_count();
        if pixels.len() != expected {
            if self.strict {
                return Err(DecodeError::PixelCountMismatch {
                    expected,
                    actual: pixels.len(),
                    frame: None,
                });
            }

            warn!("frame {index} has {} pixels instead of {expected}", pixels.len());
            pixels.resize(expected, control.transparent_index.unwrap_or(0));
        }

        if descriptor.is_interlaced() {
            pixels = deinterlace(&pixels, descriptor.width.into(), descriptor.height.into());
        }

        match local_palette.as_ref().or(self.global_palette.as_ref()) {
            None if self.strict => return Err(DecodeError::MissingPalette { frame: None }),
            None => warn!("frame {index} has no local or global color table"),
            Some(palette) => match control.transparent_index {
                Some(transparent) if !palette.contains_index(transparent) => {
                    if self.strict {
                        return Err(DecodeError::TransparencyOutOfRange {
                            index: transparent,
                            palette_len: palette.len(),
                            frame: None,
                        });
                    }
                    warn!(
                        "frame {index} transparency index {transparent} is outside a palette of \
                        {} colors",
                        palette.len()
                    );
                }
                _ => {}
            },
        }

        debug!(
            "frame {index}: {}x{} at ({}, {}), delay {}, disposal {}, transparency {:?}, local \
            palette {:?}",
            descriptor.width,
            descriptor.height,
            descriptor.left,
            descriptor.top,
            control.delay,
            control.disposal,
            control.transparent_index,
            local_palette.as_ref().map(Palette::len),
        );

        Ok(Frame::new(descriptor.width, descriptor.height, pixels)
            .with_index(index)
            .with_position(descriptor.left, descriptor.top)
            .with_local_palette(local_palette)
            .with_transparent_index(control.transparent_index)
            .with_disposal(control.disposal)
            .with_delay(control.delay))
    }
}

impl Iterator for Decoder<'_> {
    type Item = Result<Frame, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let index = self.next_index;
        match self.next_frame(index) {
            Ok(Some(frame)) => {
                self.next_index += 1;
                Some(Ok(frame))
            }
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err.at_frame(index)))
            }
        }
    }
}

impl FusedIterator for Decoder<'_> {}

/// Check if the data starts with a valid signature (A.K.A. magic number).
///
/// Both `GIF89a` and the older `GIF87a` are accepted; the block structure is the same, 87a
/// streams just never contain extensions.
fn validate_signature(parser: &mut Parser) -> Result<(), DecodeError> {
    let signature = parser.read_array::<6>().map_err(|_| {
        let mut signature = [0; 6];
        let available = parser.bytes_remaining().min(6);
        if let Ok(bytes) = parser.read_bytes(available) {
            signature[..available].copy_from_slice(bytes);
        }
        DecodeError::MalformedHeader { signature }
    })?;

    if &signature != SIGNATURE_89A && &signature != SIGNATURE_87A {
        return Err(DecodeError::MalformedHeader { signature });
    }

    Ok(())
}

/// Read a color table of `len` entries.
fn read_palette(parser: &mut Parser, len: usize) -> Result<Palette, DecodeError> {
    let bytes = parser.read_bytes(len * 3)?;
    Ok(Palette::from_table(bytes))
}

/// Decompress the concatenated image sub-blocks into palette indices.
///
/// Decoding stops once `expected` indices are produced, whatever the stream still holds.
fn decompress(
    data: &[u8],
    code_size: u8,
    expected: usize,
    strict: bool,
) -> Result<Vec<u8>, DecodeError> {
    let mut decoder = weezl::decode::Decoder::new(BitOrder::Lsb, code_size);
    let mut buffer = [0; 4096];
    let mut pixels = Vec::new();
    let mut input = data;

    while pixels.len() < expected {
        let result = decoder.decode_bytes(input, &mut buffer);
        input = &input[result.consumed_in..];

        let wanted = result.consumed_out.min(expected - pixels.len());
        pixels.extend_from_slice(&buffer[..wanted]);

        match result.status {
            Ok(LzwStatus::Ok) => {}
            Ok(LzwStatus::Done | LzwStatus::NoProgress) => break,
            Err(source) if strict => {
                return Err(DecodeError::Lzw {
                    source,
                    frame: None,
                });
            }
            Err(source) => {
                warn!("corrupt pixel data after {} pixels: {source}", pixels.len());
                break;
            }
        }
    }

    Ok(pixels)
}

/// Reorder the rows of an interlaced image.
///
/// Interlaced images store every 8th row starting at 0, then every 8th starting at 4, every 4th
/// starting at 2 and finally every 2nd starting at 1.
fn deinterlace(pixels: &[u8], width: usize, height: usize) -> Vec<u8> {
    const PASSES: [(usize, usize); 4] = [(0, 8), (4, 8), (2, 4), (1, 2)];

    if width == 0 || height == 0 {
        return pixels.to_vec();
    }

    let mut output = vec![0; pixels.len()];
    let mut rows = pixels.chunks_exact(width);

    for (start, step) in PASSES {
        for y in (start..height).step_by(step) {
            if let Some(row) = rows.next() {
                output[y * width..(y + 1) * width].copy_from_slice(row);
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DisposalMethod, Rgb};

    /// A 1x1 GIF with a white/black global palette and a transparent pixel.
    const SMALLEST: [u8; 43] = [
        b'G', b'I', b'F', b'8', b'9', b'a', // Signature
        1, 0, 1, 0, // Logical screen 1x1
        0x80, // Global table of 2 colors
        0, 0, // Background index, aspect ratio
        0xFF, 0xFF, 0xFF, 0, 0, 0, // Global palette
        0x21, 0xF9, 4, 0x01, 0, 0, 0, 0, // Graphic control, transparent index 0
        0x2C, 0, 0, 0, 0, 1, 0, 1, 0, 0, // Image descriptor 1x1
        2, // LZW minimum code size
        2, 0x44, 0x01, 0, // Clear, 0, end
        0x3B, // Trailer
    ];

    /// The header of a `width`x`height` GIF with an 8-color global palette.
    fn header(width: u16, height: u16) -> Vec<u8> {
        let mut data = b"GIF89a".to_vec();
        data.extend_from_slice(&width.to_le_bytes());
        data.extend_from_slice(&height.to_le_bytes());
        data.extend_from_slice(&[0x82, 0, 0]);
        data.extend((0..8u8).flat_map(|i| [i * 30, i * 30, i * 30]));
        data
    }

    fn control(transparent_index: Option<u8>, delay: u16) -> Vec<u8> {
        let [low, high] = delay.to_le_bytes();
        vec![
            0x21,
            0xF9,
            4,
            u8::from(transparent_index.is_some()),
            low,
            high,
            transparent_index.unwrap_or(0),
            0,
        ]
    }

    /// An image descriptor at `(0, 0)` followed by `pixels` compressed with code size 3.
    fn image(width: u16, height: u16, flags: u8, pixels: &[u8]) -> Vec<u8> {
        let mut data = vec![0x2C, 0, 0, 0, 0];
        data.extend_from_slice(&width.to_le_bytes());
        data.extend_from_slice(&height.to_le_bytes());
        data.extend_from_slice(&[flags, 3]);

        let compressed = weezl::encode::Encoder::new(BitOrder::Lsb, 3)
            .encode(pixels)
            .expect("expected test pixels to compress");
        for chunk in compressed.chunks(255) {
            data.push(u8::try_from(chunk.len()).expect("expected chunks of at most 255 bytes"));
            data.extend_from_slice(chunk);
        }
        data.push(0);
        data
    }

    fn gif(width: u16, height: u16, blocks: &[Vec<u8>]) -> Vec<u8> {
        let mut data = header(width, height);
        for block in blocks {
            data.extend_from_slice(block);
        }
        data.push(0x3B);
        data
    }

    #[test]
    fn signature() {
        let mut parser = Parser::new(b"GIF89a");
        validate_signature(&mut parser).expect("expected hardcoded bytes to be valid");

        let mut parser = Parser::new(b"GIF87a");
        validate_signature(&mut parser).expect("expected hardcoded bytes to be valid");
    }

    #[test]
    fn malformed_signature() {
        let err = AnimationDocument::from_bytes(b"PNG\x89ab").expect_err("expected bad signature");
        assert!(matches!(
            err,
            DecodeError::MalformedHeader { signature } if &signature == b"PNG\x89ab"
        ));

        let err = AnimationDocument::from_bytes(b"GIF").expect_err("expected short signature");
        assert!(matches!(
            err,
            DecodeError::MalformedHeader { signature } if signature == *b"GIF\0\0\0"
        ));
    }

    #[test]
    fn smallest_gif() {
        let document =
            AnimationDocument::from_bytes_strict(&SMALLEST).expect("expected valid GIF");

        assert_eq!((document.width(), document.height()), (1, 1));
        assert_eq!(document.len(), 1);
        assert_eq!(document.loop_count(), None);

        let palette = document.global_palette().expect("expected a global palette");
        assert_eq!(palette.colors(), [Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)]);

        let frame = &document.frames()[0];
        assert_eq!(frame.pixels(), [0]);
        assert_eq!(frame.transparent_index(), Some(0));
        assert_eq!(frame.disposal(), DisposalMethod::None);
        assert_eq!(frame.local_palette(), None);
    }

    #[test]
    fn lazy_frames() {
        let mut decoder = Decoder::new(&SMALLEST).expect("expected valid header");
        assert_eq!(decoder.width(), 1);

        let frame = decoder
            .next()
            .expect("expected one frame")
            .expect("expected frame to decode");
        assert_eq!(frame.index(), 0);
        assert!(decoder.next().is_none());
        assert!(decoder.next().is_none());
    }

    #[test]
    fn truncated_image_reports_frame() {
        let data = &SMALLEST[..SMALLEST.len() - 4];
        let err = AnimationDocument::from_bytes(data).expect_err("expected truncated data");

        assert!(matches!(err, DecodeError::TruncatedData { frame: Some(0), .. }));
        assert_eq!(err.frame(), Some(0));
    }

    #[test]
    fn missing_trailer() {
        let data = &SMALLEST[..SMALLEST.len() - 1];

        let document = AnimationDocument::from_bytes(data).expect("expected lenient decode");
        assert_eq!(document.len(), 1);

        let err = AnimationDocument::from_bytes_strict(data).expect_err("expected strict failure");
        assert!(matches!(err, DecodeError::TruncatedData { frame: Some(1), .. }));
    }

    #[test]
    fn unknown_extension() {
        // Insert an extension with label 0x42 and one sub-block before the image.
        let mut data = SMALLEST[..19].to_vec();
        data.extend_from_slice(&[0x21, 0x42, 2, 0xAA, 0xBB, 0]);
        data.extend_from_slice(&SMALLEST[19..]);

        let err = AnimationDocument::from_bytes_strict(&data).expect_err("expected rejection");
        assert!(matches!(
            err,
            DecodeError::UnsupportedExtension { label: 0x42, frame: Some(0) }
        ));

        let document = AnimationDocument::from_bytes(&data).expect("expected lenient decode");
        assert_eq!(document.frames()[0].pixels(), [0]);
    }

    #[test]
    fn looping_extension() {
        let mut data = SMALLEST[..19].to_vec();
        data.extend_from_slice(&[0x21, 0xFF, 11]);
        data.extend_from_slice(b"NETSCAPE2.0");
        data.extend_from_slice(&[3, 1, 5, 0, 0]);
        data.extend_from_slice(&SMALLEST[19..]);

        let document = AnimationDocument::from_bytes_strict(&data).expect("expected valid GIF");
        assert_eq!(document.loop_count(), Some(5));
    }

    #[test]
    fn invalid_code_size() {
        let mut data = SMALLEST;
        data[37] = 12;

        let err = AnimationDocument::from_bytes(&data).expect_err("expected bad code size");
        assert!(matches!(err, DecodeError::InvalidCodeSize { size: 12, frame: Some(0) }));
    }

    #[test]
    fn transparency_outside_palette() {
        let mut data = SMALLEST;
        data[25] = 9;

        let err = AnimationDocument::from_bytes_strict(&data).expect_err("expected rejection");
        assert!(matches!(
            err,
            DecodeError::TransparencyOutOfRange { index: 9, palette_len: 2, frame: Some(0) }
        ));

        let document = AnimationDocument::from_bytes(&data).expect("expected lenient decode");
        assert_eq!(document.frames()[0].transparent_index(), Some(9));
    }

    #[test]
    fn missing_palette() {
        let mut data = SMALLEST[..10].to_vec();
        data.extend_from_slice(&[0, 0, 0]);
        data.extend_from_slice(&SMALLEST[19..]);

        let err = AnimationDocument::from_bytes_strict(&data).expect_err("expected rejection");
        assert!(matches!(err, DecodeError::MissingPalette { frame: Some(0) }));

        let document = AnimationDocument::from_bytes(&data).expect("expected lenient decode");
        assert!(document.global_palette().is_none());
    }

    #[test]
    fn interlaced_rows() {
        let width = 2;
        let height = 8;
        // Stored row order: 0, 4, 2, 6, 1, 3, 5, 7.
        let stored = [0, 4, 2, 6, 1, 3, 5, 7]
            .iter()
            .flat_map(|&row| [row, row])
            .collect::<Vec<u8>>();

        let rows = deinterlace(&stored, width, height);
        let expected = (0..8).flat_map(|row| [row, row]).collect::<Vec<u8>>();
        assert_eq!(rows, expected);
    }

    #[test]
    fn interlaced_image() {
        let stored = [0, 4, 2, 6, 1, 3, 5, 7];
        let data = gif(1, 8, &[image(1, 8, 0x40, &stored)]);

        let mut decoder = Decoder::new_strict(&data).expect("expected valid header");
        let frame = decoder
            .next()
            .expect("expected one frame")
            .expect("expected frame to decode");
        assert_eq!(frame.pixels(), [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn short_pixel_data() {
        let data = gif(2, 2, &[control(Some(3), 0), image(2, 2, 0, &[0, 1])]);

        let err = AnimationDocument::from_bytes_strict(&data).expect_err("expected rejection");
        assert!(matches!(
            err,
            DecodeError::PixelCountMismatch { expected: 4, actual: 2, frame: Some(0) }
        ));

        // Missing pixels are filled with the transparency index.
        let document = AnimationDocument::from_bytes(&data).expect("expected lenient decode");
        assert_eq!(document.frames()[0].pixels(), [0, 1, 3, 3]);
    }

    #[test]
    fn pixel_data_stops_at_frame_size() {
        let compressed = weezl::encode::Encoder::new(BitOrder::Lsb, 2)
            .encode(&vec![0; 1_000_000])
            .expect("expected pixels to compress");

        let pixels = decompress(&compressed, 2, 16, true).expect("expected valid pixel data");
        assert_eq!(pixels.len(), 16);

        let data = gif(1, 1, &[image(1, 1, 0, &[5; 10_000])]);
        let document = AnimationDocument::from_bytes_strict(&data).expect("expected valid GIF");
        assert_eq!(document.frames()[0].pixels(), [5]);
    }

    #[test]
    fn plain_text_consumes_graphic_control() {
        let mut plain_text = vec![0x21, 0x01, 12];
        plain_text.extend_from_slice(&[0; 12]);
        plain_text.extend_from_slice(&[2, b'h', b'i', 0]);

        let data = gif(1, 1, &[control(Some(1), 7), plain_text, image(1, 1, 0, &[2])]);
        let document = AnimationDocument::from_bytes_strict(&data).expect("expected valid GIF");

        let frame = &document.frames()[0];
        assert_eq!(frame.transparent_index(), None);
        assert_eq!(frame.delay(), 0);
    }

    #[test]
    fn later_graphic_control_wins() {
        let data = gif(1, 1, &[control(Some(1), 5), control(None, 9), image(1, 1, 0, &[2])]);
        let document = AnimationDocument::from_bytes_strict(&data).expect("expected valid GIF");

        let frame = &document.frames()[0];
        assert_eq!(frame.transparent_index(), None);
        assert_eq!(frame.delay(), 9);
    }

    #[test]
    fn empty_graphic_control() {
        let mut data = SMALLEST[..19].to_vec();
        data.extend_from_slice(&[0x21, 0xF9, 0]);
        data.extend_from_slice(&SMALLEST[27..]);

        let err = AnimationDocument::from_bytes_strict(&data).expect_err("expected rejection");
        assert!(matches!(
            err,
            DecodeError::InvalidBlockSize { label: 0xF9, expected: 4, actual: 0, frame: Some(0) }
        ));

        let document = AnimationDocument::from_bytes(&data).expect("expected lenient decode");
        assert_eq!(document.len(), 1);
        assert_eq!(document.frames()[0].transparent_index(), None);
    }
}
