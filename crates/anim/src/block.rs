//! The fixed-layout blocks of a GIF stream, shared by the decoder and the encoder.

use bitflags::bitflags;
use tracing::debug;

use crate::de::DecodeError;
use crate::de::parser::Parser;
use crate::document::{DisposalMethod, Frame, Palette};
use crate::ser::writer::Writer;

pub const SIGNATURE_89A: &[u8; 6] = b"GIF89a";
pub const SIGNATURE_87A: &[u8; 6] = b"GIF87a";

pub const EXTENSION_INTRODUCER: u8 = 0x21;
pub const IMAGE_SEPARATOR: u8 = 0x2C;
pub const TRAILER: u8 = 0x3B;

pub const PLAIN_TEXT_LABEL: u8 = 0x01;
pub const GRAPHIC_CONTROL_LABEL: u8 = 0xF9;
pub const COMMENT_LABEL: u8 = 0xFE;
pub const APPLICATION_LABEL: u8 = 0xFF;

pub const GRAPHIC_CONTROL_SIZE: u8 = 4;
pub const APPLICATION_SIZE: u8 = 11;

/// Application identifiers whose first sub-block carries a loop count.
pub const LOOPING_APPLICATIONS: [&[u8; 11]; 2] = [b"NETSCAPE2.0", b"ANIMEXTS1.0"];

/// Number of entries in a color table whose size field is `bits`.
pub const fn table_len(bits: u8) -> usize {
    2 << (bits & 0x07)
}

bitflags! {
    /// Packed fields of the logical screen descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ScreenFlags: u8 {
        /// A global color table follows the descriptor.
        const GLOBAL_TABLE = 0x80;
        /// Bits per primary color, minus one.
        const COLOR_RESOLUTION = 0x70;
        /// The global color table is sorted by importance.
        const SORTED = 0x08;
        /// Size of the global color table (`2 << n` entries).
        const TABLE_SIZE = 0x07;
    }
}

bitflags! {
    /// Packed fields of an image descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ImageFlags: u8 {
        /// A local color table follows the descriptor.
        const LOCAL_TABLE = 0x80;
        /// Rows are stored in four interlaced passes.
        const INTERLACED = 0x40;
        /// The local color table is sorted by importance.
        const SORTED = 0x20;
        /// Size of the local color table (`2 << n` entries).
        const TABLE_SIZE = 0x07;
    }
}

bitflags! {
    /// Packed fields of a Graphic Control Extension.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ControlFlags: u8 {
        /// Disposal method, shifted left by 2.
        const DISPOSAL = 0x1C;
        /// Wait for user input before continuing.
        const USER_INPUT = 0x02;
        /// The transparency index field is in use.
        const TRANSPARENT = 0x01;
    }
}

/// The logical screen descriptor, directly after the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenDescriptor {
    pub width: u16,
    pub height: u16,
    pub flags: ScreenFlags,
    pub background_index: u8,
    pub aspect_ratio: u8,
}

impl ScreenDescriptor {
    pub fn parse(parser: &mut Parser) -> Result<Self, DecodeError> {
        Ok(Self {
            width: parser.read_u16()?,
            height: parser.read_u16()?,
            flags: ScreenFlags::from_bits_retain(parser.read_u8()?),
            background_index: parser.read_u8()?,
            aspect_ratio: parser.read_u8()?,
        })
    }

    pub fn new(width: u16, height: u16, global_palette: Option<&Palette>, background: u8) -> Self {
        let (flags, background_index) = global_palette.map_or((ScreenFlags::empty(), 0), |palette| {
            let bits = palette.table_bits() - 1;
            let flags = ScreenFlags::GLOBAL_TABLE
                | ScreenFlags::from_bits_retain(bits << 4) & ScreenFlags::COLOR_RESOLUTION
                | ScreenFlags::from_bits_retain(bits) & ScreenFlags::TABLE_SIZE;
            (flags, background)
        });

        Self {
            width,
            height,
            flags,
            background_index,
            aspect_ratio: 0,
        }
    }

    /// Number of entries in the global color table, if there is one.
    pub fn global_table_len(&self) -> Option<usize> {
        self.flags
            .contains(ScreenFlags::GLOBAL_TABLE)
            .then(|| table_len(self.flags.bits() & ScreenFlags::TABLE_SIZE.bits()))
    }

    pub fn write(&self, writer: &mut Writer) {
        writer.write_u16(self.width);
        writer.write_u16(self.height);
        writer.write_u8(self.flags.bits());
        writer.write_u8(self.background_index);
        writer.write_u8(self.aspect_ratio);
    }
}

/// The image descriptor that opens every frame, without its `0x2C` separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    pub flags: ImageFlags,
}

impl ImageDescriptor {
    pub fn parse(parser: &mut Parser) -> Result<Self, DecodeError> {
        Ok(Self {
            left: parser.read_u16()?,
            top: parser.read_u16()?,
            width: parser.read_u16()?,
            height: parser.read_u16()?,
            flags: ImageFlags::from_bits_retain(parser.read_u8()?),
        })
    }

    /// Describe `frame`, never interlaced.
    pub fn for_frame(frame: &Frame) -> Self {
        let flags = frame
            .local_palette()
            .map_or(ImageFlags::empty(), |palette| {
                let size = ImageFlags::from_bits_retain(palette.table_bits() - 1);
                ImageFlags::LOCAL_TABLE | (size & ImageFlags::TABLE_SIZE)
            });

        Self {
            left: frame.left(),
            top: frame.top(),
            width: frame.width(),
            height: frame.height(),
            flags,
        }
    }

    /// Number of entries in the local color table, if there is one.
    pub fn local_table_len(&self) -> Option<usize> {
        self.flags
            .contains(ImageFlags::LOCAL_TABLE)
            .then(|| table_len(self.flags.bits() & ImageFlags::TABLE_SIZE.bits()))
    }

    pub fn is_interlaced(&self) -> bool {
        self.flags.contains(ImageFlags::INTERLACED)
    }

    pub fn pixel_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    pub fn write(&self, writer: &mut Writer) {
        writer.write_u8(IMAGE_SEPARATOR);
        writer.write_u16(self.left);
        writer.write_u16(self.top);
        writer.write_u16(self.width);
        writer.write_u16(self.height);
        writer.write_u8(self.flags.bits());
    }
}

/// The per-frame settings of a Graphic Control Extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphicControl {
    pub disposal: DisposalMethod,
    pub delay: u16,
    pub transparent_index: Option<u8>,
}

impl GraphicControl {
    /// Decode the four bytes of the extension's fixed block.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        let [packed, delay_low, delay_high, transparent_index] = bytes;
        let flags = ControlFlags::from_bits_retain(packed);

        let raw_disposal = (flags & ControlFlags::DISPOSAL).bits() >> 2;
        let disposal = DisposalMethod::from_u8(raw_disposal).unwrap_or_else(|| {
            debug!("reserved disposal method {raw_disposal}, using none");
            DisposalMethod::None
        });

        Self {
            disposal,
            delay: u16::from_le_bytes([delay_low, delay_high]),
            transparent_index: flags
                .contains(ControlFlags::TRANSPARENT)
                .then_some(transparent_index),
        }
    }

    /// The extension `frame` needs, or `None` when every field has its default value.
    pub fn for_frame(frame: &Frame) -> Option<Self> {
        let control = Self {
            disposal: frame.disposal(),
            delay: frame.delay(),
            transparent_index: frame.transparent_index(),
        };

        (control != Self::default()).then_some(control)
    }

    pub fn write(&self, writer: &mut Writer) {
        let mut flags = ControlFlags::from_bits_retain(self.disposal.as_u8() << 2);
        if self.transparent_index.is_some() {
            flags |= ControlFlags::TRANSPARENT;
        }

        writer.write_u8(EXTENSION_INTRODUCER);
        writer.write_u8(GRAPHIC_CONTROL_LABEL);
        writer.write_u8(GRAPHIC_CONTROL_SIZE);
        writer.write_u8(flags.bits());
        writer.write_u16(self.delay);
        writer.write_u8(self.transparent_index.unwrap_or(0));
        writer.write_u8(0);
    }
}

/// Write the NETSCAPE2.0 application extension that makes the animation repeat.
pub fn write_loop_extension(writer: &mut Writer, loop_count: u16) {
    writer.write_u8(EXTENSION_INTRODUCER);
    writer.write_u8(APPLICATION_LABEL);
    writer.write_u8(APPLICATION_SIZE);
    writer.write_bytes(LOOPING_APPLICATIONS[0]);

    let [low, high] = loop_count.to_le_bytes();
    writer.write_sub_blocks(&[1, low, high]);
}
