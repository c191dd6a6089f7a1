use std::{error, fmt};

use bytemuck::{Pod, Zeroable};

/// The largest number of entries a GIF color table can hold.
pub const MAX_PALETTE_LEN: usize = 256;

/// A single palette entry.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// An ordered color table of 1 to 256 entries.
///
/// GIF color tables always hold a power of two entries. A palette of any other length is padded
/// with black when written, so palettes read back from a file always have a power-of-two length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Create a palette from a list of colors.
    ///
    /// # Errors
    ///
    /// This function returns an error if:
    ///
    /// - `colors` is empty.
    /// - `colors` holds more than 256 entries.
    pub fn new(colors: Vec<Rgb>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }

        if colors.len() > MAX_PALETTE_LEN {
            return Err(PaletteError::TooLarge { len: colors.len() });
        }

        Ok(Self { colors })
    }

    /// Create a palette from packed `r, g, b` triples.
    ///
    /// # Errors
    ///
    /// This function returns an error if:
    ///
    /// - The length of `bytes` is not a multiple of 3.
    /// - The resulting palette would be empty or hold more than 256 entries.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PaletteError> {
        if !bytes.len().is_multiple_of(3) {
            return Err(PaletteError::Misaligned { len: bytes.len() });
        }

        Self::new(bytemuck::cast_slice::<u8, Rgb>(bytes).to_vec())
    }

    /// Build a palette from a color table read out of a GIF stream.
    ///
    /// The decoder only ever passes tables of `2 << n` entries (`n <= 7`), so the length checks of
    /// [`Self::new`] cannot fail here.
    pub(crate) fn from_table(bytes: &[u8]) -> Self {
        let whole = bytes.len() - bytes.len() % 3;
        let mut colors = bytemuck::cast_slice::<u8, Rgb>(&bytes[..whole]).to_vec();
        colors.truncate(MAX_PALETTE_LEN);

        if colors.is_empty() {
            colors.push(Rgb::default());
        }

        Self { colors }
    }

    /// The number of colors in the palette.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; a palette holds at least one color.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The colors of the palette, in table order.
    #[must_use]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// The color at `index`, if the palette defines one.
    #[must_use]
    pub fn get(&self, index: u8) -> Option<Rgb> {
        self.colors.get(usize::from(index)).copied()
    }

    /// Whether `index` refers to a defined entry.
    #[must_use]
    pub fn contains_index(&self, index: u8) -> bool {
        usize::from(index) < self.colors.len()
    }

    /// The smallest `n >= 1` such that `2^n` entries can hold the whole palette.
    pub(crate) fn table_bits(&self) -> u8 {
        let mut bits = 1;
        while (1_usize << bits) < self.colors.len() {
            bits += 1;
        }
        bits
    }

    /// The palette as a GIF color table: packed triples, padded to `2^table_bits` entries.
    pub(crate) fn to_table_bytes(&self) -> Vec<u8> {
        let mut colors = self.colors.clone();
        colors.resize(1 << self.table_bits(), Rgb::default());
        bytemuck::cast_slice::<Rgb, u8>(&colors).to_vec()
    }
}

/// Indicates a list of colors cannot be used as a [`Palette`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// The palette has no colors.
    Empty,

    /// The palette has more colors than a GIF color table can hold.
    TooLarge {
        /// The number of colors received.
        len: usize,
    },

    /// The byte length is not a multiple of 3.
    Misaligned {
        /// The number of bytes received.
        len: usize,
    },
}

impl error::Error for PaletteError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Empty => f.write_str("palette has no colors"),
            Self::TooLarge { len } => {
                write!(f, "expected at most {MAX_PALETTE_LEN} colors, got {len}")
            }
            Self::Misaligned { len } => {
                write!(f, "expected palette bytes to be a multiple of 3, got {len}")
            }
        }
    }
}

/// How a frame's region is treated before the next frame is drawn.
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DisposalMethod {
    /// No disposal specified.
    #[default]
    None = 0,
    /// Leave the frame in place.
    DoNotDispose = 1,
    /// Clear the frame's region to the background color.
    RestoreBackground = 2,
    /// Restore the region to what it was before the frame was drawn.
    RestorePrevious = 3,
}

impl DisposalMethod {
    /// Convert the 3-bit disposal field of a Graphic Control Extension.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::DoNotDispose),
            2 => Some(Self::RestoreBackground),
            3 => Some(Self::RestorePrevious),
            _ => None,
        }
    }

    /// The value stored in the disposal field of a Graphic Control Extension.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for DisposalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::None => f.write_str("none"),
            Self::DoNotDispose => f.write_str("do-not-dispose"),
            Self::RestoreBackground => f.write_str("restore-background"),
            Self::RestorePrevious => f.write_str("restore-previous"),
        }
    }
}

/// Represents a frame of the animation.
///
/// The pixel buffer holds `width * height` palette indices in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    index: usize,
    left: u16,
    top: u16,
    width: u16,
    height: u16,
    pixels: Vec<u8>,
    local_palette: Option<Palette>,
    transparent_index: Option<u8>,
    disposal: DisposalMethod,
    delay: u16,
}

impl Frame {
    /// Create a frame at position `(0, 0)` without a palette, transparency or delay.
    #[must_use]
    pub const fn new(width: u16, height: u16, pixels: Vec<u8>) -> Self {
        Self {
            index: 0,
            left: 0,
            top: 0,
            width,
            height,
            pixels,
            local_palette: None,
            transparent_index: None,
            disposal: DisposalMethod::None,
            delay: 0,
        }
    }

    #[must_use]
    pub(crate) fn with_index(self, index: usize) -> Self {
        Self { index, ..self }
    }

    /// Place the frame on the logical screen.
    #[must_use]
    pub fn with_position(self, left: u16, top: u16) -> Self {
        Self { left, top, ..self }
    }

    /// Set (or clear) the frame's own color table.
    #[must_use]
    pub fn with_local_palette(self, local_palette: Option<Palette>) -> Self {
        Self {
            local_palette,
            ..self
        }
    }

    /// Set (or clear) the palette slot drawn as fully transparent.
    #[must_use]
    pub fn with_transparent_index(self, transparent_index: Option<u8>) -> Self {
        Self {
            transparent_index,
            ..self
        }
    }

    /// Set the disposal method.
    #[must_use]
    pub fn with_disposal(self, disposal: DisposalMethod) -> Self {
        Self { disposal, ..self }
    }

    /// Set the delay, in hundredths of a second.
    #[must_use]
    pub fn with_delay(self, delay: u16) -> Self {
        Self { delay, ..self }
    }

    /// Position of the frame within its document.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Offset of the frame from the left edge of the logical screen.
    #[must_use]
    pub const fn left(&self) -> u16 {
        self.left
    }

    /// Offset of the frame from the top edge of the logical screen.
    #[must_use]
    pub const fn top(&self) -> u16 {
        self.top
    }

    /// Width of the frame in pixels.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height of the frame in pixels.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Palette indices, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The frame's own color table, if it has one.
    #[must_use]
    pub const fn local_palette(&self) -> Option<&Palette> {
        self.local_palette.as_ref()
    }

    /// The palette slot drawn as fully transparent, if any.
    #[must_use]
    pub const fn transparent_index(&self) -> Option<u8> {
        self.transparent_index
    }

    /// How the frame is disposed of before the next one is drawn.
    #[must_use]
    pub const fn disposal(&self) -> DisposalMethod {
        self.disposal
    }

    /// Delay in hundredths of a second.
    #[must_use]
    pub const fn delay(&self) -> u16 {
        self.delay
    }

    /// Delay in milliseconds.
    #[must_use]
    pub fn delay_ms(&self) -> u32 {
        u32::from(self.delay) * 10
    }

    /// The number of pixels the frame's dimensions call for.
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// An animated GIF: a logical screen, an optional global palette and an ordered list of frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationDocument {
    width: u16,
    height: u16,
    background_index: u8,
    global_palette: Option<Palette>,
    loop_count: Option<u16>,
    frames: Vec<Frame>,
}

impl AnimationDocument {
    /// Create an empty document for a logical screen of the given size.
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            background_index: 0,
            global_palette: None,
            loop_count: None,
            frames: Vec::new(),
        }
    }

    /// Set (or clear) the palette shared by frames without a local palette.
    #[must_use]
    pub fn with_global_palette(self, global_palette: Option<Palette>) -> Self {
        Self {
            global_palette,
            ..self
        }
    }

    /// Set the global palette index used as the background color.
    #[must_use]
    pub fn with_background_index(self, background_index: u8) -> Self {
        Self {
            background_index,
            ..self
        }
    }

    /// Set the loop count; `Some(0)` loops forever, `None` omits the looping extension.
    #[must_use]
    pub fn with_loop_count(self, loop_count: Option<u16>) -> Self {
        Self { loop_count, ..self }
    }

    /// Replace the frames of the document.
    #[must_use]
    pub fn with_frames(mut self, frames: Vec<Frame>) -> Self {
        self.frames.clear();
        for frame in frames {
            self.push_frame(frame);
        }
        self
    }

    /// Append a frame, assigning it the next index.
    pub fn push_frame(&mut self, frame: Frame) {
        let index = self.frames.len();
        self.frames.push(frame.with_index(index));
    }

    /// Width of the logical screen.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height of the logical screen.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Global palette index of the background color.
    #[must_use]
    pub const fn background_index(&self) -> u8 {
        self.background_index
    }

    /// The palette shared by frames without a local palette.
    #[must_use]
    pub const fn global_palette(&self) -> Option<&Palette> {
        self.global_palette.as_ref()
    }

    /// How many times the animation repeats, if a looping extension is present.
    #[must_use]
    pub const fn loop_count(&self) -> Option<u16> {
        self.loop_count
    }

    /// The frames, in display order.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The frame at `index`, if there is one.
    #[must_use]
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// The number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the document has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The palette `frame` is drawn with: its local palette, else the global one.
    #[must_use]
    pub fn effective_palette<'a>(&'a self, frame: &'a Frame) -> Option<&'a Palette> {
        frame.local_palette().or(self.global_palette.as_ref())
    }

    /// Sum of all frame delays, in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.frames.iter().map(|frame| u64::from(frame.delay_ms())).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(len: usize) -> Palette {
        let colors = (0..len)
            .map(|i| {
                let v = u8::try_from(i).expect("expected test palettes to fit in u8");
                Rgb::new(v, v, v)
            })
            .collect();
        Palette::new(colors).expect("expected test palette to be valid")
    }

    #[test]
    fn palette_limits() {
        assert_eq!(Palette::new(Vec::new()), Err(PaletteError::Empty));
        assert_eq!(
            Palette::new(vec![Rgb::default(); 257]),
            Err(PaletteError::TooLarge { len: 257 })
        );
        assert_eq!(
            Palette::from_bytes(&[1, 2, 3, 4]),
            Err(PaletteError::Misaligned { len: 4 })
        );

        let palette = Palette::from_bytes(&[1, 2, 3, 4, 5, 6]).expect("expected two colors");
        assert_eq!(palette.get(1), Some(Rgb::new(4, 5, 6)));
        assert_eq!(palette.get(2), None);
    }

    #[test]
    fn table_bytes_are_padded_to_a_power_of_two() {
        assert_eq!(gray(1).table_bits(), 1);
        assert_eq!(gray(2).table_bits(), 1);
        assert_eq!(gray(3).table_bits(), 2);
        assert_eq!(gray(256).table_bits(), 8);

        let table = gray(3).to_table_bytes();
        assert_eq!(table, [0, 0, 0, 1, 1, 1, 2, 2, 2, 0, 0, 0]);
    }

    #[test]
    fn effective_palette_prefers_local() {
        let global = gray(4);
        let local = gray(16);
        let document = AnimationDocument::new(1, 1)
            .with_global_palette(Some(global.clone()))
            .with_frames(vec![
                Frame::new(1, 1, vec![0]),
                Frame::new(1, 1, vec![0]).with_local_palette(Some(local.clone())),
            ]);

        assert_eq!(document.effective_palette(&document.frames()[0]), Some(&global));
        assert_eq!(document.effective_palette(&document.frames()[1]), Some(&local));
        assert_eq!(document.frames()[1].index(), 1);
    }

    #[test]
    fn disposal_field() {
        assert_eq!(DisposalMethod::from_u8(2), Some(DisposalMethod::RestoreBackground));
        assert_eq!(DisposalMethod::from_u8(5), None);
        assert_eq!(DisposalMethod::RestorePrevious.as_u8(), 3);
    }
}
