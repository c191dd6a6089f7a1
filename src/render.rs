use anim::{AnimationDocument, Frame};
use anyhow::{Context as _, anyhow};
use image::RgbaImage;

/// Draw a single frame through its effective palette, at the frame's own size.
///
/// Pixels using the transparency index become fully transparent.
pub fn frame_image(document: &AnimationDocument, frame: &Frame) -> anyhow::Result<RgbaImage> {
    let palette = document
        .effective_palette(frame)
        .with_context(|| format!("frame {} has no palette", frame.index()))?;

    let mut buffer = Vec::with_capacity(frame.pixel_count() * 4);
    for (position, &index) in frame.pixels().iter().enumerate() {
        let color = palette.get(index).ok_or_else(|| {
            anyhow!(
                "pixel {position} uses index {index}, outside a palette of {} colors",
                palette.len()
            )
        })?;
        let alpha = if frame.transparent_index() == Some(index) {
            0
        } else {
            u8::MAX
        };

        buffer.extend_from_slice(&[color.r, color.g, color.b, alpha]);
    }

    RgbaImage::from_raw(u32::from(frame.width()), u32::from(frame.height()), buffer)
        .context("pixel buffer does not match the frame dimensions")
}

#[cfg(test)]
mod tests {
    use anim::{Palette, Rgb};

    use super::*;

    #[test]
    fn transparent_pixels() {
        let palette = Palette::new(vec![Rgb::new(10, 20, 30), Rgb::new(40, 50, 60)])
            .expect("expected two colors to be a valid palette");
        let document = AnimationDocument::new(2, 1).with_frames(vec![
            Frame::new(2, 1, vec![0, 1])
                .with_local_palette(Some(palette))
                .with_transparent_index(Some(1)),
        ]);
        let frame = document.frame(0).expect("expected one frame");

        let image = frame_image(&document, frame).expect("expected frame to render");
        assert_eq!(image.dimensions(), (2, 1));
        assert_eq!(image.get_pixel(0, 0).0, [10, 20, 30, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [40, 50, 60, 0]);
    }

    #[test]
    fn index_outside_palette() {
        let palette = Palette::new(vec![Rgb::new(0, 0, 0)])
            .expect("expected one color to be a valid palette");
        let document = AnimationDocument::new(1, 1)
            .with_global_palette(Some(palette))
            .with_frames(vec![Frame::new(1, 1, vec![3])]);
        let frame = document.frame(0).expect("expected one frame");

        assert!(frame_image(&document, frame).is_err());
    }
}
