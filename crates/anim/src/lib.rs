//! Decode GIF animations, split them into standalone animations, and encode them again.

#![warn(
    missing_docs,
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

mod block;
pub mod de;
mod document;
pub mod ser;
pub mod split;

pub use document::{
    AnimationDocument, DisposalMethod, Frame, MAX_PALETTE_LEN, Palette, PaletteError, Rgb,
};
