mod build;
mod init;
mod inspect;
mod split;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use tracing::info;

use crate::context::Context;

pub trait Run {
    fn run(&self, ctx: &mut Context) -> anyhow::Result<()>;
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    /// Generate the `Sampler.toml` configuration file for a GIF.
    Init(init::Init),

    /// Print the frames and delays of a GIF.
    Inspect(inspect::Inspect),

    /// Split frame ranges out of a GIF into standalone animations.
    Split(split::Split),

    /// Split the motions configured in `Sampler.toml` and export every frame.
    Build(build::Build),
}

impl Subcommand {
    pub fn run(&self, ctx: &mut Context) -> anyhow::Result<()> {
        let handler: &dyn Run = match *self {
            Self::Init(ref inner) => inner,
            Self::Inspect(ref inner) => inner,
            Self::Split(ref inner) => inner,
            Self::Build(ref inner) => inner,
        };

        handler.run(ctx)
    }
}

/// Write `contents` to a sibling temporary file, then move it over `path`.
///
/// Readers of `path` never observe a partially written file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
    let mut temporary = OsString::from(path.as_os_str());
    temporary.push(".tmp");
    let temporary = PathBuf::from(temporary);

    fs::write(&temporary, contents)
        .with_context(|| format!("failed to write {}", temporary.display()))?;
    fs::rename(&temporary, path)
        .with_context(|| format!("failed to move file into place: {}", path.display()))?;

    info!("created file: {:#}", path.display());
    Ok(())
}

pub fn file_stem(path: &Path) -> anyhow::Result<&str> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .context("expected path to be valid unicode")
}
