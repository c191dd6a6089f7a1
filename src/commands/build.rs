use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write as _};
use std::path::Path;

use anim::split::{self, Motion};
use anim::{AnimationDocument, Frame};
use anyhow::{Context as _, anyhow};
use colored::Colorize as _;
use image::ImageFormat;
use tracing::{debug, error, error_span, info};

use crate::commands::{Run, file_stem, write_atomic};
use crate::context::Context;
use crate::package::Build as BuildDir;
use crate::verbosity::VerbosityLevel;
use crate::{render, report};

#[derive(Debug, Clone, Default, clap::Args)]
pub struct Build {
    #[clap(long)]
    strict: bool,
}

impl Run for Build {
    fn run(&self, ctx: &mut Context) -> anyhow::Result<()> {
        let package = ctx.package()?.clone();
        let config = ctx.config()?;

        let input = package.resolve(config.input());
        let document = AnimationDocument::open(&input, self.strict)
            .with_context(|| format!("failed to decode {}", input.display()))?;
        let motions = split::motions(config.keyframes(), document.len())
            .context("invalid motions in Sampler.toml")?;
        let stem = file_stem(&input)?;

        let build = package.build();
        setup_build_directory(build)?;

        let delays = report::delay_report(&document, &motions);
        write_atomic(&build.delays(), delays.as_bytes())?;

        let mut error_count = extract_frames(&document, &build.frames(), ctx.level);

        for motion in &motions {
            let span = error_span!("", motion = ?motion.name());
            let _guard = span.enter();

            if let Err(err) = process_motion(&document, motion, stem, &build.animations()) {
                error!("failed to process motion: {}", describe(&err, ctx.level));
                error_count += 1;
            }
        }

        if error_count > 0 {
            Err(anyhow!("build finished with ({error_count}) errors"))
        } else {
            let mut stderr = io::stderr();
            writeln!(stderr, "{}", "Successfully built animations!".bold().green())?;

            Ok(())
        }
    }
}

fn setup_build_directory(build: &BuildDir) -> anyhow::Result<()> {
    fs::create_dir_all(build.as_path()).context("failed to create build directory")?;
    info!("created directory: {:#}", build.as_path().display());

    let animations = build.animations();
    fs::create_dir_all(&animations).context("failed to create animations directory")?;
    info!("created directory: {:#}", animations.display());

    let frames = build.frames();
    fs::create_dir_all(&frames).context("failed to create frames directory")?;
    info!("created directory: {:#}", frames.display());

    Ok(())
}

fn process_motion(
    document: &AnimationDocument,
    motion: &Motion,
    stem: &str,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let range = motion.range();
    debug!("splitting frames {}..{}", range.start, range.end);

    let contents = split::split_encoded(document, &[range])
        .context("failed to split animation")?
        .pop()
        .context("expected one animation per motion")?;

    write_atomic(&output_dir.join(motion.file_name(stem)), &contents)
}

/// Export every frame as a PNG, returning the number of frames that failed.
fn extract_frames(
    document: &AnimationDocument,
    output_dir: &Path,
    level: VerbosityLevel,
) -> usize {
    let mut error_count = 0;

    for frame in document.frames() {
        let span = error_span!("", frame = frame.index());
        let _guard = span.enter();

        if let Err(err) = extract_frame(document, frame, output_dir) {
            error!("failed to export frame: {}", describe(&err, level));
            error_count += 1;
        }
    }

    info!("exported {} frames", document.len() - error_count);
    error_count
}

fn extract_frame(
    document: &AnimationDocument,
    frame: &Frame,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let path = output_dir.join(format!("{:0>2}.png", frame.index()));
    let image = render::frame_image(document, frame).context("failed to render frame")?;

    let mut contents = io::Cursor::new(Vec::new());
    image
        .write_to(&mut contents, ImageFormat::Png)
        .context("failed to encode frame")?;
    write_atomic(&path, contents.get_ref())
}

/// The error message, followed by its causes when the output is verbose.
fn describe(err: &anyhow::Error, level: VerbosityLevel) -> String {
    let mut error_message = err.to_string();

    if level.shows_causes() {
        error_message.push('\n');

        for cause in err.chain() {
            _ = writeln!(error_message, "  Cause: {cause}");
        }
    }

    error_message
}

#[cfg(test)]
mod tests {
    use std::env;

    use anim::{Palette, Rgb};

    use super::*;

    #[test]
    fn unrenderable_frames_are_counted() {
        let palette = Palette::new(vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)])
            .expect("expected two colors to be a valid palette");
        let document = AnimationDocument::new(1, 1)
            .with_global_palette(Some(palette))
            .with_frames(vec![
                Frame::new(1, 1, vec![1]),
                Frame::new(1, 1, vec![7]),
                Frame::new(1, 1, vec![0]),
            ]);

        let output_dir =
            env::temp_dir().join(format!("gif-animation-sampler-frames-{}", std::process::id()));
        fs::create_dir_all(&output_dir).expect("expected to create a temporary directory");

        let error_count = extract_frames(&document, &output_dir, VerbosityLevel::Default);
        let exported = ["00.png", "01.png", "02.png"].map(|name| output_dir.join(name).exists());
        _ = fs::remove_dir_all(&output_dir);

        assert_eq!(error_count, 1);
        assert_eq!(exported, [true, false, true]);
    }
}
