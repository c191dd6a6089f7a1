use std::io::{self, Write as _};
use std::ops::Range;
use std::path::PathBuf;
use std::str::FromStr;
use std::{fmt, fs};

use anim::{AnimationDocument, split};
use anyhow::Context as _;
use colored::Colorize as _;

use crate::commands::{Run, file_stem, write_atomic};
use crate::context::Context;

#[derive(Debug, Clone, clap::Args)]
pub struct Split {
    /// The GIF to split.
    input: PathBuf,

    /// Frames to split out, as `start..end` or `start..=end` (0-based, repeatable).
    #[clap(short, long = "range", required = true)]
    ranges: Vec<FrameRange>,

    /// Directory to write the animations to.
    #[clap(short, long, default_value = ".")]
    output: PathBuf,

    #[clap(long)]
    strict: bool,
}

impl Run for Split {
    fn run(&self, _ctx: &mut Context) -> anyhow::Result<()> {
        let document = AnimationDocument::open(&self.input, self.strict)
            .with_context(|| format!("failed to decode {}", self.input.display()))?;
        let stem = file_stem(&self.input)?;

        let ranges = self.ranges.iter().map(FrameRange::range).collect::<Vec<_>>();
        let animations =
            split::split_encoded(&document, &ranges).context("failed to split animation")?;

        fs::create_dir_all(&self.output).context("failed to create output directory")?;
        for (range, contents) in ranges.iter().zip(&animations) {
            let path = self.output.join(split::file_name(stem, range, None));
            write_atomic(&path, contents)?;
        }

        let mut stderr = io::stderr();
        let message = format!("Created ({}) animations!", animations.len());
        writeln!(stderr, "{}", message.bold().green())?;

        Ok(())
    }
}

/// A half-open range of frame indices parsed from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRange(Range<usize>);

impl FrameRange {
    pub fn range(&self) -> Range<usize> {
        self.0.clone()
    }
}

impl FromStr for FrameRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |bound: &str| {
            bound
                .trim()
                .parse::<usize>()
                .map_err(|err| format!("invalid frame index {bound:?}: {err}"))
        };

        if let Some((start, end)) = s.split_once("..=") {
            let end = parse(end)?
                .checked_add(1)
                .ok_or_else(|| format!("frame index too large: {end}"))?;
            Ok(Self(parse(start)?..end))
        } else if let Some((start, end)) = s.split_once("..") {
            Ok(Self(parse(start)?..parse(end)?))
        } else {
            let start = parse(s)?;
            Ok(Self(start..start.saturating_add(1)))
        }
    }
}

impl fmt::Display for FrameRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.0.start, self.0.end)
    }
}
