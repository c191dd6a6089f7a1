use std::io::{self, Write as _};
use std::path::PathBuf;

use anim::AnimationDocument;
use anyhow::Context as _;

use crate::commands::{Run, write_atomic};
use crate::context::Context;
use crate::report;

#[derive(Debug, Clone, clap::Args)]
pub struct Inspect {
    /// The GIF to inspect.
    input: PathBuf,

    /// Print the frame structure instead of the delay report.
    #[clap(long)]
    frames: bool,

    /// Write the report to a file instead of stdout.
    #[clap(short, long)]
    output: Option<PathBuf>,

    #[clap(long)]
    strict: bool,
}

impl Run for Inspect {
    fn run(&self, _ctx: &mut Context) -> anyhow::Result<()> {
        let document = AnimationDocument::open(&self.input, self.strict)
            .with_context(|| format!("failed to decode {}", self.input.display()))?;

        let contents = if self.frames {
            report::summary(&document)
        } else {
            report::delay_report(&document, &[])
        };

        match self.output {
            Some(ref path) => write_atomic(path, contents.as_bytes()),
            None => {
                let mut stdout = io::stdout().lock();
                stdout
                    .write_all(contents.as_bytes())
                    .context("failed to write to stdout")
            }
        }
    }
}
