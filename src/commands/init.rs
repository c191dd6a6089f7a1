use std::io::{self, Write as _};
use std::path::PathBuf;

use anim::AnimationDocument;
use anyhow::{Context as _, bail};
use colored::Colorize as _;
use tracing::info;

use crate::commands::{Run, write_atomic};
use crate::config::{Config, Keyframe};
use crate::context::Context;

#[derive(Debug, Clone, clap::Args)]
pub struct Init {
    /// The GIF to sample, relative to the current directory.
    input: PathBuf,

    /// Overwrite an existing `Sampler.toml`.
    #[clap(long)]
    force: bool,
}

impl Run for Init {
    fn run(&self, ctx: &mut Context) -> anyhow::Result<()> {
        let path = ctx.package()?.config();

        if path.exists() && !self.force {
            bail!("{} already exists (use --force to overwrite)", path.display());
        }

        let document = AnimationDocument::open(&self.input, false)
            .with_context(|| format!("failed to decode {}", self.input.display()))?;
        info!("found {} frames", document.len());

        let config = Config::new(
            self.input.clone(),
            vec![Keyframe::new("default".to_owned(), 0)],
        );
        write_atomic(&path, config.to_toml()?.as_bytes())?;
        ctx.config = Some(config);

        let mut stderr = io::stderr();
        writeln!(stderr, "{}", "Created Sampler.toml!".bold().green())?;

        Ok(())
    }
}
