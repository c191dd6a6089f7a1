//! The main entry point to the application.

#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

mod commands;
mod config;
mod context;
mod package;
mod render;
mod report;
mod verbosity;

use std::io::Write as _;
use std::process::ExitCode;
use std::{env, io, panic};

use clap::Parser as _;
use colored::Colorize as _;

use crate::context::Context;
use crate::verbosity::{Verbosity, VerbosityLevel};

#[derive(Debug, clap::Parser)]
#[clap(
    about = "Split GIF animations into standalone motions",
    after_help = format!("{}: {}", "Repository".bold(), env!("CARGO_PKG_REPOSITORY")),
    version,
)]
struct Parser {
    #[clap(subcommand)]
    subcommand: commands::Subcommand,

    #[clap(flatten)]
    verbosity: Verbosity,
}

fn main() -> ExitCode {
    try_main().unwrap_or_else(|err| {
        let mut stderr = io::stderr().lock();
        _ = writeln!(stderr, "{}", "gif-animation-sampler failed".bold().red());

        for cause in err.chain() {
            _ = writeln!(stderr, "  {}: {}", "Cause".bold(), cause);
        }

        ExitCode::FAILURE
    })
}

fn try_main() -> anyhow::Result<ExitCode> {
    setup_panic_hook();

    let args = Parser::parse();
    let level = args.verbosity.level();
    setup_tracing(level);

    let mut ctx = Context::default().with_level(level);
    args.subcommand.run(&mut ctx).map(|()| ExitCode::SUCCESS)
}

fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        original_hook(panic_info);

        let args = env::args().collect::<Vec<_>>();
        _ = io::stderr().lock().write_all(panic_report(&args).as_bytes());
    }));
}

/// The bug report banner printed after a panic.
fn panic_report(args: &[String]) -> String {
    let package_name = env!("CARGO_PKG_NAME");
    let repository = env!("CARGO_PKG_REPOSITORY");
    let rule = "=".repeat(78);

    format!(
        "\n{rule}\n\
        {package_name} crashed. This is a bug; please open an issue at:\n\
        \x20 {repository}/issues/new?labels=panic\n\
        \n\
        Attach the GIF you were working on, or the smallest GIF that still crashes, together\n\
        with the output of the same command re-run with RUST_BACKTRACE=1 and -vvv.\n\
        \n\
        Platform: {os} {arch}\n\
        Version: {version}\n\
        Args: {args:?}\n\
        {rule}\n",
        os = env::consts::OS,
        arch = env::consts::ARCH,
        version = env!("CARGO_PKG_VERSION"),
    )
}

fn setup_tracing(level: VerbosityLevel) {
    use tracing_subscriber::prelude::*;

    let registry = tracing_subscriber::registry().with(level.env_filter());
    let layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);

    if level.is_trace() {
        registry
            .with(
                layer
                    .event_format(tracing_subscriber::fmt::format().pretty())
                    .with_thread_ids(true),
            )
            .init();
    } else {
        registry.with(layer).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_report_points_at_issue_tracker() {
        let report = panic_report(&["gif-animation-sampler".to_owned(), "build".to_owned()]);

        assert!(report.contains(&format!(
            "  {}/issues/new?labels=panic",
            env!("CARGO_PKG_REPOSITORY")
        )));
        assert!(report.contains("Attach the GIF"));
        assert!(report.contains(r#"Args: ["gif-animation-sampler", "build"]"#));
    }
}
