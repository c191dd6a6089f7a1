use clap::ArgAction;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, clap::Args)]
pub struct Verbosity {
    #[clap(
        short,
        long,
        action = ArgAction::Count,
        help = "Use verbose output (or `-vv` and `-vvv` for more verbose output)",
        global = true,
        overrides_with = "quiet",
    )]
    verbose: u8,

    #[clap(
        short,
        long,
        action = ArgAction::Count,
        help = "Use quiet output (or `-qq` for silent output)",
        global = true,
        overrides_with = "verbose",
    )]
    quiet: u8,
}

impl Verbosity {
    /// Returns a verbosity level based on the number of `-v` and `-q` flags provided.
    pub fn level(&self) -> VerbosityLevel {
        match (self.quiet, self.verbose) {
            (0, 0) => VerbosityLevel::Default,
            (0, 1) => VerbosityLevel::Verbose,
            (0, 2) => VerbosityLevel::ExtraVerbose,
            (0, _) => VerbosityLevel::Trace,
            (1, _) => VerbosityLevel::Quiet,
            _ => VerbosityLevel::Silent,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbosityLevel {
    /// Silence all logging output.
    Silent,

    /// Shows events up to [`ERROR`](tracing::Level::ERROR).
    Quiet,

    /// Shows events up to [`WARN`](tracing::Level::WARN).
    #[default]
    Default,

    /// Shows events up to [`INFO`](tracing::Level::INFO).
    Verbose,

    /// Shows events up to [`DEBUG`](tracing::Level::DEBUG).
    ExtraVerbose,

    /// Shows events up to [`TRACE`](tracing::Level::TRACE).
    Trace,
}

impl VerbosityLevel {
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::Silent => LevelFilter::OFF,
            Self::Quiet => LevelFilter::ERROR,
            Self::Default => LevelFilter::WARN,
            Self::Verbose => LevelFilter::INFO,
            Self::ExtraVerbose => LevelFilter::DEBUG,
            Self::Trace => LevelFilter::TRACE,
        }
    }

    /// A filter that applies this level to the GIF library and to this binary, and silences
    /// everything else.
    pub fn env_filter(self) -> EnvFilter {
        let level_filter = self.level_filter();

        [String::from("anim"), env!("CARGO_CRATE_NAME").to_owned()]
            .into_iter()
            .filter_map(|target| format!("{target}={level_filter}").parse().ok())
            .fold(EnvFilter::default(), EnvFilter::add_directive)
    }

    pub fn is_trace(self) -> bool {
        matches!(self, Self::Trace)
    }

    /// Whether errors should be printed with their full chain of causes.
    pub fn shows_causes(self) -> bool {
        self >= Self::Verbose
    }
}
