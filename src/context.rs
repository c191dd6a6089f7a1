use std::env;

use anyhow::Context as _;

use crate::config::Config;
use crate::package::Package;
use crate::verbosity::VerbosityLevel;

#[derive(Debug, Clone, Default)]
pub struct Context {
    pub config: Option<Config>,
    pub package: Option<Package>,
    pub level: VerbosityLevel,
}

impl Context {
    pub fn with_level(self, level: VerbosityLevel) -> Self {
        Self { level, ..self }
    }

    /// The package in the current directory, located on first use.
    pub fn package(&mut self) -> anyhow::Result<&Package> {
        let package = match self.package.take() {
            Some(package) => package,
            None => {
                let current_dir = env::current_dir().context("failed to get current directory")?;
                Package::new(current_dir)
            }
        };

        Ok(self.package.insert(package))
    }

    /// The package's configuration, read on first use.
    pub fn config(&mut self) -> anyhow::Result<&Config> {
        let config = match self.config.take() {
            Some(config) => config,
            None => {
                let path = self.package()?.config();
                Config::from_file(&path)
                    .with_context(|| format!("failed to load {}", path.display()))?
            }
        };

        Ok(self.config.insert(config))
    }
}
