use std::path::{Path, PathBuf};

/// A sampler project: a directory holding `Sampler.toml` and its build output.
#[derive(Debug, Clone)]
pub struct Package {
    path: PathBuf,
    build: Build,
}

impl Package {
    pub fn new(path: PathBuf) -> Self {
        let build = Build::new(path.join("build"));
        Self { path, build }
    }

    pub fn config(&self) -> PathBuf {
        self.path.join("Sampler.toml")
    }

    /// Resolve a path from the configuration against the package directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.path.join(path)
    }

    pub const fn build(&self) -> &Build {
        &self.build
    }
}

#[derive(Debug, Clone)]
pub struct Build {
    path: PathBuf,
}

impl Build {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// One GIF per motion.
    pub fn animations(&self) -> PathBuf {
        self.path.join("animations")
    }

    /// One PNG per source frame.
    pub fn frames(&self) -> PathBuf {
        self.path.join("frames")
    }

    pub fn delays(&self) -> PathBuf {
        self.path.join("delays.txt")
    }
}
