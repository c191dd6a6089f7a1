use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context as _;

/// The contents of `Sampler.toml`: the animation to work on and its named motions.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    input: PathBuf,

    #[serde(rename = "motion", default = "Vec::new")]
    keyframes: Vec<Keyframe>,
}

impl FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s).context("failed to parse configuration")
    }
}

impl Config {
    pub fn new(input: PathBuf, keyframes: Vec<Keyframe>) -> Self {
        Self { input, keyframes }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).context("failed to read configuration file")?;
        contents.parse()
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("failed to serialize configuration")
    }

    /// Path to the GIF, relative to the directory holding `Sampler.toml`.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// `(start frame, motion name)` pairs.
    pub fn keyframes(&self) -> impl Iterator<Item = (usize, &str)> {
        self.keyframes
            .iter()
            .map(|keyframe| (keyframe.start, keyframe.name.as_str()))
    }
}

/// The first frame of a named motion.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    name: String,
    start: usize,
}

impl Keyframe {
    pub fn new(name: String, start: usize) -> Self {
        Self { name, start }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_motions() {
        let config = r#"
            input = "hero.gif"

            [[motion]]
            name = "idle"
            start = 0

            [[motion]]
            name = "walk"
            start = 4
        "#
        .parse::<Config>()
        .expect("expected hardcoded configuration to be valid");

        assert_eq!(config.input(), Path::new("hero.gif"));
        assert_eq!(
            config.keyframes().collect::<Vec<_>>(),
            [(0, "idle"), (4, "walk")]
        );
    }

    #[test]
    fn motions_are_optional() {
        let config = "input = \"hero.gif\""
            .parse::<Config>()
            .expect("expected hardcoded configuration to be valid");
        assert_eq!(config.keyframes().count(), 0);
    }

    #[test]
    fn serialize_round_trip() {
        let config = Config::new(
            PathBuf::from("hero.gif"),
            vec![Keyframe::new("default".to_owned(), 0)],
        );
        let contents = config.to_toml().expect("expected configuration to serialize");
        let parsed = contents
            .parse::<Config>()
            .expect("expected serialized configuration to parse");

        assert_eq!(parsed.input(), config.input());
        assert_eq!(parsed.keyframes().collect::<Vec<_>>(), [(0, "default")]);
    }
}
