/// Build configuration, loaded from RON.
///
/// ```ron
/// (
///     scenes_dir: "content/scenes",
///     output_file: "web/js/story.js",
///     format: Js,
/// )
/// ```
///
/// Missing fields take their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::output::OutputFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory searched recursively for scene files.
    pub scenes_dir: PathBuf,
    pub output_file: PathBuf,
    /// Scene file extension, without the dot.
    pub extension: String,
    /// Variable the JavaScript output assigns the story to.
    pub variable_name: String,
    pub format: OutputFormat,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            scenes_dir: PathBuf::from("scenes"),
            output_file: PathBuf::from("js/story.js"),
            extension: "md".to_string(),
            variable_name: "story".to_string(),
            format: OutputFormat::Js,
        }
    }
}

impl BuildConfig {
    /// Load a config from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<BuildConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a config from a RON string.
    pub fn parse_ron(input: &str) -> Result<BuildConfig, ConfigError> {
        Ok(ron::from_str(input)?)
    }

    /// Resolve relative paths against a project root.
    pub fn rooted_at(mut self, root: &Path) -> Self {
        if self.scenes_dir.is_relative() {
            self.scenes_dir = root.join(&self.scenes_dir);
        }
        if self.output_file.is_relative() {
            self.output_file = root.join(&self.output_file);
        }
        self
    }
}
