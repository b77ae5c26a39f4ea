/// Story output: the generated JavaScript data file or plain JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::story::Story;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// `var <name> = {...};` behind a generated-file banner.
    #[default]
    Js,
    /// The bare JSON object.
    Json,
}

const BANNER: &str = "/**
 * SceneWeaver Story Data
 * Auto-generated by story_builder
 * DO NOT EDIT MANUALLY
 */

";

/// Render a story in the given format.
pub fn render_story(
    story: &Story,
    format: OutputFormat,
    variable_name: &str,
) -> Result<String, OutputError> {
    let json = serde_json::to_string_pretty(story)?;
    Ok(match format {
        OutputFormat::Js => format!("{}var {} = {};\n", BANNER, variable_name, json),
        OutputFormat::Json => format!("{}\n", json),
    })
}

/// Render a story and write it to `path`, creating parent directories.
pub fn write_story(
    story: &Story,
    path: &Path,
    format: OutputFormat,
    variable_name: &str,
) -> Result<(), OutputError> {
    let rendered = render_story(story, format, variable_name)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, rendered)?;
    Ok(())
}
