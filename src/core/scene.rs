/// Scene assembly: header and body parsing folded into a [`Scene`].

use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::core::body::parse_body;
use crate::core::header::parse_header;
use crate::schema::property::{PropertyTable, PropertyValue, Scalar};
use crate::schema::scene::{Scene, SCENE_FIELDS};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Scene {
    /// Parse one scene document.
    ///
    /// `fallback_id` is used when the header has no usable `id`. Parsing
    /// never fails; malformed lines are skipped.
    pub fn parse(text: &str, fallback_id: &str) -> Scene {
        let (properties, body) = parse_header(text);
        let (text_blocks, choices) = parse_body(body);

        let mut scene = Scene::new(resolve_id(&properties, fallback_id));
        for name in SCENE_FIELDS {
            let value = properties.get(name).filter(|v| v.is_present()).cloned();
            if let Some(slot) = scene.field_mut(name) {
                *slot = value;
            }
        }
        scene.text_blocks = text_blocks;
        scene.choices = choices;
        scene
    }

    /// Read and parse a scene file. The file stem is the fallback id.
    pub fn load_from_file(path: &Path) -> Result<Scene, SceneError> {
        let contents = std::fs::read_to_string(path)?;
        let fallback_id = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(path = %path.display(), "parsing scene file");
        Ok(Self::parse(&contents, &fallback_id))
    }
}

fn resolve_id(properties: &PropertyTable, fallback_id: &str) -> String {
    match properties.get("id").and_then(PropertyValue::as_scalar) {
        Some(id) if !matches!(id, Scalar::Str(s) if s.is_empty()) => id.to_text(),
        _ => fallback_id.to_string(),
    }
}
