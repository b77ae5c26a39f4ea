//! WASM bindings for scene-weaver: build story data in the browser.

use wasm_bindgen::prelude::*;

use scene_weaver::core::story::Story;
use scene_weaver::schema::scene::Scene;

/// Parse one scene document and return it as JSON.
#[wasm_bindgen]
pub fn parse_scene(text: &str, fallback_id: &str) -> Result<String, JsError> {
    let scene = Scene::parse(text, fallback_id);
    serde_json::to_string(&scene).map_err(|e| JsError::new(&e.to_string()))
}

/// Accumulates scene documents into a story, mirroring the CLI build.
#[wasm_bindgen]
#[derive(Default)]
pub struct StoryAssembler {
    story: Story,
    duplicates: Vec<String>,
}

#[wasm_bindgen]
impl StoryAssembler {
    #[wasm_bindgen(constructor)]
    pub fn new() -> StoryAssembler {
        StoryAssembler::default()
    }

    /// Parse a document and add it. Returns the resolved scene id. A
    /// repeated id replaces the earlier scene and is recorded.
    pub fn add_document(&mut self, fallback_id: &str, text: &str) -> String {
        let scene = Scene::parse(text, fallback_id);
        let id = scene.id.clone();
        if self.story.insert(scene).is_some() {
            self.duplicates.push(id.clone());
        }
        id
    }

    pub fn scene_count(&self) -> usize {
        self.story.len()
    }

    /// Ids that were added more than once, as a JSON array.
    pub fn duplicates(&self) -> String {
        serde_json::to_string(&self.duplicates).unwrap_or_else(|_| "[]".to_string())
    }

    /// The whole story as a JSON object keyed by scene id.
    pub fn to_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.story).map_err(|e| JsError::new(&e.to_string()))
    }
}
