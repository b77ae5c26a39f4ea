/// Story assembly: scene file discovery and aggregation by scene id.

use rustc_hash::FxHashMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::core::config::BuildConfig;
use crate::core::scene::SceneError;
use crate::schema::scene::Scene;

#[derive(Debug, Error)]
pub enum StoryError {
    #[error("scenes directory not found at {0}")]
    ScenesDirMissing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Scenes keyed by id, in the order they were first inserted.
#[derive(Debug, Clone, Default)]
pub struct Story {
    scenes: Vec<Scene>,
    index: FxHashMap<String, usize>,
}

impl Story {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a scene. On an id collision the new scene replaces the old
    /// one in place and the old one is returned.
    pub fn insert(&mut self, scene: Scene) -> Option<Scene> {
        match self.index.get(&scene.id) {
            Some(&slot) => Some(std::mem::replace(&mut self.scenes[slot], scene)),
            None => {
                self.index.insert(scene.id.clone(), self.scenes.len());
                self.scenes.push(scene);
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Scene> {
        self.index.get(id).map(|&slot| &self.scenes[slot])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.scenes.iter().map(|s| s.id.as_str())
    }
}

impl Serialize for Story {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.scenes.len()))?;
        for scene in &self.scenes {
            map.serialize_entry(&scene.id, scene)?;
        }
        map.end()
    }
}

/// A scene id that appeared in more than one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub id: String,
    /// The file whose scene replaced the earlier one.
    pub path: PathBuf,
}

/// A scene file that could not be read.
#[derive(Debug)]
pub struct DocumentFailure {
    pub path: PathBuf,
    pub error: SceneError,
}

/// Result of a directory build: the story plus per-document diagnostics.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub story: Story,
    /// Number of files parsed, duplicates included.
    pub parsed: usize,
    pub duplicates: Vec<Duplicate>,
    pub failures: Vec<DocumentFailure>,
}

/// Recursively collect files with the given extension, sorted by path.
/// Entries whose names start with `.` are skipped, and symlinked
/// directories are not followed.
pub fn collect_scene_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, StoryError> {
    let mut files = Vec::new();
    collect_recursive(dir, extension, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_recursive(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let hidden = path
            .file_name()
            .map(|name| name.to_string_lossy().starts_with('.'))
            .unwrap_or(false);
        if hidden {
            continue;
        }
        // Symlinked directories are not descended into.
        if entry.file_type()?.is_dir() {
            collect_recursive(&path, extension, out)?;
        } else if path.extension().and_then(|s| s.to_str()) == Some(extension) {
            out.push(path);
        }
    }
    Ok(())
}

/// Parse every scene file under `config.scenes_dir` into a [`Story`].
///
/// A missing scenes directory is an error. Unreadable files are logged and
/// recorded in the report without stopping the build. When two files
/// declare the same id, the later file (in path order) wins.
pub fn build_story(config: &BuildConfig) -> Result<BuildReport, StoryError> {
    let dir = &config.scenes_dir;
    if !dir.is_dir() {
        return Err(StoryError::ScenesDirMissing(dir.clone()));
    }

    let files = collect_scene_files(dir, &config.extension)?;
    debug!(count = files.len(), dir = %dir.display(), "discovered scene files");

    let mut report = BuildReport::default();
    for path in files {
        let scene = match Scene::load_from_file(&path) {
            Ok(scene) => scene,
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to parse scene file");
                report.failures.push(DocumentFailure { path, error: e });
                continue;
            }
        };

        let id = scene.id.clone();
        if report.story.insert(scene).is_some() {
            warn!(id = %id, path = %path.display(), "duplicate scene id");
            report.duplicates.push(Duplicate { id: id.clone(), path });
        }
        report.parsed += 1;
        info!("Parsed: {}", id);
    }

    info!(
        scenes = report.story.len(),
        parsed = report.parsed,
        failures = report.failures.len(),
        "story built"
    );
    Ok(report)
}
