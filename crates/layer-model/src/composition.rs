//! Compositions and the on-disk project bundle.
//!
//! A composition is the top-level editing document: canvas metadata, frame
//! bounds, and the ordered layer list (index 0 paints first, at the bottom).
//! The composition exclusively owns its layers; every edit swaps the list
//! for a new one produced by the pure functions in [`crate::update`] and
//! [`crate::lifecycle`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use reelkit_common::{frames_to_seconds, FrameIndex};
use serde::{Deserialize, Serialize};

use crate::error::LayerError;
use crate::invariants::{self, Bounds};
use crate::layer::Layer;
use crate::lifecycle::{self, CreateOptions, MediaDescriptor};
use crate::patch::LayerPatch;
use crate::update;

/// Top-level composition file (`composition.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Composition {
    /// Schema version.
    pub version: String,

    /// Human-readable project name.
    pub name: String,

    /// Unique composition identifier (UUID).
    pub id: String,

    /// Creation timestamp (ISO 8601).
    pub created_at: String,

    /// Last modified timestamp (ISO 8601).
    pub modified_at: String,

    /// Timeline frame rate.
    pub fps: u32,

    /// Composition length; every layer ends at or before this frame.
    pub total_frames: FrameIndex,

    /// Canvas size in pixels. Layer geometry is relative to it.
    pub width: u32,
    pub height: u32,

    /// Layers in paint order.
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl Composition {
    /// Create an empty composition.
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        fps: u32,
        total_frames: FrameIndex,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            version: "1.0".to_string(),
            name: name.into(),
            id: uuid::Uuid::new_v4().to_string(),
            created_at: now.clone(),
            modified_at: now,
            fps,
            total_frames,
            width,
            height,
            layers: vec![],
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.total_frames)
    }

    /// Composition length in whole seconds.
    pub fn duration_secs(&self) -> f64 {
        frames_to_seconds(self.total_frames as u64, self.fps)
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Layers the renderer paints at `frame`, bottom first.
    pub fn active_layers_at(&self, frame: FrameIndex) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(move |l| l.is_active_at(frame))
    }

    /// Topmost visual layer under a canvas point at `frame`.
    pub fn layer_at_point(&self, frame: FrameIndex, x: f64, y: f64) -> Option<&Layer> {
        self.layers
            .iter()
            .rev()
            .filter(|l| l.is_active_at(frame))
            .find(|l| l.transform().is_some_and(|t| t.contains(x, y)))
    }

    /// Bump the modification timestamp.
    pub fn touch(&mut self) {
        self.modified_at = chrono::Utc::now().to_rfc3339();
    }

    /// Create a layer from media and place it on top. Returns the new id.
    pub fn add_media(
        &mut self,
        media: &MediaDescriptor,
        at_frame: FrameIndex,
        options: CreateOptions,
    ) -> Result<String, LayerError> {
        let layer = lifecycle::create_layer_with(media, at_frame, self.total_frames, options)?;
        let id = layer.id.clone();
        self.layers.push(layer);
        self.touch();
        Ok(id)
    }

    /// Patch the layer with `id`.
    pub fn update(&mut self, id: &str, patch: &LayerPatch) -> Result<(), LayerError> {
        self.layers = update::try_update_layer(&self.layers, id, patch, self.bounds())?;
        self.touch();
        Ok(())
    }

    /// Point the layer with `id` at new media, keeping all of its edits.
    pub fn replace_media(&mut self, id: &str, new_url: &str) -> Result<(), LayerError> {
        let index = update::find_layer(&self.layers, id)?;
        let replaced = lifecycle::replace_layer_media(&self.layers[index], new_url)?;
        let mut next = self.layers.clone();
        next[index] = replaced;
        self.layers = next;
        self.touch();
        Ok(())
    }

    /// Remove the layer with `id`. The caller confirms with the user first.
    pub fn delete(&mut self, id: &str) -> Result<(), LayerError> {
        update::find_layer(&self.layers, id)?;
        self.layers = lifecycle::delete_layer(&self.layers, id);
        self.touch();
        Ok(())
    }

    pub fn rotate_90(&mut self, id: &str) -> Result<(), LayerError> {
        update::find_layer(&self.layers, id)?;
        self.layers = update::rotate_layer_90(&self.layers, id, self.bounds())?;
        self.touch();
        Ok(())
    }

    pub fn flip(&mut self, id: &str) -> Result<(), LayerError> {
        update::find_layer(&self.layers, id)?;
        self.layers = update::flip_layer(&self.layers, id, self.bounds())?;
        self.touch();
        Ok(())
    }

    /// Move a layer to paint position `to_index`.
    pub fn move_layer(&mut self, id: &str, to_index: usize) -> Result<(), LayerError> {
        update::find_layer(&self.layers, id)?;
        self.layers = update::move_layer(&self.layers, id, to_index);
        self.touch();
        Ok(())
    }

    /// Change the composition length, re-clamping every layer.
    ///
    /// Fails without changing anything if a layer would start at or after
    /// the new end.
    pub fn set_total_frames(&mut self, total_frames: FrameIndex) -> Result<(), LayerError> {
        let bounds = Bounds::new(total_frames);
        let layers = self
            .layers
            .iter()
            .map(|layer| invariants::normalize(layer, bounds))
            .collect::<Result<Vec<_>, _>>()?;
        self.total_frames = total_frames;
        self.layers = layers;
        self.touch();
        Ok(())
    }

    /// Report every invariant the composition violates.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = vec![];

        if self.fps == 0 {
            issues.push("Frame rate is zero".to_string());
        }
        if self.total_frames == 0 {
            issues.push("Composition has no frames".to_string());
        }
        if self.width == 0 || self.height == 0 {
            issues.push(format!("Canvas size {}x{} is empty", self.width, self.height));
        }

        let mut seen = HashSet::new();
        for layer in &self.layers {
            if !seen.insert(layer.id.as_str()) {
                issues.push(format!("Duplicate layer id: {}", layer.id));
            }
            for issue in invariants::check(layer, self.bounds()) {
                issues.push(format!("Layer {} ({}): {issue}", layer.id, layer.kind()));
            }
        }

        issues
    }
}

/// A composition together with the directory it lives in.
#[derive(Debug, Clone)]
pub struct LoadedComposition {
    /// Filesystem path to the project directory.
    pub root: PathBuf,

    pub composition: Composition,
}

impl LoadedComposition {
    fn composition_path(root: &Path) -> PathBuf {
        root.join("meta").join("composition.json")
    }

    /// Load a composition from a project directory.
    pub fn load(root: impl AsRef<Path>) -> Result<Self, CompositionError> {
        let root = root.as_ref().to_path_buf();
        let path = Self::composition_path(&root);

        let json = std::fs::read_to_string(&path).map_err(|e| CompositionError::IoError {
            path: path.clone(),
            source: e,
        })?;
        let composition: Composition =
            serde_json::from_str(&json).map_err(|e| CompositionError::ParseError { path, source: e })?;

        Ok(Self { root, composition })
    }

    /// Save the composition to disk.
    pub fn save(&self) -> Result<(), CompositionError> {
        let meta_dir = self.root.join("meta");
        std::fs::create_dir_all(&meta_dir).map_err(|e| CompositionError::IoError {
            path: meta_dir.clone(),
            source: e,
        })?;

        let path = Self::composition_path(&self.root);
        let json = serde_json::to_string_pretty(&self.composition).map_err(|e| {
            CompositionError::ParseError {
                path: path.clone(),
                source: e,
            }
        })?;
        std::fs::write(&path, json).map_err(|e| CompositionError::IoError { path, source: e })?;

        Ok(())
    }

    /// Create a new project on disk with the standard directory structure.
    pub fn create(
        root: impl AsRef<Path>,
        name: impl Into<String>,
        width: u32,
        height: u32,
        fps: u32,
        total_frames: FrameIndex,
    ) -> Result<Self, CompositionError> {
        if fps == 0 || total_frames == 0 {
            return Err(CompositionError::ValidationError {
                message: format!("fps ({fps}) and length ({total_frames} frames) must be non-zero"),
            });
        }

        let root = root.as_ref().to_path_buf();
        for subdir in &["media", "meta", "cache", "exports"] {
            std::fs::create_dir_all(root.join(subdir)).map_err(|e| CompositionError::IoError {
                path: root.join(subdir),
                source: e,
            })?;
        }

        let loaded = Self {
            root,
            composition: Composition::new(name, width, height, fps, total_frames),
        };
        loaded.save()?;
        Ok(loaded)
    }
}

/// Errors that can occur when loading or saving compositions.
#[derive(Debug, thiserror::Error)]
pub enum CompositionError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid composition: {message}")]
    ValidationError { message: String },

    #[error(transparent)]
    Layer(#[from] LayerError),
}

impl From<CompositionError> for reelkit_common::ReelError {
    fn from(err: CompositionError) -> Self {
        match err {
            CompositionError::Layer(layer) => layer.into(),
            other => reelkit_common::ReelError::project(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerKind;

    fn composition() -> Composition {
        Composition::new("Story", 1080, 1920, 30, 300)
    }

    #[test]
    fn test_composition_creation() {
        let comp = composition();
        assert_eq!(comp.name, "Story");
        assert_eq!(comp.duration_secs(), 10.0);
        assert!(comp.layers.is_empty());
        assert!(comp.validate().is_empty());
    }

    #[test]
    fn test_add_update_delete() {
        let mut comp = composition();
        let image = MediaDescriptor::new("image", "bg.png", "bg");
        let id = comp.add_media(&image, 0, CreateOptions::new(30)).unwrap();

        let patch = LayerPatch {
            end_frame: Some(500),
            ..Default::default()
        };
        comp.update(&id, &patch).unwrap();
        assert_eq!(comp.layer(&id).unwrap().end_frame, 300);

        comp.delete(&id).unwrap();
        assert!(comp.layers.is_empty());
        assert_eq!(comp.delete(&id), Err(LayerError::not_found(id)));
    }

    #[test]
    fn test_active_layers_at() {
        let mut comp = composition();
        let a = comp
            .add_media(&MediaDescriptor::new("image", "a", "a"), 0, CreateOptions::new(30))
            .unwrap();
        let b = comp
            .add_media(&MediaDescriptor::new("text", "", "b"), 200, CreateOptions::new(30))
            .unwrap();

        let at_100: Vec<_> = comp.active_layers_at(100).map(|l| l.id.clone()).collect();
        assert_eq!(at_100, vec![a.clone()]);
        let at_160: Vec<_> = comp.active_layers_at(160).map(|l| l.id.clone()).collect();
        assert!(at_160.is_empty());
        let at_210: Vec<_> = comp.active_layers_at(210).map(|l| l.id.clone()).collect();
        assert_eq!(at_210, vec![b]);
    }

    #[test]
    fn test_layer_at_point_picks_topmost_visual() {
        let mut comp = composition();
        let bg = comp
            .add_media(&MediaDescriptor::new("image", "bg", "bg"), 0, CreateOptions::new(30))
            .unwrap();
        let title = comp
            .add_media(&MediaDescriptor::new("text", "", "Hi"), 0, CreateOptions::new(30))
            .unwrap();
        comp.add_media(&MediaDescriptor::new("audio", "a.mp3", "a"), 0, CreateOptions::new(30))
            .unwrap();

        assert_eq!(comp.layer_at_point(10, 50.0, 50.0).map(|l| &l.id), Some(&title));
        assert_eq!(comp.layer_at_point(10, 5.0, 5.0).map(|l| &l.id), Some(&bg));
        assert!(comp.layer_at_point(200, 50.0, 50.0).is_none());
    }

    #[test]
    fn test_mutations_bump_modified_at() {
        const STALE: &str = "2000-01-01T00:00:00+00:00";
        let mut comp = composition();

        comp.modified_at = STALE.to_string();
        let id = comp
            .add_media(&MediaDescriptor::new("image", "a", "a"), 0, CreateOptions::new(30))
            .unwrap();
        assert_ne!(comp.modified_at, STALE);

        let edits: [fn(&mut Composition, &str) -> Result<(), LayerError>; 5] = [
            |c, id| c.rotate_90(id),
            |c, id| c.flip(id),
            |c, id| c.move_layer(id, 0),
            |c, id| c.replace_media(id, "b.png"),
            |c, id| {
                let patch = LayerPatch {
                    opacity: Some(0.3),
                    ..Default::default()
                };
                c.update(id, &patch)
            },
        ];
        for edit in edits {
            comp.modified_at = STALE.to_string();
            edit(&mut comp, &id).unwrap();
            assert_ne!(comp.modified_at, STALE);
        }

        comp.modified_at = STALE.to_string();
        comp.set_total_frames(200).unwrap();
        assert_ne!(comp.modified_at, STALE);

        comp.modified_at = STALE.to_string();
        assert!(comp.rotate_90("missing").is_err());
        assert_eq!(comp.modified_at, STALE);

        comp.delete(&id).unwrap();
        assert_ne!(comp.modified_at, STALE);
    }

    #[test]
    fn test_set_total_frames_reclamps_or_refuses() {
        let mut comp = composition();
        let early = comp
            .add_media(&MediaDescriptor::new("image", "a", "a"), 0, CreateOptions::new(30))
            .unwrap();
        let late = comp
            .add_media(&MediaDescriptor::new("image", "b", "b"), 250, CreateOptions::new(30))
            .unwrap();

        comp.set_total_frames(270).unwrap();
        assert_eq!(comp.layer(&late).unwrap().end_frame, 270);
        assert_eq!(comp.layer(&early).unwrap().end_frame, 150);

        assert!(comp.set_total_frames(200).is_err());
        assert_eq!(comp.total_frames, 270);
    }

    #[test]
    fn test_validate_reports_layer_and_duplicate_issues() {
        let mut comp = composition();
        let id = comp
            .add_media(&MediaDescriptor::new("image", "a", "a"), 0, CreateOptions::new(30))
            .unwrap();
        let mut dup = comp.layer(&id).unwrap().clone();
        dup.opacity = 2.0;
        comp.layers.push(dup);

        let issues = comp.validate();
        assert!(issues.iter().any(|i| i.starts_with("Duplicate layer id")));
        assert!(issues.iter().any(|i| i.contains("opacity")));
    }

    #[test]
    fn test_replace_media_rejects_text() {
        let mut comp = composition();
        let id = comp
            .add_media(&MediaDescriptor::new("text", "", "Hello"), 0, CreateOptions::new(30))
            .unwrap();
        assert_eq!(
            comp.replace_media(&id, "x.png"),
            Err(LayerError::InvalidFieldForKind {
                field: "src",
                kind: LayerKind::Text,
            })
        );
    }

    #[test]
    fn test_loaded_composition_create_and_load() {
        let dir = std::env::temp_dir().join("reelkit_test_composition");
        let _ = std::fs::remove_dir_all(&dir);

        let mut created = LoadedComposition::create(&dir, "Integration", 1080, 1920, 30, 900).unwrap();
        let media = MediaDescriptor::new("video", "clip.mp4", "clip").with_duration(4.0);
        let id = created
            .composition
            .add_media(&media, 30, CreateOptions::new(30))
            .unwrap();
        created.save().unwrap();

        let loaded = LoadedComposition::load(&dir).unwrap();
        assert_eq!(loaded.composition.name, "Integration");
        assert_eq!(loaded.composition.layers.len(), 1);
        assert_eq!(loaded.composition.layer(&id), created.composition.layer(&id));
        assert!(dir.join("media").is_dir());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_create_rejects_empty_bounds() {
        let dir = std::env::temp_dir().join("reelkit_test_composition_empty");
        let err = LoadedComposition::create(&dir, "Empty", 1080, 1920, 30, 0).unwrap_err();
        assert!(matches!(err, CompositionError::ValidationError { .. }));
        assert!(!dir.exists());
    }

    #[test]
    fn test_load_missing_reports_path() {
        let dir = std::env::temp_dir().join("reelkit_test_composition_missing");
        let _ = std::fs::remove_dir_all(&dir);
        let err = LoadedComposition::load(&dir).unwrap_err();
        assert!(err.to_string().contains("composition.json"));
    }
}
