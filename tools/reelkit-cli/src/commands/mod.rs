pub mod add;
pub mod delete;
pub mod edit;
pub mod info;
pub mod init;
pub mod reorder;
pub mod replace;
pub mod rotate;
pub mod validate;

use std::path::Path;

use reelkit_common::ReelError;
use reelkit_layer_model::{LayerError, LoadedComposition};

pub(crate) fn load(path: &Path) -> anyhow::Result<LoadedComposition> {
    if !path.is_dir() {
        return Err(ReelError::FileNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }
    Ok(LoadedComposition::load(path).map_err(ReelError::from)?)
}

pub(crate) fn save(project: &mut LoadedComposition) -> anyhow::Result<()> {
    project.composition.touch();
    project.save().map_err(ReelError::from)?;
    Ok(())
}

/// Apply an edit, treating a stale layer id as a no-op.
///
/// Returns `Ok(false)` when the layer was not found and nothing changed.
pub(crate) fn apply_edit(
    id: &str,
    result: Result<(), LayerError>,
) -> anyhow::Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(LayerError::LayerNotFound { .. }) => {
            tracing::warn!(layer_id = id, "Layer not found; nothing changed");
            println!("No layer with id {id}; nothing changed.");
            Ok(false)
        }
        Err(e) => Err(ReelError::from(e).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_edit_outcomes() {
        assert!(apply_edit("a", Ok(())).unwrap());
        assert!(!apply_edit("a", Err(LayerError::not_found("a"))).unwrap());
        let err = apply_edit("a", Err(LayerError::invalid_timing("inverted"))).unwrap_err();
        assert!(err.to_string().starts_with("Layer error"));
    }

    #[test]
    fn test_load_missing_directory() {
        let err = load(Path::new("/nonexistent/reelkit/project")).unwrap_err();
        assert!(err.to_string().starts_with("File not found"));
    }
}
