//! Add a layer from media or a text preset.

use std::path::PathBuf;

use reelkit_common::AppConfig;
use reelkit_layer_model::{CreateOptions, MediaDescriptor};

pub fn run(
    path: PathBuf,
    media_type: String,
    url: String,
    name: String,
    at: u32,
    duration: Option<f64>,
) -> anyhow::Result<()> {
    let mut project = super::load(&path)?;
    let defaults = AppConfig::load().composition;

    let mut media = MediaDescriptor::new(media_type, url, name);
    media.duration = duration;

    let options = CreateOptions {
        fps: project.composition.fps,
        default_layer_secs: defaults.default_layer_secs,
    };
    let id = project
        .composition
        .add_media(&media, at, options)
        .map_err(|e| anyhow::anyhow!("Failed to add layer: {e}"))?;
    super::save(&mut project)?;

    let layer = project
        .composition
        .layer(&id)
        .ok_or_else(|| anyhow::anyhow!("Layer {id} missing after add"))?;
    tracing::info!(layer_id = %id, kind = %layer.kind(), "Layer added");

    println!("Added {} layer {}", layer.kind(), id);
    println!(
        "  Frames: {}..{} (index {})",
        layer.start_frame,
        layer.end_frame,
        project.composition.layers.len() - 1
    );

    Ok(())
}
