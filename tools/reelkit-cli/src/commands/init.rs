//! Initialize a new ReelKit composition.

use std::path::PathBuf;

use reelkit_common::{AppConfig, ReelError};
use reelkit_layer_model::LoadedComposition;

pub fn run(
    name: String,
    output: PathBuf,
    width: Option<u32>,
    height: Option<u32>,
    fps: Option<u32>,
    duration_secs: Option<u32>,
) -> anyhow::Result<()> {
    let defaults = AppConfig::load().composition;
    let width = width.unwrap_or(defaults.width);
    let height = height.unwrap_or(defaults.height);
    let fps = fps.unwrap_or(defaults.fps);
    let duration_secs = duration_secs.unwrap_or(defaults.duration_secs);
    if width == 0 || height == 0 || fps == 0 || duration_secs == 0 {
        return Err(ReelError::config(format!(
            "canvas {width}x{height} at {fps}fps for {duration_secs}s has an empty dimension"
        ))
        .into());
    }
    let total_frames = duration_secs.saturating_mul(fps);

    let project_dir = output.join(&name);
    println!("Creating composition '{}' at {}", name, project_dir.display());

    let project = LoadedComposition::create(&project_dir, &name, width, height, fps, total_frames)
        .map_err(ReelError::from)?;

    tracing::info!(id = %project.composition.id, "Composition created");

    println!("Composition created successfully:");
    println!("  Directory: {}", project.root.display());
    println!("  Canvas: {}x{}", width, height);
    println!("  Timeline: {total_frames} frames @ {fps}fps ({duration_secs}s)");
    println!();
    println!("Directory structure:");
    println!("  {}/", name);
    println!("  ├── media/       (uploaded source media)");
    println!("  ├── meta/        (composition.json)");
    println!("  ├── cache/       (thumbnails, waveforms)");
    println!("  └── exports/     (rendered output)");

    Ok(())
}
