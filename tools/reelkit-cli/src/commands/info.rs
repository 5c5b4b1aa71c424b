//! Show composition information.

use std::path::PathBuf;

use reelkit_layer_model::DisplayValues;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let project = super::load(&path)?;
    let c = &project.composition;

    println!("Composition: {}", c.name);
    println!("  ID: {}", c.id);
    println!("  Created: {}", c.created_at);
    println!("  Modified: {}", c.modified_at);
    println!("  Canvas: {}x{}", c.width, c.height);
    println!(
        "  Timeline: {} frames @ {}fps ({}s)",
        c.total_frames,
        c.fps,
        c.duration_secs()
    );
    println!();

    println!("Layers (bottom to top): {}", c.layers.len());
    for (index, layer) in c.layers.iter().enumerate() {
        let display = DisplayValues::of(layer, c.fps);
        println!("  [{index}] {} {}", layer.kind(), layer.id);
        println!(
            "      frames {}..{} ({} - {}, {}s)",
            layer.start_frame,
            layer.end_frame,
            display.start_timecode,
            display.end_timecode,
            display.duration_secs
        );
        println!(
            "      opacity {}%, rotation {}°",
            display.opacity_percent, layer.rotation
        );
        if let Some(volume) = display.volume_percent {
            println!("      volume {volume}%");
        }
        if let Some(media) = layer.media_ref() {
            println!("      media {media}");
        }
    }

    Ok(())
}
