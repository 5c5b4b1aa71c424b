//! Validate a ReelKit composition.

use std::path::PathBuf;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating composition at: {}", path.display());

    let project = super::load(&path)?;
    let c = &project.composition;

    println!("  Name: {}", c.name);
    println!("  Version: {}", c.version);
    println!("  Canvas: {}x{}", c.width, c.height);
    println!("  Frames: {} @ {}fps", c.total_frames, c.fps);
    println!("  Layers: {}", c.layers.len());

    let issues = c.validate();
    if issues.is_empty() {
        println!("\nComposition is valid.");
        Ok(())
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        Err(anyhow::anyhow!("{} issue(s) found", issues.len()))
    }
}
