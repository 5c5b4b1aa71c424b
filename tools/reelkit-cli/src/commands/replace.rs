//! Swap a layer's media, keeping its timing, geometry, and style.

use std::path::PathBuf;

pub fn run(path: PathBuf, id: String, url: String) -> anyhow::Result<()> {
    let mut project = super::load(&path)?;

    let result = project.composition.replace_media(&id, &url);
    if !super::apply_edit(&id, result)? {
        return Ok(());
    }
    super::save(&mut project)?;

    tracing::info!(layer_id = %id, url = %url, "Layer media replaced");
    println!("Layer {id} now uses {url}");

    Ok(())
}
