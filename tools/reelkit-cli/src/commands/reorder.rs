//! Change a layer's paint order.

use std::path::PathBuf;

pub fn run(path: PathBuf, id: String, index: usize) -> anyhow::Result<()> {
    let mut project = super::load(&path)?;

    let result = project.composition.move_layer(&id, index);
    if !super::apply_edit(&id, result)? {
        return Ok(());
    }
    super::save(&mut project)?;

    let position = project
        .composition
        .layers
        .iter()
        .position(|l| l.id == id)
        .unwrap_or(index);
    println!(
        "Layer {id} is now at index {position} of {}",
        project.composition.layers.len()
    );

    Ok(())
}
