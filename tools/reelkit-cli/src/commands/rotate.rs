//! Rotate or flip a layer.

use std::path::PathBuf;

pub fn run(path: PathBuf, id: String, flip: bool) -> anyhow::Result<()> {
    let mut project = super::load(&path)?;

    let result = if flip {
        project.composition.flip(&id)
    } else {
        project.composition.rotate_90(&id)
    };
    if !super::apply_edit(&id, result)? {
        return Ok(());
    }
    super::save(&mut project)?;

    if let Some(layer) = project.composition.layer(&id) {
        println!("Layer {id} rotation: {}°", layer.rotation);
    }

    Ok(())
}
