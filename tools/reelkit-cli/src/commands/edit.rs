//! Patch layer fields from the command line.

use std::path::PathBuf;

use reelkit_layer_model::LayerPatch;

pub fn run(
    path: PathBuf,
    id: String,
    assignments: Vec<String>,
    json: Option<String>,
) -> anyhow::Result<()> {
    let patch = build_patch(&assignments, json.as_deref())?;
    if patch.is_empty() {
        return Err(anyhow::anyhow!(
            "Nothing to change: pass --set FIELD=VALUE or --json"
        ));
    }

    let mut project = super::load(&path)?;
    let result = project.composition.update(&id, &patch);
    if !super::apply_edit(&id, result)? {
        return Ok(());
    }
    super::save(&mut project)?;

    let fields: Vec<_> = patch.touched().iter().map(|f| f.name()).collect();
    tracing::info!(layer_id = %id, fields = ?fields, "Layer updated");

    if let Some(layer) = project.composition.layer(&id) {
        println!("Updated layer {id} ({})", fields.join(", "));
        println!(
            "{}",
            serde_json::to_string_pretty(layer)
                .map_err(|e| anyhow::anyhow!("Failed to render layer: {e}"))?
        );
    }

    Ok(())
}

/// Build a patch from an optional JSON object plus `FIELD=VALUE` pairs.
///
/// Values are parsed the way editor inputs are: empty or invalid numbers
/// read as zero and are clamped when the patch is applied.
fn build_patch(assignments: &[String], json: Option<&str>) -> anyhow::Result<LayerPatch> {
    let mut patch = match json {
        Some(json) => serde_json::from_str::<LayerPatch>(json)
            .map_err(|e| anyhow::anyhow!("Invalid JSON patch: {e}"))?,
        None => LayerPatch::default(),
    };

    for assignment in assignments {
        let (field, value) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Expected FIELD=VALUE, got `{assignment}`"))?;
        patch
            .set_field(field, value)
            .map_err(|e| anyhow::anyhow!("{e}"))?;
    }

    Ok(patch)
}
