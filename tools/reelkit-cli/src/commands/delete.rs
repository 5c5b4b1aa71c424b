//! Delete a layer after explicit confirmation.

use std::io::{BufRead, Write};
use std::path::PathBuf;

pub fn run(path: PathBuf, id: String, yes: bool) -> anyhow::Result<()> {
    let mut project = super::load(&path)?;

    let Some(layer) = project.composition.layer(&id) else {
        println!("No layer with id {id}; nothing changed.");
        return Ok(());
    };
    let kind = layer.kind();

    if !yes && !confirm(&format!("Delete {kind} layer {id}? [y/N] "))? {
        println!("Cancelled.");
        return Ok(());
    }

    let result = project.composition.delete(&id);
    if !super::apply_edit(&id, result)? {
        return Ok(());
    }
    super::save(&mut project)?;

    tracing::info!(layer_id = %id, kind = %kind, "Layer deleted");
    println!("Deleted {kind} layer {id}");

    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
