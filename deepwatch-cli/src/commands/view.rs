//! Read a single path through an intercepted view.

use anyhow::{Context, Result};
use deepwatch_core::{deep_view, load_source, AccessPath};
use std::path::Path;

/// Print the value at `path` as pretty JSON.
pub fn view_path(file: &Path, path: &str) -> Result<()> {
    let source =
        load_source(file).with_context(|| format!("Failed to load {}", file.display()))?;
    let path: AccessPath = path.parse()?;

    let view = deep_view(&source);
    let field = view.get_path(&path)?;

    println!("{}", serde_json::to_string_pretty(&field.to_value())?);
    Ok(())
}
