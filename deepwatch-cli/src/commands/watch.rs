//! Replay reads against a monitored view and report what was accessed.

use anyhow::{Context, Result};
use deepwatch_core::{build_monitored_view, load_source, AccessPath, WatchConfig};
use std::path::Path;
use tracing::info;

/// Options for the `watch` command
#[derive(Debug, Default)]
pub struct WatchOptions {
    pub reads: Vec<String>,
    pub json: bool,
    pub untouched: bool,
}

/// Load `file`, read every requested path through a monitored view and
/// print the monitor.
pub fn watch_document(config_path: &Path, file: &Path, opts: WatchOptions) -> Result<()> {
    let config = WatchConfig::load_or_default(config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    let source =
        load_source(file).with_context(|| format!("Failed to load {}", file.display()))?;

    let paths = opts
        .reads
        .iter()
        .map(|p| p.parse::<AccessPath>())
        .collect::<Result<Vec<_>, _>>()?;

    let strategy = config.monitor_strategy();
    let initial = strategy.initial_value.clone();
    let (view, monitor) = build_monitored_view(&source, Some(strategy))
        .with_context(|| format!("Unknown strategy '{}'", config.strategy))?;

    for path in &paths {
        let field = view.get_path(path)?;
        info!(path = %path, value = ?field.as_value(), "read");
    }

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&monitor.snapshot())?);
    } else if opts.untouched {
        for path in monitor.untouched(&initial) {
            println!("{}", path);
        }
    } else {
        for (path, value) in monitor.leaves() {
            println!("{} = {}", path, value);
        }
    }

    Ok(())
}
