use std::path::Path;

use anyhow::{Context, Result};

use super::types::SheetConfig;

/// Save a config to a JSON file with pretty formatting.
pub fn save_config(config: &SheetConfig, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(config)
        .with_context(|| "failed to serialize config to JSON")?;

    std::fs::write(path, content)
        .with_context(|| format!("failed to write config file: {}", path.display()))?;

    Ok(())
}

/// Path as written into a saved config that lives in `base`.
///
/// Paths outside `base` are kept as given.
pub fn make_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
