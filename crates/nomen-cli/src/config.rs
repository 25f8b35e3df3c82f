//! Loading of settings and type graphs from disk

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use nomen_core::{EmitterSettings, TypeGraph};
use tracing::debug;

/// Emitter settings from a TOML file, or the defaults when no file is given
pub fn load_settings(path: Option<&Path>) -> Result<EmitterSettings> {
    let Some(path) = path else {
        return Ok(EmitterSettings::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    let settings: EmitterSettings = toml::from_str(&text)
        .with_context(|| format!("Failed to parse settings in {}", path.display()))?;
    debug!("Loaded settings from {}: {:?}", path.display(), settings);
    Ok(settings)
}

/// Type graph from its JSON form, checked for dangling handles
pub fn load_graph(path: &Path) -> Result<TypeGraph> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read type graph from {}", path.display()))?;
    let graph: TypeGraph = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse type graph in {}", path.display()))?;
    graph
        .validate()
        .with_context(|| format!("Type graph in {} is inconsistent", path.display()))?;
    debug!("Loaded {} definitions from {}", graph.definitions().count(), path.display());
    Ok(graph)
}
