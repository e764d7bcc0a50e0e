//! Braid parameter loading.
//!
//! An optional TOML file with a `[braid]` table overrides the built-in
//! parameter defaults. Every failure mode — missing file, unreadable file,
//! malformed table, unknown key — falls back to the defaults with a
//! warning. Configuration problems are never fatal.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use emota_core::BraidParams;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    braid: BraidParams,
}

/// Load braid parameters, falling back to defaults on any failure.
pub fn load_braid_params(path: Option<&Path>) -> BraidParams {
    let Some(path) = path else {
        return BraidParams::default();
    };

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("failed to read config {}: {e}; using defaults", path.display());
            return BraidParams::default();
        }
    };

    match toml::from_str::<ConfigFile>(&raw) {
        Ok(config) => config.braid,
        Err(e) => {
            tracing::warn!("malformed config {}: {e}; using defaults", path.display());
            BraidParams::default()
        }
    }
}
