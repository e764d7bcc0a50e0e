//! Whole-file JSON persistence for the bounded episodic log.
//!
//! The on-disk payload is `{"capacity": n, "episodes": [...]}`. A bare
//! episode array is also accepted on load. Loading never fails: a missing,
//! unreadable or corrupt file yields an empty log with a warning, and
//! malformed individual episodes are skipped rather than poisoning the rest.
//! Saving rewrites the entire file each time.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use emota_core::EpisodeRecord;

use crate::error::Result;

#[derive(Serialize)]
struct LogPayload<'a> {
    capacity: usize,
    episodes: &'a [EpisodeRecord],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LogWire {
    Payload { capacity: Option<usize>, episodes: Vec<Value> },
    Bare(Vec<Value>),
}

/// Result of loading a persisted log.
pub struct LoadedLog {
    pub capacity: usize,
    pub episodes: Vec<EpisodeRecord>,
}

/// Episodic log file handle.
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted log, truncated to capacity from the tail.
    ///
    /// Recovery, not failure: any unreadable or malformed state degrades to
    /// an empty log with `default_capacity`, logged as a warning.
    pub fn load(&self, default_capacity: usize) -> LoadedLog {
        if !self.path.exists() {
            return LoadedLog {
                capacity: default_capacity,
                episodes: Vec::new(),
            };
        }

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("failed to read log {}: {e}", self.path.display());
                return LoadedLog {
                    capacity: default_capacity,
                    episodes: Vec::new(),
                };
            }
        };

        let (capacity, raw_episodes) = match serde_json::from_str::<LogWire>(&raw) {
            Ok(LogWire::Payload { capacity, episodes }) => (
                capacity.filter(|c| *c > 0).unwrap_or(default_capacity),
                episodes,
            ),
            Ok(LogWire::Bare(episodes)) => (default_capacity, episodes),
            Err(e) => {
                tracing::warn!("corrupt log payload {}: {e}", self.path.display());
                return LoadedLog {
                    capacity: default_capacity,
                    episodes: Vec::new(),
                };
            }
        };

        let total = raw_episodes.len();
        let start = total.saturating_sub(capacity);
        let mut episodes = Vec::new();
        let mut skipped = 0usize;
        for value in raw_episodes.into_iter().skip(start) {
            match serde_json::from_value::<EpisodeRecord>(value) {
                Ok(record) => episodes.push(record),
                Err(_) => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::warn!(
                "skipped {skipped} malformed episode(s) in {}",
                self.path.display()
            );
        }

        LoadedLog { capacity, episodes }
    }

    /// Rewrite the whole store. Only the capacity-sized tail is kept.
    pub fn save(&self, capacity: usize, episodes: &[EpisodeRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let start = episodes.len().saturating_sub(capacity);
        let payload = LogPayload {
            capacity,
            episodes: &episodes[start..],
        };
        let json = serde_json::to_string(&payload)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
