use std::{fs, io::Write, path::Path};

use compact_str::CompactString;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::Result;

/// Channels that have already been announced, keyed by channel id.
///
/// An id is never removed or overwritten once recorded.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct State {
    #[serde(rename = "notifiedChannelIds", default)]
    notified: HashMap<CompactString, String>,
}

impl State {
    /// Reads the state file. Missing or unreadable files give an empty state.
    pub fn load(path: &Path) -> Self {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(target: "state", "{} not found, starting empty", path.display());
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(target: "state", "cannot read {}: {e}, starting empty", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str(&data) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(target: "state", "malformed {}: {e}, starting empty", path.display());
                Self::default()
            }
        }
    }

    /// Replaces the state file via a sibling temp file and a rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, self)?;
        file.write_all(b"\n")?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| e.error)?;

        tracing::debug!(target: "state", "saved {} entries to {}", self.notified.len(), path.display());
        Ok(())
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.notified.contains_key(id)
    }

    /// Returns `false` if `id` was already present, leaving the old timestamp in place.
    pub fn record(&mut self, id: &str, timestamp: String) -> bool {
        use hashbrown::hash_map::Entry;
        match self.notified.entry(CompactString::new(id)) {
            Entry::Vacant(e) => {
                e.insert(timestamp);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.notified.get(id).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.notified.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.notified.is_empty()
    }
}
