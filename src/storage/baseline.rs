//! Baseline persistence for cross-run change detection
//!
//! The baseline is a flat JSON object keyed by slot key:
//!
//! ```json
//! {
//!   "2024-09-27-10:00-3/2": {
//!     "date": "2024-09-27",
//!     "time": "10:00",
//!     "level": "상급",
//!     "leftSeats": 3,
//!     "rightSeats": 2,
//!     "totalSeats": 5,
//!     "raw": "3/2",
//!     "savedAt": "2024-09-26T01:00:00Z"
//!   }
//! }
//! ```
//!
//! It is replaced wholesale at the end of every successful run. Concurrent
//! runs against the same file are not coordinated; schedule runs serially.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::models::{Slot, SlotKey};

/// A slot as recorded in the baseline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSlot {
    #[serde(flatten)]
    pub slot: Slot,

    /// When this record was written; absent in older state files
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
}

/// Last observed slots by key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Baseline {
    entries: BTreeMap<SlotKey, StoredSlot>,
}

impl Baseline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `slot` under its key, replacing any previous record
    pub fn insert(&mut self, slot: Slot, saved_at: DateTime<Utc>) {
        self.entries
            .insert(slot.key(), StoredSlot { slot, saved_at });
    }

    pub fn get(&self, key: &SlotKey) -> Option<&StoredSlot> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &SlotKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotKey, &StoredSlot)> {
        self.entries.iter()
    }
}

/// Reads and writes the baseline file
#[derive(Debug, Clone)]
pub struct BaselineStore {
    path: PathBuf,
}

impl BaselineStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the baseline, treating a missing or unreadable file as empty
    pub fn load(&self) -> Baseline {
        match self.try_load() {
            Ok(Some(baseline)) => {
                tracing::debug!(
                    path = %self.path.display(),
                    entries = baseline.len(),
                    "Baseline loaded"
                );
                baseline
            }
            Ok(None) => {
                tracing::info!(path = %self.path.display(), "No previous baseline, starting fresh");
                Baseline::new()
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %format!("{e:#}"),
                    "Baseline unreadable, starting fresh"
                );
                Baseline::new()
            }
        }
    }

    /// Load the baseline, surfacing I/O and format errors
    pub fn try_load(&self) -> Result<Option<Baseline>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open baseline file: {}", self.path.display()))?;

        let reader = BufReader::new(file);
        let baseline = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to deserialize baseline: {}", self.path.display()))?;

        Ok(Some(baseline))
    }

    /// Replace the baseline file
    ///
    /// Writes to a sibling temp file first, then renames over the target.
    pub fn save(&self, baseline: &Baseline) -> Result<PathBuf> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create baseline directory: {}", parent.display())
                })?;
            }
        }

        let mut temp_name = self.path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        let file = File::create(&temp_path)
            .with_context(|| format!("Failed to create baseline file: {}", temp_path.display()))?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, baseline)
            .context("Failed to serialize baseline")?;
        writer.flush().context("Failed to flush baseline")?;

        fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to rename baseline file: {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), entries = baseline.len(), "Baseline saved");
        Ok(self.path.clone())
    }
}
