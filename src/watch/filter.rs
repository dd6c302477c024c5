//! Date selection over reconstructed slots
//!
//! Level selection already happens during reconstruction, so this stage only
//! narrows by date: either every date passes, or only the resolved targets.

use std::collections::HashSet;

use crate::config::WatchSettings;
use crate::models::Slot;

/// Which dates survive the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateSelection {
    /// Pass-through: every reconstructed slot is kept
    All,
    /// Allow-list of `YYYY-MM-DD` dates
    Only(HashSet<String>),
}

impl DateSelection {
    pub fn from_settings(settings: &WatchSettings) -> Self {
        if settings.include_all_dates {
            return Self::All;
        }
        Self::Only(
            settings
                .target_dates
                .iter()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .collect(),
        )
    }

    pub fn admits(&self, date: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(dates) => dates.contains(date),
        }
    }

    /// Keep admitted slots, preserving order
    pub fn apply(&self, slots: Vec<Slot>) -> Vec<Slot> {
        match self {
            Self::All => slots,
            Self::Only(_) => slots.into_iter().filter(|s| self.admits(&s.date)).collect(),
        }
    }
}

/// Narrow `slots` to the configured dates
pub fn filter_slots(slots: Vec<Slot>, settings: &WatchSettings) -> Vec<Slot> {
    let before = slots.len();
    let kept = DateSelection::from_settings(settings).apply(slots);
    tracing::debug!(before, after = kept.len(), "Filtered slots by date");
    kept
}
