//! Slot reconstruction from an ordered fragment stream
//!
//! The schedule page carries no structural markup tying a seat count to its
//! session. The only signals are document order, the most recent date/time/
//! level markers, and whether a seat count sits inside the seat-count
//! container. Reconstruction is a left fold over the classified fragments
//! carrying that running context in a [`ScanState`] accumulator.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::models::{Fragment, Level, Slot, UNKNOWN_TIME};
use crate::parser::classify::{classify, Classification};

/// Maximum distance (in fragments) between a level marker and a seat count
/// outside the seat-count region for the two to be bound together
pub const DEFAULT_PROXIMITY: usize = 10;

/// Year and fallback date used for fragments without a preceding date marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateHint {
    pub year: i32,
    pub fallback_date: String,
}

impl DateHint {
    pub fn new(fallback: NaiveDate) -> Self {
        Self {
            year: fallback.year(),
            fallback_date: fallback.format("%Y-%m-%d").to_string(),
        }
    }

    /// First configured target date, or `today` when none is configured
    pub fn from_targets(targets: &[NaiveDate], today: NaiveDate) -> Self {
        Self::new(targets.first().copied().unwrap_or(today))
    }
}

/// Running context threaded through the fold
#[derive(Debug, Default)]
struct ScanState {
    date: Option<String>,
    time: Option<String>,
    /// Current level and the index of the marker that set it
    level: Option<(Level, usize)>,
    slots: Vec<Slot>,
}

/// Rebuilds [`Slot`] records from classified fragments
#[derive(Debug, Clone)]
pub struct SlotReconstructor {
    hint: DateHint,
    levels: Vec<Level>,
    proximity: usize,
}

impl SlotReconstructor {
    /// Create a reconstructor emitting only the given levels of interest
    pub fn new(hint: DateHint, levels: impl IntoIterator<Item = Level>) -> Self {
        Self {
            hint,
            levels: levels.into_iter().collect(),
            proximity: DEFAULT_PROXIMITY,
        }
    }

    /// Override the level/seat proximity threshold
    #[must_use]
    pub fn with_proximity(mut self, proximity: usize) -> Self {
        self.proximity = proximity;
        self
    }

    pub fn proximity(&self) -> usize {
        self.proximity
    }

    pub fn hint(&self) -> &DateHint {
        &self.hint
    }

    /// Reconstruct slots in encounter order
    ///
    /// Slots sharing a key are all kept; merging happens when the baseline
    /// is rebuilt.
    pub fn reconstruct(&self, fragments: &[Fragment]) -> Vec<Slot> {
        let classes: Vec<Classification> = fragments.iter().map(classify).collect();
        let markers = date_markers(&classes, self.hint.year);

        let state = fragments
            .iter()
            .zip(&classes)
            .enumerate()
            .fold(ScanState::default(), |state, (index, (fragment, class))| {
                self.step(state, &markers, index, fragment, class)
            });

        tracing::debug!(
            fragments = fragments.len(),
            date_markers = markers.len(),
            slots = state.slots.len(),
            "Reconstructed slots"
        );

        state.slots
    }

    fn step(
        &self,
        mut state: ScanState,
        markers: &BTreeMap<usize, String>,
        index: usize,
        fragment: &Fragment,
        class: &Classification,
    ) -> ScanState {
        match class {
            Classification::DateMarker(md) => {
                state.date = Some(md.with_year(self.hint.year));
            }
            Classification::TimeMarker(time) => {
                state.time = Some(time.clone());
                if state.date.is_none() {
                    state.date = Some(self.date_at(index, markers));
                }
            }
            Classification::LevelMarker(level) => {
                state.level = Some((*level, index));
            }
            Classification::SeatCount { .. } | Classification::SoldOut => {
                if let Some(slot) = self.bind_seats(&state, markers, index, fragment, class) {
                    state.slots.push(slot);
                }
            }
            Classification::Unrecognized => {}
        }
        state
    }

    fn bind_seats(
        &self,
        state: &ScanState,
        markers: &BTreeMap<usize, String>,
        index: usize,
        fragment: &Fragment,
        class: &Classification,
    ) -> Option<Slot> {
        let (left, right) = class.seats()?;

        let near_level = state
            .level
            .is_some_and(|(_, at)| index - at < self.proximity);

        if !fragment.context.in_seat_region && !near_level {
            tracing::trace!(index, text = %fragment.text, "Seat count not bound to any level");
            return None;
        }

        let (level, _) = state.level?;
        if !self.levels.contains(&level) {
            return None;
        }

        if left == 0 && right == 0 {
            return None;
        }

        let date = state
            .date
            .clone()
            .unwrap_or_else(|| self.date_at(index, markers));
        let time = state
            .time
            .clone()
            .unwrap_or_else(|| UNKNOWN_TIME.to_string());

        Some(Slot::new(date, time, level, left, right, fragment.text.as_str()))
    }

    fn date_at(&self, index: usize, markers: &BTreeMap<usize, String>) -> String {
        nearest_preceding_date(index, markers)
            .map(str::to_string)
            .unwrap_or_else(|| self.hint.fallback_date.clone())
    }
}

/// Index of every date marker mapped to its full `YYYY-MM-DD` date
pub fn date_markers(classes: &[Classification], year: i32) -> BTreeMap<usize, String> {
    classes
        .iter()
        .enumerate()
        .filter_map(|(index, class)| match class {
            Classification::DateMarker(md) => Some((index, md.with_year(year))),
            _ => None,
        })
        .collect()
}

/// Date of the last marker at or before `index`
pub fn nearest_preceding_date(index: usize, markers: &BTreeMap<usize, String>) -> Option<&str> {
    markers
        .range(..=index)
        .next_back()
        .map(|(_, date)| date.as_str())
}
