//! Change detection against the persisted baseline
//!
//! A slot is reported when its key is new, or when the baseline holds the
//! same key with fewer total seats. Decreases and unchanged slots are silent.
//! The next baseline is rebuilt from this run's slots only; keys that
//! disappeared from the page are dropped.

use chrono::{DateTime, Utc};

use crate::models::Slot;
use crate::storage::Baseline;

/// How a slot relates to the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    New,
    Increased { previous: u64 },
    Unchanged,
}

impl Change {
    pub fn is_reportable(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Result of comparing one run against the baseline
#[derive(Debug, Clone)]
pub struct DiffOutcome {
    /// Slots to announce, in encounter order
    pub new_or_increased: Vec<Slot>,
    /// Baseline to persist at the end of the run
    pub next_baseline: Baseline,
    pub new_count: usize,
    pub increased_count: usize,
}

/// Compare a slot with its baseline record
pub fn compare(slot: &Slot, baseline: &Baseline) -> Change {
    match baseline.get(&slot.key()) {
        None => Change::New,
        Some(stored) if stored.slot.total_seats < slot.total_seats => Change::Increased {
            previous: stored.slot.total_seats,
        },
        Some(_) => Change::Unchanged,
    }
}

/// Diff filtered slots against the pre-run baseline
///
/// Every slot is compared with the baseline as loaded, never with records
/// written earlier in the same run. When two slots share a key both may be
/// reported, and the later one is what lands in `next_baseline`.
pub fn diff(filtered: &[Slot], baseline: &Baseline, now: DateTime<Utc>) -> DiffOutcome {
    let mut new_or_increased = Vec::new();
    let mut next_baseline = Baseline::new();
    let mut new_count = 0;
    let mut increased_count = 0;

    for slot in filtered {
        match compare(slot, baseline) {
            Change::New => {
                new_count += 1;
                new_or_increased.push(slot.clone());
            }
            Change::Increased { previous } => {
                tracing::debug!(
                    key = %slot.key(),
                    previous,
                    current = slot.total_seats,
                    "Seats increased"
                );
                increased_count += 1;
                new_or_increased.push(slot.clone());
            }
            Change::Unchanged => {}
        }
        next_baseline.insert(slot.clone(), now);
    }

    DiffOutcome {
        new_or_increased,
        next_baseline,
        new_count,
        increased_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Level;

    fn slot(left: u32, right: u32) -> Slot {
        Slot::new("2024-09-27", "10:00", Level::Advanced, left, right, format!("{left}/{right}"))
    }

    fn baseline_with(slots: &[Slot]) -> Baseline {
        let mut baseline = Baseline::new();
        for s in slots {
            baseline.insert(s.clone(), Utc::now());
        }
        baseline
    }

    #[test]
    fn test_new_against_empty_baseline() {
        let outcome = diff(&[slot(3, 2)], &Baseline::new(), Utc::now());
        assert_eq!(outcome.new_or_increased, vec![slot(3, 2)]);
        assert_eq!(outcome.new_count, 1);
        assert_eq!(outcome.next_baseline.len(), 1);
    }

    #[test]
    fn test_increase_detected() {
        // Same key, baseline recorded fewer total seats
        let mut previous = slot(3, 2);
        previous.total_seats = 2;
        let baseline = baseline_with(&[previous]);

        let outcome = diff(&[slot(3, 2)], &baseline, Utc::now());
        assert_eq!(outcome.new_or_increased.len(), 1);
        assert_eq!(outcome.increased_count, 1);
        assert_eq!(compare(&slot(3, 2), &baseline), Change::Increased { previous: 2 });
    }

    #[test]
    fn test_decrease_ignored() {
        let mut previous = slot(3, 2);
        previous.total_seats = 9;
        let baseline = baseline_with(&[previous]);

        let outcome = diff(&[slot(3, 2)], &baseline, Utc::now());
        assert!(outcome.new_or_increased.is_empty());
        assert_eq!(
            outcome.next_baseline.get(&slot(3, 2).key()).unwrap().slot.total_seats,
            5
        );
    }

    #[test]
    fn test_unchanged_ignored() {
        let baseline = baseline_with(&[slot(3, 2)]);
        let outcome = diff(&[slot(3, 2)], &baseline, Utc::now());
        assert!(outcome.new_or_increased.is_empty());
        assert!(!compare(&slot(3, 2), &baseline).is_reportable());
    }

    #[test]
    fn test_second_run_is_quiet() {
        let slots = vec![slot(3, 2), slot(1, 0)];
        let first = diff(&slots, &Baseline::new(), Utc::now());
        assert_eq!(first.new_or_increased.len(), 2);

        let second = diff(&slots, &first.next_baseline, Utc::now());
        assert!(second.new_or_increased.is_empty());
    }

    #[test]
    fn test_stale_keys_dropped() {
        let baseline = baseline_with(&[slot(9, 9)]);
        let outcome = diff(&[slot(1, 1)], &baseline, Utc::now());
        assert_eq!(outcome.next_baseline.len(), 1);
        assert!(!outcome.next_baseline.contains(&slot(9, 9).key()));
    }

    #[test]
    fn test_seat_split_change_is_a_new_key() {
        let baseline = baseline_with(&[slot(3, 2)]);
        let outcome = diff(&[slot(2, 2)], &baseline, Utc::now());
        assert_eq!(outcome.new_count, 1);
    }

    #[test]
    fn test_level_collision_last_write_wins() {
        let mut beginner = slot(1, 1);
        beginner.level = Level::Beginner;
        let advanced = slot(1, 1);

        let outcome = diff(&[beginner, advanced], &Baseline::new(), Utc::now());

        // Both compared against the empty pre-run baseline
        assert_eq!(outcome.new_or_increased.len(), 2);
        assert_eq!(outcome.next_baseline.len(), 1);
        let stored = outcome.next_baseline.get(&slot(1, 1).key()).unwrap();
        assert_eq!(stored.slot.level, Level::Advanced);
    }

    #[test]
    fn test_empty_run_empties_baseline() {
        let baseline = baseline_with(&[slot(3, 2)]);
        let outcome = diff(&[], &baseline, Utc::now());
        assert!(outcome.new_or_increased.is_empty());
        assert!(outcome.next_baseline.is_empty());
    }
}
