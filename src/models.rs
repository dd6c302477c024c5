// Core data structures for pado

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::ParseError;

/// Placeholder time used when a seat count is bound before any time marker
pub const UNKNOWN_TIME: &str = "unknown";

/// Session skill level as labelled on the booking page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "초급", alias = "beginner", alias = "Beginner")]
    Beginner,
    #[serde(rename = "중급", alias = "intermediate", alias = "Intermediate")]
    Intermediate,
    #[serde(rename = "상급", alias = "advanced", alias = "Advanced")]
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    /// Korean label exactly as it appears on the page
    pub fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "초급",
            Self::Intermediate => "중급",
            Self::Advanced => "상급",
        }
    }

    /// English name, used in logs and config
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Match a page label exactly (no trimming, no case folding)
    pub fn from_label(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.label() == text)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Level {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(level) = Self::from_label(s) {
            return Ok(level);
        }
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::InvalidLevel(s.to_string()))
    }
}

/// Background colour class of the container a fragment was rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleHint {
    /// rgb(239, 68, 68)
    Red,
    /// rgb(245, 158, 11)
    Amber,
    /// rgb(34, 197, 94)
    Green,
}

impl StyleHint {
    /// Map an `rgb(r, g, b)` triple to a known colour class
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Option<Self> {
        match (r, g, b) {
            (239, 68, 68) => Some(Self::Red),
            (245, 158, 11) => Some(Self::Amber),
            (34, 197, 94) => Some(Self::Green),
            _ => None,
        }
    }

    /// Level the page encodes with this colour
    pub fn level(&self) -> Level {
        match self {
            Self::Red => Level::Advanced,
            Self::Amber => Level::Intermediate,
            Self::Green => Level::Beginner,
        }
    }
}

/// Minimal container context captured alongside a text fragment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentContext {
    pub style_hint: Option<StyleHint>,
    pub in_seat_region: bool,
}

/// One visible text node of the rendered page, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    pub context: FragmentContext,
}

impl Fragment {
    /// Plain fragment with no style hint, outside any seat region
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context: FragmentContext::default(),
        }
    }

    /// Fragment found inside the designated seat-count container
    pub fn in_seat_region(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context: FragmentContext {
                style_hint: None,
                in_seat_region: true,
            },
        }
    }

    /// Fragment rendered on a coloured background
    pub fn styled(text: impl Into<String>, hint: StyleHint) -> Self {
        Self {
            text: text.into(),
            context: FragmentContext {
                style_hint: Some(hint),
                in_seat_region: false,
            },
        }
    }
}

/// A reconstructed availability record
///
/// Serialized with the field names the webhook receiver and the state file
/// have always used (`leftSeats`, `raw`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub date: String, // YYYY-MM-DD
    pub time: String, // HH:00 or UNKNOWN_TIME
    pub level: Level,
    pub left_seats: u32,
    pub right_seats: u32,
    /// Widened so the sum of two `u32` halves is always exact
    pub total_seats: u64,
    #[serde(rename = "raw")]
    pub raw_text: String,
}

impl Slot {
    pub fn new(
        date: impl Into<String>,
        time: impl Into<String>,
        level: Level,
        left_seats: u32,
        right_seats: u32,
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            level,
            left_seats,
            right_seats,
            total_seats: u64::from(left_seats) + u64::from(right_seats),
            raw_text: raw_text.into(),
        }
    }

    /// Cross-run identity: `{date}-{time}-{left}/{right}`
    ///
    /// Level is not part of the key, so two levels with the same date, time
    /// and seat split collide.
    pub fn key(&self) -> SlotKey {
        SlotKey(format!(
            "{}-{}-{}/{}",
            self.date, self.time, self.left_seats, self.right_seats
        ))
    }
}

/// Composite string identity of a [`Slot`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotKey(String);

impl SlotKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_labels() {
        assert_eq!(Level::from_label("상급"), Some(Level::Advanced));
        assert_eq!(Level::from_label("중급"), Some(Level::Intermediate));
        assert_eq!(Level::from_label("초급"), Some(Level::Beginner));
        assert_eq!(Level::from_label(" 상급"), None);
    }

    #[test]
    fn test_level_from_str_accepts_english() {
        assert_eq!("advanced".parse::<Level>().unwrap(), Level::Advanced);
        assert_eq!("Beginner".parse::<Level>().unwrap(), Level::Beginner);
        assert_eq!("중급".parse::<Level>().unwrap(), Level::Intermediate);
        assert!("expert".parse::<Level>().is_err());
    }

    #[test]
    fn test_level_serializes_as_label() {
        let json = serde_json::to_string(&Level::Advanced).unwrap();
        assert_eq!(json, "\"상급\"");

        let parsed: Level = serde_json::from_str("\"advanced\"").unwrap();
        assert_eq!(parsed, Level::Advanced);
    }

    #[test]
    fn test_style_hint_mapping() {
        assert_eq!(StyleHint::from_rgb(239, 68, 68), Some(StyleHint::Red));
        assert_eq!(StyleHint::from_rgb(0, 0, 0), None);
        assert_eq!(StyleHint::Red.level(), Level::Advanced);
        assert_eq!(StyleHint::Green.level(), Level::Beginner);
    }

    #[test]
    fn test_slot_key_format() {
        let slot = Slot::new("2024-09-27", "10:00", Level::Advanced, 3, 2, "3/2");
        assert_eq!(slot.total_seats, 5);
        assert_eq!(slot.key().as_str(), "2024-09-27-10:00-3/2");
    }

    #[test]
    fn test_total_seats_exact_at_u32_max() {
        let slot = Slot::new("2024-09-27", "10:00", Level::Advanced, u32::MAX, u32::MAX, "raw");
        assert_eq!(slot.total_seats, 2 * u64::from(u32::MAX));
        assert_eq!(slot.total_seats, u64::from(slot.left_seats) + u64::from(slot.right_seats));
    }

    #[test]
    fn test_slot_key_ignores_level() {
        let a = Slot::new("2024-09-27", "10:00", Level::Advanced, 1, 1, "1/1");
        let b = Slot::new("2024-09-27", "10:00", Level::Beginner, 1, 1, "1/1");
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_slot_json_field_names() {
        let slot = Slot::new("2024-09-27", "10:00", Level::Advanced, 3, 2, "3/2");
        let value = serde_json::to_value(&slot).unwrap();
        assert_eq!(value["leftSeats"], 3);
        assert_eq!(value["rightSeats"], 2);
        assert_eq!(value["totalSeats"], 5);
        assert_eq!(value["level"], "상급");
        assert_eq!(value["raw"], "3/2");
    }
}
