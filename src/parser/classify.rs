//! Token classification for rendered text fragments
//!
//! Every fragment of the schedule page is exactly one of:
//!
//! | Pattern            | Example      | Classification  |
//! |--------------------|--------------|-----------------|
//! | `M/D (요일)`        | `9/27 (토)`  | `DateMarker`    |
//! | `HH:00`            | `10:00`      | `TimeMarker`    |
//! | level label        | `상급`        | `LevelMarker`   |
//! | `(-\|n)/(-\|n)`     | `3/2`, `-/4` | `SeatCount`     |
//! | `매진`              | `매진`        | `SoldOut`       |
//!
//! Anything else is `Unrecognized`.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::{Fragment, Level};

/// Literal the page shows when both sides are sold out
pub const SOLD_OUT_LABEL: &str = "매진";

static DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})\s*\([월화수목금토일]\)$").unwrap());

static TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2}:00$").unwrap());

// A leading minus is accepted here so that "-3/2" is still a seat count;
// the malformed half then parses as zero.
static SEAT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-?\d+|-)/(-?\d+|-)$").unwrap());

/// Month and day of a date marker; the year comes from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    /// Format as `YYYY-MM-DD` for the given year
    pub fn with_year(&self, year: i32) -> String {
        format!("{year:04}-{:02}-{:02}", self.month, self.day)
    }
}

/// Result of classifying a single fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    DateMarker(MonthDay),
    TimeMarker(String),
    LevelMarker(Level),
    SeatCount { left: u32, right: u32 },
    SoldOut,
    Unrecognized,
}

impl Classification {
    /// Seat split carried by a seat-count or sold-out fragment
    pub fn seats(&self) -> Option<(u32, u32)> {
        match self {
            Self::SeatCount { left, right } => Some((*left, *right)),
            Self::SoldOut => Some((0, 0)),
            _ => None,
        }
    }
}

/// Classify a fragment
///
/// Total and deterministic. Only level markers look at the fragment context:
/// a recognised background colour overrides the textual label.
pub fn classify(fragment: &Fragment) -> Classification {
    let text = fragment.text.as_str();

    if let Some(date) = parse_date_marker(text) {
        return Classification::DateMarker(date);
    }

    if TIME_REGEX.is_match(text) {
        return Classification::TimeMarker(text.to_string());
    }

    if let Some(level) = Level::from_label(text) {
        let level = fragment
            .context
            .style_hint
            .map(|hint| hint.level())
            .unwrap_or(level);
        return Classification::LevelMarker(level);
    }

    if text == SOLD_OUT_LABEL {
        return Classification::SoldOut;
    }

    if let Some(caps) = SEAT_REGEX.captures(text) {
        return Classification::SeatCount {
            left: parse_seat_half(&caps[1]),
            right: parse_seat_half(&caps[2]),
        };
    }

    Classification::Unrecognized
}

fn parse_date_marker(text: &str) -> Option<MonthDay> {
    let caps = DATE_REGEX.captures(text)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    Some(MonthDay { month, day })
}

/// `-` means zero; negative or overflowing numbers are malformed and also zero
fn parse_seat_half(half: &str) -> u32 {
    if half == "-" {
        return 0;
    }
    half.parse::<u32>().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StyleHint;

    fn classify_text(text: &str) -> Classification {
        classify(&Fragment::plain(text))
    }

    #[test]
    fn test_date_marker() {
        assert_eq!(
            classify_text("9/27 (토)"),
            Classification::DateMarker(MonthDay { month: 9, day: 27 })
        );
        assert_eq!(
            classify_text("12/1(월)"),
            Classification::DateMarker(MonthDay { month: 12, day: 1 })
        );
    }

    #[test]
    fn test_date_marker_out_of_range() {
        assert_eq!(classify_text("13/27 (토)"), Classification::Unrecognized);
        assert_eq!(classify_text("9/32 (토)"), Classification::Unrecognized);
        assert_eq!(classify_text("0/5 (화)"), Classification::Unrecognized);
    }

    #[test]
    fn test_date_marker_requires_korean_weekday() {
        assert_eq!(classify_text("9/27 (Sat)"), Classification::Unrecognized);
        assert_eq!(classify_text("9/27"), Classification::Unrecognized);
    }

    #[test]
    fn test_month_day_with_year() {
        let md = MonthDay { month: 9, day: 7 };
        assert_eq!(md.with_year(2024), "2024-09-07");
    }

    #[test]
    fn test_time_marker_on_the_hour_only() {
        assert_eq!(
            classify_text("10:00"),
            Classification::TimeMarker("10:00".to_string())
        );
        assert_eq!(classify_text("10:30"), Classification::Unrecognized);
        assert_eq!(classify_text("9:00"), Classification::Unrecognized);
    }

    #[test]
    fn test_level_marker_text() {
        assert_eq!(
            classify_text("상급"),
            Classification::LevelMarker(Level::Advanced)
        );
        assert_eq!(
            classify_text("초급"),
            Classification::LevelMarker(Level::Beginner)
        );
    }

    #[test]
    fn test_level_marker_color_overrides_text() {
        let fragment = Fragment::styled("중급", StyleHint::Red);
        assert_eq!(
            classify(&fragment),
            Classification::LevelMarker(Level::Advanced)
        );
    }

    #[test]
    fn test_color_alone_is_not_a_level() {
        let fragment = Fragment::styled("서핑", StyleHint::Red);
        assert_eq!(classify(&fragment), Classification::Unrecognized);
    }

    #[test]
    fn test_seat_counts() {
        assert_eq!(
            classify_text("3/2"),
            Classification::SeatCount { left: 3, right: 2 }
        );
        assert_eq!(
            classify_text("-/4"),
            Classification::SeatCount { left: 0, right: 4 }
        );
        assert_eq!(
            classify_text("5/-"),
            Classification::SeatCount { left: 5, right: 0 }
        );
        assert_eq!(
            classify_text("-/-"),
            Classification::SeatCount { left: 0, right: 0 }
        );
    }

    #[test]
    fn test_malformed_seat_halves_are_zero() {
        assert_eq!(
            classify_text("-3/2"),
            Classification::SeatCount { left: 0, right: 2 }
        );
        assert_eq!(
            classify_text("99999999999/1"),
            Classification::SeatCount { left: 0, right: 1 }
        );
    }

    #[test]
    fn test_sold_out() {
        let c = classify_text("매진");
        assert_eq!(c, Classification::SoldOut);
        assert_eq!(c.seats(), Some((0, 0)));
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(classify_text("예약하기"), Classification::Unrecognized);
        assert_eq!(classify_text("3 / 2"), Classification::Unrecognized);
        assert_eq!(classify_text(""), Classification::Unrecognized);
        assert_eq!(classify_text("3/2/1"), Classification::Unrecognized);
    }
}
