//! Property tests for seat-count classification

use proptest::prelude::*;

use pado::models::Fragment;
use pado::parser::{classify, Classification};

proptest! {
    #[test]
    fn seat_pair_parses_both_halves(left in 0u32..10_000, right in 0u32..10_000) {
        let class = classify(&Fragment::plain(format!("{left}/{right}")));
        prop_assert_eq!(class, Classification::SeatCount { left, right });
    }

    #[test]
    fn dash_left_is_zero(right in 0u32..10_000) {
        let class = classify(&Fragment::plain(format!("-/{right}")));
        prop_assert_eq!(class.seats(), Some((0, right)));
    }

    #[test]
    fn negative_half_is_zero(left in 1u32..10_000, right in 0u32..10_000) {
        let class = classify(&Fragment::plain(format!("-{left}/{right}")));
        prop_assert_eq!(class.seats(), Some((0, right)));
    }

    #[test]
    fn classification_is_deterministic(text in "\\PC{0,12}") {
        let fragment = Fragment::plain(text);
        prop_assert_eq!(classify(&fragment), classify(&fragment));
    }
}
