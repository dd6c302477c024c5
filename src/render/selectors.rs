//! CSS selectors for the schedule page
//!
//! The page is a Framer site. Structure is generated, so only two markers are
//! stable enough to rely on: inline `background-color` styles on level
//! badges, and the `data-framer-name` given to the seat-count container.

use lazy_static::lazy_static;
use scraper::Selector;

use crate::utils::error::FetchError;

// Helper macro to parse selectors safely at compile time
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

lazy_static! {
    pub static ref BODY: Selector = parse_selector!("body");

    pub static ref BACKGROUND_DIV: Selector = parse_selector!(r#"div[style*="background-color"]"#);
}

/// Elements whose text is never visible
pub const INVISIBLE_CONTAINERS: &[&str] = &["script", "style", "noscript", "template"];

/// Selector for the container named `name` via `data-framer-name`
pub fn seat_region_selector(name: &str) -> Result<Selector, FetchError> {
    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    let css = format!(r#"[data-framer-name="{escaped}"]"#);
    Selector::parse(&css).map_err(|e| FetchError::InvalidSelector(format!("{css}: {e:?}")))
}
