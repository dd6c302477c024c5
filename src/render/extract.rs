//! Fragment extraction from rendered HTML
//!
//! Walks every text node under `<body>` in document order, the way a DOM
//! tree walker with `SHOW_TEXT` would, and pairs each visible string with
//! the container context the classifier and reconstructor need.

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

use crate::models::{Fragment, FragmentContext, StyleHint};
use crate::parser::sanitize::sanitize_fragment;
use crate::render::selectors::{seat_region_selector, BACKGROUND_DIV, BODY, INVISIBLE_CONTAINERS};
use crate::utils::error::FetchError;

static BACKGROUND_RGB_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"background-color\s*:\s*rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})")
        .unwrap()
});

/// Turns an HTML document into an ordered fragment list
#[derive(Debug, Clone)]
pub struct FragmentExtractor {
    seat_region: Selector,
    seat_region_name: String,
}

impl FragmentExtractor {
    /// Create an extractor for the seat container named `seat_region_name`
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidSelector` if the name cannot form a selector
    pub fn new(seat_region_name: &str) -> Result<Self, FetchError> {
        Ok(Self {
            seat_region: seat_region_selector(seat_region_name)?,
            seat_region_name: seat_region_name.to_string(),
        })
    }

    /// Extract visible text fragments in document order
    ///
    /// A missing seat-count container is logged and tolerated; seat counts
    /// can still bind through proximity.
    pub fn extract(&self, html: &str) -> Result<Vec<Fragment>, FetchError> {
        let document = Html::parse_document(html);
        let body = document.select(&BODY).next().ok_or(FetchError::MissingBody)?;

        let regions = document.select(&self.seat_region).count();
        if regions == 0 {
            tracing::warn!(
                region = %self.seat_region_name,
                "Seat-count region not found, continuing with proximity binding only"
            );
        } else {
            tracing::debug!(
                region = %self.seat_region_name,
                count = regions,
                "Seat-count regions found"
            );
        }

        let fragments: Vec<Fragment> = body
            .descendants()
            .filter_map(|node| {
                let Node::Text(text) = node.value() else {
                    return None;
                };

                let ancestors: Vec<ElementRef> =
                    node.ancestors().filter_map(ElementRef::wrap).collect();

                if ancestors
                    .iter()
                    .any(|el| INVISIBLE_CONTAINERS.contains(&el.value().name()))
                {
                    return None;
                }

                let text = sanitize_fragment(text);
                if text.is_empty() {
                    return None;
                }

                Some(Fragment {
                    text,
                    context: self.context_of(&ancestors),
                })
            })
            .collect();

        tracing::debug!(fragments = fragments.len(), "Extracted text fragments");
        Ok(fragments)
    }

    /// `ancestors` is nearest-first
    fn context_of(&self, ancestors: &[ElementRef]) -> FragmentContext {
        let style_hint = ancestors
            .iter()
            .find(|el| BACKGROUND_DIV.matches(el))
            .and_then(|el| el.value().attr("style"))
            .and_then(style_hint_from_css);

        let in_seat_region = ancestors.iter().any(|el| self.seat_region.matches(el));

        FragmentContext {
            style_hint,
            in_seat_region,
        }
    }
}

/// Colour class of an inline `background-color: rgb(...)` declaration
pub fn style_hint_from_css(style: &str) -> Option<StyleHint> {
    let caps = BACKGROUND_RGB_REGEX.captures(style)?;
    let r: u8 = caps[1].parse().ok()?;
    let g: u8 = caps[2].parse().ok()?;
    let b: u8 = caps[3].parse().ok()?;
    StyleHint::from_rgb(r, g, b)
}
