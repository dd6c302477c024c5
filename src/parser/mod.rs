//! Fragment parsing and slot reconstruction
//!
//! This module turns the ordered text fragments of the schedule page into
//! structured [`Slot`](crate::models::Slot) records.
//!
//! - [`classify`] - per-fragment token classification
//! - [`reconstruct`] - context-tracking fold binding seat counts to sessions
//! - [`sanitize`] - text node cleanup applied before classification

pub mod classify;
pub mod reconstruct;
pub mod sanitize;

// Re-export main parser and public types
pub use classify::{classify, Classification, MonthDay, SOLD_OUT_LABEL};
pub use reconstruct::{nearest_preceding_date, DateHint, SlotReconstructor, DEFAULT_PROXIMITY};
