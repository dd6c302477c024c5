//! Change detection: filter, diff and the end-to-end monitoring run

pub mod diff;
pub mod filter;
pub mod pipeline;

pub use diff::{compare, diff, Change, DiffOutcome};
pub use filter::{filter_slots, DateSelection};
pub use pipeline::{Evaluation, Monitor, RunReport};
