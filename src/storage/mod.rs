//! Persistence of the observed-slot baseline
//!
//! This module stores the last observation as a JSON file so that repeated
//! runs only report what changed.

pub mod baseline;

pub use baseline::{Baseline, BaselineStore, StoredSlot};
