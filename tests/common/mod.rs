//! Common test utilities

use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use pado::config::WatchSettings;
use pado::models::{Level, Slot};
use pado::notifications::NotificationManager;
use pado::parser::{DateHint, DEFAULT_PROXIMITY};
use pado::render::StaticRenderer;
use pado::storage::BaselineStore;
use pado::watch::Monitor;

/// Test fixture paths
pub const FIXTURES_DIR: &str = "tests/fixtures/html";

pub const PAGE_URL: &str = "https://wavepark.framer.website/";

#[allow(dead_code)]
pub fn load_fixture(filename: &str) -> String {
    let path = format!("{FIXTURES_DIR}/{filename}");
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to load fixture: {path}"))
}

#[allow(dead_code)]
pub fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(FIXTURES_DIR).join(filename)
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Settings watching only the given dates and levels
pub fn settings(dates: &[NaiveDate], levels: &[Level]) -> WatchSettings {
    WatchSettings {
        target_dates: dates.to_vec(),
        target_levels: levels.to_vec(),
        include_all_dates: false,
        date_hint: DateHint::new(dates[0]),
        proximity: DEFAULT_PROXIMITY,
    }
}

/// Monitor over a fixed fragment list with no notification channels
#[allow(dead_code)]
pub fn static_monitor(
    texts: &[&str],
    settings: WatchSettings,
    store: BaselineStore,
    notifier: NotificationManager,
) -> Monitor {
    Monitor::new(
        PAGE_URL,
        Box::new(StaticRenderer::from_texts(texts.iter().copied())),
        settings,
        store,
        notifier,
    )
}

#[allow(dead_code)]
pub fn advanced_slot(date: &str, time: &str, left: u32, right: u32) -> Slot {
    Slot::new(date, time, Level::Advanced, left, right, format!("{left}/{right}"))
}
