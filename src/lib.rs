//! pado - WavePark session availability watcher
//!
//! Reads the rendered text of the WavePark booking page, rebuilds the
//! date × time × level × seat table from an unstructured fragment stream,
//! and announces only slots that are new or gained seats since the last run.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`render`] - Page acquisition and text fragment extraction
//! - [`parser`] - Fragment classification and slot reconstruction
//! - [`watch`] - Date filtering, baseline diff and the monitoring run
//! - [`storage`] - Baseline persistence (JSON file)
//! - [`notifications`] - Webhook and Telegram delivery
//! - [`config`] - Configuration management and settings
//! - [`models`] - Core data structures and types
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use pado::config::Config;
//! use pado::watch::Monitor;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let today = chrono::Local::now().date_naive();
//!     let monitor = Monitor::from_config(&config, today)?;
//!     let report = monitor.run_once().await?;
//!     println!("{} slots reported", report.new_or_increased.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod notifications;
pub mod parser;
pub mod render;
pub mod storage;
pub mod utils;
pub mod watch;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, WatchSettings};
    pub use crate::error::{Error, ErrorCategory, PadoErrorTrait, Result};
    pub use crate::models::{Fragment, FragmentContext, Level, Slot, SlotKey, StyleHint};
    pub use crate::notifications::{NotificationManager, Notice};
    pub use crate::parser::{DateHint, SlotReconstructor};
    pub use crate::render::{FileRenderer, HttpRenderer, PageRenderer, StaticRenderer};
    pub use crate::storage::{Baseline, BaselineStore};
    pub use crate::watch::{Monitor, RunReport};
}

// Direct re-exports for convenience
pub use models::{Fragment, Level, Slot, SlotKey};
