//! One monitoring run, end to end
//!
//! ```text
//! render ─▶ reconstruct ─▶ filter ─▶ diff ─▶ notify ─▶ save baseline
//!                                     ▲
//!                              load baseline
//! ```
//!
//! A render failure aborts the run before anything is written. Notification
//! failures are recorded in the report and never abort the run.

use chrono::{NaiveDate, Utc};
use std::path::PathBuf;

use crate::config::{Config, WatchSettings};
use crate::error::{Error, Result};
use crate::models::Slot;
use crate::notifications::{DeliveryStatus, NotificationManager, Notice};
use crate::parser::SlotReconstructor;
use crate::render::{HttpRenderer, PageRenderer};
use crate::storage::{Baseline, BaselineStore};
use crate::watch::diff::{diff, DiffOutcome};
use crate::watch::filter::filter_slots;

/// Everything computed by a run before any side effect
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Slots as reconstructed, before date filtering
    pub reconstructed: Vec<Slot>,
    /// Slots that survived the date filter
    pub filtered: Vec<Slot>,
    /// Baseline as loaded at the start of the run
    pub previous: Baseline,
    pub outcome: DiffOutcome,
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub reconstructed: usize,
    pub filtered: usize,
    pub new_or_increased: Vec<Slot>,
    pub deliveries: Vec<DeliveryStatus>,
    pub baseline_path: PathBuf,
}

impl RunReport {
    pub fn failed_deliveries(&self) -> usize {
        self.deliveries.iter().filter(|d| !d.success).count()
    }
}

/// Wires the renderer, reconstructor, store and notifier together
pub struct Monitor {
    url: String,
    renderer: Box<dyn PageRenderer>,
    reconstructor: SlotReconstructor,
    settings: WatchSettings,
    store: BaselineStore,
    notifier: NotificationManager,
}

impl Monitor {
    pub fn new(
        url: impl Into<String>,
        renderer: Box<dyn PageRenderer>,
        settings: WatchSettings,
        store: BaselineStore,
        notifier: NotificationManager,
    ) -> Self {
        let reconstructor = SlotReconstructor::new(
            settings.date_hint.clone(),
            settings.target_levels.iter().copied(),
        )
        .with_proximity(settings.proximity);

        Self {
            url: url.into(),
            renderer,
            reconstructor,
            settings,
            store,
            notifier,
        }
    }

    /// Build a monitor for the live page from configuration
    pub fn from_config(config: &Config, today: NaiveDate) -> Result<Self> {
        let renderer = HttpRenderer::from_config(config)?;
        let notifier = NotificationManager::from_config(&config.notifications)?;

        Ok(Self::new(
            config.page.url.clone(),
            Box::new(renderer),
            config.resolve(today),
            BaselineStore::new(&config.state.path),
            notifier,
        ))
    }

    pub fn settings(&self) -> &WatchSettings {
        &self.settings
    }

    pub fn store(&self) -> &BaselineStore {
        &self.store
    }

    /// Render, reconstruct, filter and diff without notifying or saving
    pub async fn evaluate(&self) -> Result<Evaluation> {
        tracing::info!(url = %self.url, renderer = self.renderer.name(), "Rendering page");
        let fragments = self.renderer.render(&self.url).await?;

        let reconstructed = self.reconstructor.reconstruct(&fragments);
        let filtered = filter_slots(reconstructed.clone(), &self.settings);
        let previous = self.store.load();
        let outcome = diff(&filtered, &previous, Utc::now());

        tracing::info!(
            fragments = fragments.len(),
            reconstructed = reconstructed.len(),
            filtered = filtered.len(),
            new = outcome.new_count,
            increased = outcome.increased_count,
            "Evaluated page"
        );

        Ok(Evaluation {
            reconstructed,
            filtered,
            previous,
            outcome,
        })
    }

    /// Run once: notify about new or increased slots, then replace the baseline
    pub async fn run_once(&self) -> Result<RunReport> {
        let evaluation = self.evaluate().await?;
        let new_or_increased = evaluation.outcome.new_or_increased;

        let deliveries = if new_or_increased.is_empty() {
            tracing::info!("No new or increased slots");
            Vec::new()
        } else {
            let notice = Notice::new(new_or_increased.clone(), self.url.clone());
            self.notifier.notify(&notice).await
        };

        let baseline_path = self
            .store
            .save(&evaluation.outcome.next_baseline)
            .map_err(Error::storage)?;

        let report = RunReport {
            reconstructed: evaluation.reconstructed.len(),
            filtered: evaluation.filtered.len(),
            new_or_increased,
            deliveries,
            baseline_path,
        };

        if report.failed_deliveries() > 0 {
            tracing::warn!(
                failed = report.failed_deliveries(),
                total = report.deliveries.len(),
                "Some notifications were not delivered"
            );
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Level;
    use crate::parser::DateHint;
    use crate::parser::DEFAULT_PROXIMITY;
    use crate::render::StaticRenderer;
    use tempfile::TempDir;

    fn settings(target: NaiveDate) -> WatchSettings {
        WatchSettings {
            target_dates: vec![target],
            target_levels: vec![Level::Advanced],
            include_all_dates: false,
            date_hint: DateHint::new(target),
            proximity: DEFAULT_PROXIMITY,
        }
    }

    fn monitor(dir: &TempDir, texts: &[&str], target: NaiveDate) -> Monitor {
        Monitor::new(
            "https://wavepark.framer.website/",
            Box::new(StaticRenderer::from_texts(texts.iter().copied())),
            settings(target),
            BaselineStore::new(dir.path().join("state.json")),
            NotificationManager::new(),
        )
    }

    #[tokio::test]
    async fn test_evaluate_has_no_side_effects() {
        let dir = TempDir::new().unwrap();
        let target = NaiveDate::from_ymd_opt(2024, 9, 27).unwrap();
        let monitor = monitor(&dir, &["9/27 (토)", "10:00", "상급", "3/2"], target);

        let evaluation = monitor.evaluate().await.unwrap();
        assert_eq!(evaluation.outcome.new_or_increased.len(), 1);
        assert!(evaluation.previous.is_empty());
        assert!(!monitor.store().path().exists());
    }

    #[tokio::test]
    async fn test_second_run_reports_nothing() {
        let dir = TempDir::new().unwrap();
        let target = NaiveDate::from_ymd_opt(2024, 9, 27).unwrap();
        let monitor = monitor(&dir, &["9/27 (토)", "10:00", "상급", "3/2"], target);

        let first = monitor.run_once().await.unwrap();
        assert_eq!(first.new_or_increased.len(), 1);

        let second = monitor.run_once().await.unwrap();
        assert!(second.new_or_increased.is_empty());
        assert!(second.deliveries.is_empty());
        assert_eq!(second.filtered, 1);
    }
}
