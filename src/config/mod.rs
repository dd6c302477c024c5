//! Configuration management for the pado watcher
//!
//! This module handles loading and validating configuration from a TOML file
//! and environment variables, and resolving it into the immutable
//! [`WatchSettings`] a single run operates on.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::Level;
use crate::parser::{DateHint, DEFAULT_PROXIMITY};
use crate::utils::error::ParseError;
use crate::utils::parse_flag;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page acquisition configuration
    pub page: PageConfig,

    /// Which slots to watch
    pub watch: WatchConfig,

    /// Baseline persistence
    pub state: StateConfig,

    /// Outbound notification channels
    pub notifications: NotificationConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Diagnostic output
    pub debug: DebugConfig,
}

/// Page-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Schedule page URL
    pub url: String,

    /// `data-framer-name` of the container holding seat counts
    pub seat_region: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// User agent string
    pub user_agent: String,
}

/// Slot selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Dates to report on (YYYY-MM-DD)
    pub target_dates: Vec<NaiveDate>,

    /// Levels to report on
    pub target_levels: Vec<Level>,

    /// Report every date on the page
    pub include_all_dates: bool,

    /// Add today's date to the target dates
    pub include_today: bool,

    /// Max fragment distance between a level label and its seat count
    pub proximity: usize,
}

/// Baseline state configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Baseline JSON file
    pub path: PathBuf,
}

/// Notification channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Generic webhook endpoint (optional)
    pub webhook_url: Option<String>,

    /// Telegram bot token (optional)
    pub telegram_bot_token: Option<String>,

    /// Telegram chat id (optional)
    pub telegram_chat_id: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

/// Diagnostic output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Write the fetched HTML here on every run
    pub dump_html: Option<PathBuf>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            url: String::from("https://wavepark.framer.website/"),
            seat_region: String::from("잔여좌우"),
            request_timeout_secs: 30,
            user_agent: String::from(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            ),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            target_dates: Vec::new(),
            target_levels: vec![Level::Advanced],
            include_all_dates: false,
            include_today: true,
            proximity: DEFAULT_PROXIMITY,
        }
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("state.json"),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            telegram_bot_token: None,
            telegram_chat_id: None,
            timeout_secs: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

/// Effective watch configuration for one run
///
/// Computed once by [`Config::resolve`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSettings {
    /// Target dates, configured order, today appended when requested
    pub target_dates: Vec<NaiveDate>,

    /// Levels of interest, configured order, deduplicated
    pub target_levels: Vec<Level>,

    /// Pass every reconstructed slot through the date filter
    pub include_all_dates: bool,

    /// Year and fallback date for fragments without a date marker
    pub date_hint: DateHint,

    /// Level/seat proximity threshold
    pub proximity: usize,
}

impl Config {
    /// Defaults overlaid with environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// File (when given) or defaults, then environment overrides, then validation
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// `WEBHOOK_URL`, `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID` keep their
    /// historical unprefixed names.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(url) = env_var("PADO_URL") {
            self.page.url = url;
        }

        if let Some(dates) = env_var("PADO_TARGET_DATES") {
            self.watch.target_dates = split_list(&dates)
                .map(parse_date)
                .collect::<std::result::Result<_, _>>()
                .context("PADO_TARGET_DATES")?;
        }

        if let Some(levels) = env_var("PADO_TARGET_LEVELS") {
            self.watch.target_levels = split_list(&levels)
                .map(str::parse::<Level>)
                .collect::<std::result::Result<_, _>>()
                .context("PADO_TARGET_LEVELS")?;
        }

        if let Some(flag) = env_var("PADO_INCLUDE_ALL_DATES") {
            self.watch.include_all_dates = parse_flag(&flag).context("PADO_INCLUDE_ALL_DATES")?;
        }

        if let Some(flag) = env_var("PADO_INCLUDE_TODAY") {
            self.watch.include_today = parse_flag(&flag).context("PADO_INCLUDE_TODAY")?;
        }

        if let Some(path) = env_var("PADO_STATE_PATH") {
            self.state.path = PathBuf::from(path);
        }

        if let Some(url) = env_var("WEBHOOK_URL") {
            self.notifications.webhook_url = Some(url);
        }

        if let Some(token) = env_var("TELEGRAM_BOT_TOKEN") {
            self.notifications.telegram_bot_token = Some(token);
        }

        if let Some(chat_id) = env_var("TELEGRAM_CHAT_ID") {
            self.notifications.telegram_chat_id = Some(chat_id);
        }

        if let Some(level) = env_var("PADO_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(format) = env_var("PADO_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.page.url)
            .with_context(|| format!("page.url is not a valid URL: {}", self.page.url))?;

        if self.page.seat_region.trim().is_empty() {
            anyhow::bail!("page.seat_region must not be empty");
        }

        if self.page.request_timeout_secs == 0 {
            anyhow::bail!("page.request_timeout_secs must be greater than 0");
        }

        if self.watch.target_levels.is_empty() {
            anyhow::bail!("watch.target_levels must name at least one level");
        }

        if self.watch.proximity == 0 {
            anyhow::bail!("watch.proximity must be greater than 0");
        }

        if !self.watches_any_date() {
            tracing::warn!(
                "No dates to watch: every run will report nothing and save an empty baseline. \
                 Set watch.target_dates, watch.include_today or watch.include_all_dates"
            );
        }

        if let Some(url) = &self.notifications.webhook_url {
            url::Url::parse(url)
                .with_context(|| format!("notifications.webhook_url is not a valid URL: {url}"))?;
        }

        if self.telegram_incomplete() {
            tracing::warn!(
                "Only one of telegram_bot_token and telegram_chat_id is set; Telegram notifications are disabled"
            );
        }

        if self.notifications.timeout_secs == 0 {
            anyhow::bail!("notifications.timeout_secs must be greater than 0");
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("logging.format must be text or json");
        }

        Ok(())
    }

    /// Whether any date can pass the date filter
    pub fn watches_any_date(&self) -> bool {
        self.watch.include_all_dates
            || self.watch.include_today
            || !self.watch.target_dates.is_empty()
    }

    /// Exactly one of the two Telegram credentials is present
    pub fn telegram_incomplete(&self) -> bool {
        self.notifications.telegram_bot_token.is_some()
            != self.notifications.telegram_chat_id.is_some()
    }

    /// Resolve the effective watch settings for a run starting on `today`
    pub fn resolve(&self, today: NaiveDate) -> WatchSettings {
        let mut target_dates: Vec<NaiveDate> = Vec::new();
        for date in &self.watch.target_dates {
            if !target_dates.contains(date) {
                target_dates.push(*date);
            }
        }
        if self.watch.include_today && !target_dates.contains(&today) {
            target_dates.push(today);
        }

        let mut target_levels: Vec<Level> = Vec::new();
        for level in &self.watch.target_levels {
            if !target_levels.contains(level) {
                target_levels.push(*level);
            }
        }

        WatchSettings {
            target_dates,
            target_levels,
            include_all_dates: self.watch.include_all_dates,
            date_hint: DateHint::from_targets(&self.watch.target_dates, today),
            proximity: self.watch.proximity,
        }
    }

    /// Get page request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.page.request_timeout_secs)
    }

    /// Get notification request timeout as Duration
    #[must_use]
    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notifications.timeout_secs)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ParseError::InvalidDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const ENV_KEYS: &[&str] = &[
        "PADO_URL",
        "PADO_TARGET_DATES",
        "PADO_TARGET_LEVELS",
        "PADO_INCLUDE_ALL_DATES",
        "PADO_INCLUDE_TODAY",
        "PADO_STATE_PATH",
        "WEBHOOK_URL",
        "TELEGRAM_BOT_TOKEN",
        "TELEGRAM_CHAT_ID",
        "PADO_LOG_LEVEL",
        "PADO_LOG_FORMAT",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.watch.target_levels, vec![Level::Advanced]);
        assert_eq!(config.watch.proximity, 10);
    }

    #[test]
    fn test_no_dates_is_allowed() {
        let mut config = Config::default();
        config.watch.include_today = false;
        assert!(!config.watches_any_date());
        assert!(config.validate().is_ok());

        let settings = config.resolve(ymd(2024, 9, 27));
        assert!(settings.target_dates.is_empty());
        assert!(!settings.include_all_dates);

        config.watch.include_all_dates = true;
        assert!(config.watches_any_date());
    }

    #[test]
    fn test_half_telegram_config_is_allowed() {
        let mut config = Config::default();
        config.notifications.telegram_bot_token = Some("123:abc".into());
        assert!(config.telegram_incomplete());
        assert!(config.validate().is_ok());

        config.notifications.telegram_chat_id = Some("42".into());
        assert!(!config.telegram_incomplete());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_webhook_url() {
        let mut config = Config::default();
        config.notifications.webhook_url = Some("not a url".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [watch]
            target_dates = ["2024-09-27", "2024-09-28"]
            target_levels = ["상급", "intermediate"]
            "#,
        )
        .unwrap();

        assert_eq!(config.watch.target_dates, vec![ymd(2024, 9, 27), ymd(2024, 9, 28)]);
        assert_eq!(
            config.watch.target_levels,
            vec![Level::Advanced, Level::Intermediate]
        );
        assert_eq!(config.page.seat_region, "잔여좌우");
        assert_eq!(config.state.path, PathBuf::from("state.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_appends_today_once() {
        let mut config = Config::default();
        config.watch.target_dates = vec![ymd(2024, 9, 27), ymd(2024, 9, 27)];
        config.watch.include_today = true;

        let settings = config.resolve(ymd(2024, 9, 20));
        assert_eq!(settings.target_dates, vec![ymd(2024, 9, 27), ymd(2024, 9, 20)]);

        let settings = config.resolve(ymd(2024, 9, 27));
        assert_eq!(settings.target_dates, vec![ymd(2024, 9, 27)]);
    }

    #[test]
    fn test_resolve_does_not_mutate_config() {
        let config = Config::default();
        let _ = config.resolve(ymd(2024, 9, 20));
        assert!(config.watch.target_dates.is_empty());
    }

    #[test]
    fn test_resolve_date_hint() {
        let mut config = Config::default();
        config.watch.target_dates = vec![ymd(2025, 11, 29), ymd(2025, 11, 30)];
        let settings = config.resolve(ymd(2026, 1, 1));
        assert_eq!(settings.date_hint.year, 2025);
        assert_eq!(settings.date_hint.fallback_date, "2025-11-29");

        let settings = Config::default().resolve(ymd(2026, 1, 1));
        assert_eq!(settings.date_hint.fallback_date, "2026-01-01");
    }

    #[test]
    fn test_request_timeout_conversion() {
        let config = Config::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.notification_timeout(), Duration::from_secs(10));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        std::env::set_var("PADO_TARGET_DATES", "2024-09-27, 2024-09-28");
        std::env::set_var("PADO_TARGET_LEVELS", "상급,beginner");
        std::env::set_var("PADO_INCLUDE_TODAY", "false");
        std::env::set_var("WEBHOOK_URL", "https://script.example.com/exec");

        let config = Config::from_env().unwrap();
        clear_env();

        assert_eq!(config.watch.target_dates, vec![ymd(2024, 9, 27), ymd(2024, 9, 28)]);
        assert_eq!(config.watch.target_levels, vec![Level::Advanced, Level::Beginner]);
        assert!(!config.watch.include_today);
        assert_eq!(
            config.notifications.webhook_url.as_deref(),
            Some("https://script.example.com/exec")
        );
    }

    #[test]
    #[serial]
    fn test_env_override_rejects_bad_date() {
        clear_env();
        std::env::set_var("PADO_TARGET_DATES", "9/27");
        let result = Config::from_env();
        clear_env();
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_empty_env_is_ignored() {
        clear_env();
        std::env::set_var("WEBHOOK_URL", "");
        let config = Config::from_env().unwrap();
        clear_env();
        assert!(config.notifications.webhook_url.is_none());
    }
}
