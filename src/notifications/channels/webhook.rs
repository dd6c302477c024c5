//! Webhook notification channel
//!
//! This module provides a webhook channel for sending notices via HTTP POST
//! requests, typically to a Google Apps Script web app.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{rejected, Channel, ChannelError, ChannelResult, DeliveryStatus};
use crate::notifications::Notice;

/// Webhook channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Webhook URL endpoint
    pub url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    10
}

impl WebhookConfig {
    /// Create a new webhook configuration
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: default_timeout(),
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.url.is_empty() {
            return Err("Webhook URL cannot be empty".to_string());
        }

        let parsed = url::Url::parse(&self.url).map_err(|e| format!("Invalid webhook URL: {e}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err("Webhook URL must start with http:// or https://".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// Webhook notification channel
///
/// # Payload Format
///
/// ```json
/// {
///   "tickets": [
///     {
///       "date": "2024-09-27",
///       "time": "10:00",
///       "level": "상급",
///       "leftSeats": 3,
///       "rightSeats": 2,
///       "totalSeats": 5,
///       "raw": "3/2"
///     }
///   ]
/// }
/// ```
pub struct WebhookChannel {
    config: WebhookConfig,
    client: Client,
}

impl WebhookChannel {
    /// Create a new webhook channel
    pub fn new(config: WebhookConfig) -> ChannelResult<Self> {
        config.validate().map_err(ChannelError::InvalidConfig)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Create a simple webhook channel with just a URL
    pub fn from_url(url: impl Into<String>) -> ChannelResult<Self> {
        Self::new(WebhookConfig::new(url))
    }

    /// Get the webhook URL
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Build the webhook payload from a notice
    fn build_payload(&self, notice: &Notice) -> serde_json::Value {
        serde_json::json!({ "tickets": notice.tickets })
    }
}

#[async_trait]
impl Channel for WebhookChannel {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn send(&self, notice: &Notice) -> ChannelResult<DeliveryStatus> {
        let payload = self.build_payload(notice);

        let response = self.client.post(&self.config.url).json(&payload).send().await?;

        if !response.status().is_success() {
            return Err(rejected(response).await);
        }

        tracing::info!(
            url = %self.config.url,
            status = %response.status(),
            tickets = notice.len(),
            "Webhook delivered"
        );

        Ok(DeliveryStatus::success_with_message(
            "webhook",
            format!("Delivered to {}", self.config.url),
        ))
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name(),
            "url": self.config.url,
            "timeout_secs": self.config.timeout_secs,
        })
    }
}
