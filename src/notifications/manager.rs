//! Notification manager for sequential channel dispatch

use super::channels::telegram::{TelegramChannel, TelegramConfig};
use super::channels::webhook::{WebhookChannel, WebhookConfig};
use super::channels::{Channel, ChannelResult, DeliveryStatus};
use super::Notice;
use crate::config::NotificationConfig;

/// Dispatches a notice to every configured channel in turn
#[derive(Default)]
pub struct NotificationManager {
    /// Registered notification channels, in dispatch order
    channels: Vec<Box<dyn Channel>>,
}

impl NotificationManager {
    /// Create a manager with no channels
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// Build the channels named in configuration
    ///
    /// The webhook is registered first, then Telegram.
    pub fn from_config(config: &NotificationConfig) -> ChannelResult<Self> {
        let mut manager = Self::new();

        if let Some(url) = &config.webhook_url {
            let webhook = WebhookConfig::new(url.as_str()).with_timeout(config.timeout_secs);
            manager.add_channel(Box::new(WebhookChannel::new(webhook)?));
        }

        if let (Some(token), Some(chat_id)) = (&config.telegram_bot_token, &config.telegram_chat_id)
        {
            let telegram = TelegramConfig::new(token.as_str(), chat_id.as_str())
                .with_timeout(config.timeout_secs);
            manager.add_channel(Box::new(TelegramChannel::new(telegram)?));
        }

        Ok(manager)
    }

    /// Add a notification channel
    pub fn add_channel(&mut self, channel: Box<dyn Channel>) {
        tracing::debug!(config = %channel.config(), "Registered notification channel");
        self.channels.push(channel);
    }

    /// Add a webhook channel with URL
    pub fn add_webhook_channel(&mut self, url: &str) -> ChannelResult<()> {
        let channel = WebhookChannel::from_url(url)?;
        self.add_channel(Box::new(channel));
        Ok(())
    }

    /// Add a Telegram channel for a bot and chat
    pub fn add_telegram_channel(&mut self, config: TelegramConfig) -> ChannelResult<()> {
        let channel = TelegramChannel::new(config)?;
        self.add_channel(Box::new(channel));
        Ok(())
    }

    /// Names of the registered channels, in dispatch order
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Send a notice to every channel, one after another
    ///
    /// A failing channel is logged and recorded; the remaining channels are
    /// still attempted. Nothing is retried.
    pub async fn notify(&self, notice: &Notice) -> Vec<DeliveryStatus> {
        if self.channels.is_empty() {
            tracing::debug!("No notification channels configured");
            return Vec::new();
        }

        let mut statuses = Vec::with_capacity(self.channels.len());
        for channel in &self.channels {
            let status = match channel.send(notice).await {
                Ok(status) => status,
                Err(e) => {
                    tracing::error!(
                        channel = channel.name(),
                        error = %e,
                        "Failed to send notification"
                    );
                    DeliveryStatus::failure(channel.name(), e.to_string())
                }
            };
            statuses.push(status);
        }

        statuses
    }
}
