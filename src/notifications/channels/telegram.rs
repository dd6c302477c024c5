//! Telegram bot notification channel

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{rejected, Channel, ChannelError, ChannelResult, DeliveryStatus};
use crate::notifications::format::format_telegram_message;
use crate::notifications::Notice;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Telegram channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token from @BotFather
    pub bot_token: String,
    /// Target chat id
    pub chat_id: String,
    /// Bot API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    TELEGRAM_API_BASE.to_string()
}

fn default_timeout() -> u64 {
    10
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            api_base: default_api_base(),
            timeout_secs: default_timeout(),
        }
    }

    /// Point at a different Bot API server (self-hosted or test)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.bot_token.trim().is_empty() {
            return Err("Telegram bot token cannot be empty".to_string());
        }
        if self.chat_id.trim().is_empty() {
            return Err("Telegram chat id cannot be empty".to_string());
        }
        url::Url::parse(&self.api_base).map_err(|e| format!("Invalid Telegram API base: {e}"))?;
        if self.timeout_secs == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }
        Ok(())
    }

    /// `sendMessage` endpoint for this bot
    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }
}

/// Sends notices as HTML-formatted Telegram messages
pub struct TelegramChannel {
    config: TelegramConfig,
    client: Client,
}

impl TelegramChannel {
    pub fn new(config: TelegramConfig) -> ChannelResult<Self> {
        config.validate().map_err(ChannelError::InvalidConfig)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn build_payload(&self, notice: &Notice) -> serde_json::Value {
        serde_json::json!({
            "chat_id": self.config.chat_id,
            "text": format_telegram_message(notice),
            "parse_mode": "HTML",
        })
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, notice: &Notice) -> ChannelResult<DeliveryStatus> {
        let payload = self.build_payload(notice);

        let response = self
            .client
            .post(self.config.endpoint())
            .json(&payload)
            .send()
            .await
            // reqwest errors embed the URL, which carries the bot token
            .map_err(reqwest::Error::without_url)?;

        if !response.status().is_success() {
            return Err(rejected(response).await);
        }

        tracing::info!(
            chat_id = %self.config.chat_id,
            tickets = notice.len(),
            "Telegram message delivered"
        );

        Ok(DeliveryStatus::success_with_message(
            "telegram",
            format!("Delivered to chat {}", self.config.chat_id),
        ))
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name(),
            "chat_id": self.config.chat_id,
            "api_base": self.config.api_base,
            "timeout_secs": self.config.timeout_secs,
            "has_token": !self.config.bot_token.is_empty(),
        })
    }
}
