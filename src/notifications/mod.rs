//! Notification of newly available slots
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │      NotificationManager                   │
//! │  - Sequential dispatch                     │
//! │  - Per-channel failure isolation           │
//! └────────────────────────────────────────────┘
//!                     │
//!             ┌───────┴───────┐
//!             ▼               ▼
//!       ┌─────────┐     ┌──────────┐
//!       │ Webhook │     │ Telegram │
//!       │ Channel │     │ Channel  │
//!       └─────────┘     └──────────┘
//! ```
//!
//! A failed delivery is logged and reported in the returned
//! [`DeliveryStatus`] list. It is never retried and never fails the run.
//!
//! # Example
//!
//! ```rust,ignore
//! use pado::notifications::{NotificationManager, Notice};
//!
//! let mut manager = NotificationManager::new();
//! manager.add_webhook_channel("https://script.google.com/macros/s/.../exec")?;
//!
//! let notice = Notice::new(slots, "https://wavepark.framer.website/");
//! for status in manager.notify(&notice).await {
//!     println!("{status}");
//! }
//! ```

pub mod channels;
pub mod format;
mod manager;

use chrono::{DateTime, Utc};

use crate::models::Slot;

// Re-exports
pub use channels::telegram::{TelegramChannel, TelegramConfig};
pub use channels::webhook::{WebhookChannel, WebhookConfig};
pub use channels::{Channel, ChannelError, DeliveryStatus};
pub use format::{format_summary, format_telegram_message, group_by_level, LevelGroup};
pub use manager::NotificationManager;

/// A batch of slots to announce
#[derive(Debug, Clone)]
pub struct Notice {
    /// New or increased slots, in encounter order
    pub tickets: Vec<Slot>,
    /// Booking page the slots were read from
    pub page_url: String,
    /// When the notice was assembled
    pub created_at: DateTime<Utc>,
}

impl Notice {
    pub fn new(tickets: Vec<Slot>, page_url: impl Into<String>) -> Self {
        Self {
            tickets,
            page_url: page_url.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Level;

    #[test]
    fn test_notice_creation() {
        let notice = Notice::new(
            vec![Slot::new("2024-09-27", "10:00", Level::Advanced, 3, 2, "3/2")],
            "https://wavepark.framer.website/",
        );
        assert_eq!(notice.len(), 1);
        assert!(!notice.is_empty());
        assert_eq!(notice.page_url, "https://wavepark.framer.website/");
    }
}
