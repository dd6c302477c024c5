//! Unified error handling for the pado crate
//!
//! A monitoring run can fail in three places: acquiring the page, building
//! the notification channels, and writing the baseline. [`Error`] wraps the
//! domain error of each, and [`PadoErrorTrait`] gives the CLI what it needs
//! to report a failed run.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pado::error::{Error, PadoErrorTrait};
//!
//! fn report(err: &Error) {
//!     tracing::error!(
//!         category = err.category().korean_desc(),
//!         recoverable = err.is_recoverable(),
//!         "{}",
//!         err.korean_desc()
//!     );
//! }
//! ```

use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::notifications::channels::ChannelError;
pub use crate::utils::error::FetchError;

/// Common trait for all pado error types
pub trait PadoErrorTrait: std::error::Error {
    /// Check if this error is recoverable (a later run may succeed)
    fn is_recoverable(&self) -> bool;

    /// Get Korean description for user-facing messages
    fn korean_desc(&self) -> String;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Page acquisition errors (HTTP, timeout)
    Network,
    /// Page decoding errors
    Parsing,
    /// Snapshot and baseline file errors
    Storage,
    /// Notification delivery errors
    Notification,
    /// Configuration errors
    Config,
}

impl ErrorCategory {
    /// Get Korean description for the category
    pub fn korean_desc(&self) -> &'static str {
        match self {
            Self::Network => "네트워크 오류",
            Self::Parsing => "파싱 오류",
            Self::Storage => "저장소 오류",
            Self::Notification => "알림 오류",
            Self::Config => "설정 오류",
        }
    }
}

/// Unified error type for the pado crate
#[derive(Error, Debug)]
pub enum Error {
    /// Page acquisition errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Notification channel errors
    #[error("Notification error: {0}")]
    Channel(#[from] ChannelError),

    /// Baseline could not be written; the full context chain is kept
    #[error("Baseline error: {0}")]
    Storage(String),
}

impl Error {
    /// Wrap a baseline store failure, flattening its context chain
    pub fn storage(err: anyhow::Error) -> Self {
        Self::Storage(format!("{err:#}"))
    }
}

impl PadoErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_recoverable(),
            Self::Channel(e) => e.is_recoverable(),
            Self::Storage(_) => false,
        }
    }

    fn korean_desc(&self) -> String {
        match self {
            Self::Fetch(e) => e.korean_desc().to_string(),
            Self::Channel(e) => format!("알림 채널 오류: {e}"),
            Self::Storage(msg) => format!("기준 상태 저장 실패: {msg}"),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(FetchError::InvalidSelector(_)) => ErrorCategory::Config,
            Self::Fetch(FetchError::Snapshot { .. }) => ErrorCategory::Storage,
            Self::Fetch(FetchError::Decode(_) | FetchError::MissingBody) => ErrorCategory::Parsing,
            Self::Fetch(_) => ErrorCategory::Network,
            Self::Channel(ChannelError::InvalidConfig(_)) => ErrorCategory::Config,
            Self::Channel(_) => ErrorCategory::Notification,
            Self::Storage(_) => ErrorCategory::Storage,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category() {
        assert_eq!(Error::Fetch(FetchError::Timeout).category(), ErrorCategory::Network);
        assert_eq!(
            Error::Fetch(FetchError::MissingBody).category(),
            ErrorCategory::Parsing
        );
        assert_eq!(
            Error::Fetch(FetchError::InvalidSelector("[".into())).category(),
            ErrorCategory::Config
        );
        assert_eq!(
            Error::Channel(ChannelError::InvalidConfig("empty url".into())).category(),
            ErrorCategory::Config
        );
    }

    #[test]
    fn test_is_recoverable() {
        assert!(Error::Fetch(FetchError::Timeout).is_recoverable());
        assert!(Error::Fetch(FetchError::ServerError(503)).is_recoverable());
        assert!(!Error::Fetch(FetchError::ServerError(404)).is_recoverable());
        assert!(!Error::Fetch(FetchError::MissingBody).is_recoverable());
        assert!(!Error::storage(anyhow::anyhow!("disk full")).is_recoverable());
    }

    #[test]
    fn test_korean_desc() {
        let err = Error::Fetch(FetchError::Timeout);
        assert_eq!(err.korean_desc(), "요청 시간 초과");
        assert_eq!(ErrorCategory::Storage.korean_desc(), "저장소 오류");
    }

    #[test]
    fn test_storage_keeps_context() {
        let err = Error::storage(anyhow::anyhow!("disk full").context("Failed to write baseline"));
        assert_eq!(err.category(), ErrorCategory::Storage);
        let msg = err.to_string();
        assert!(msg.contains("Failed to write baseline"));
        assert!(msg.contains("disk full"));
    }
}
