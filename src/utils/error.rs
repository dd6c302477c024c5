//! Error types for the pado watcher
//!
//! This module defines the leaf error types used by the page renderer and
//! by configuration value parsing.

use thiserror::Error;

/// Errors that can occur while acquiring the rendered page
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code
    #[error("Server responded with status {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Content decoding error
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Local snapshot could not be read
    #[error("Failed to read snapshot {path}: {source}")]
    Snapshot {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The document has no <body> to walk
    #[error("Document has no body element")]
    MissingBody,

    /// Selector built from configuration is invalid
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

/// Errors that can occur while parsing configuration values
#[derive(Error, Debug)]
pub enum ParseError {
    /// Unknown level name
    #[error("Unknown level: {0}")]
    InvalidLevel(String),

    /// Date not in YYYY-MM-DD form
    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    /// Boolean flag not understood
    #[error("Invalid boolean flag: {0}")]
    InvalidFlag(String),
}

impl FetchError {
    /// Whether a later run could plausibly succeed without intervention
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout => true,
            Self::ServerError(code) => matches!(code, 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }

    pub fn korean_desc(&self) -> &'static str {
        match self {
            Self::Http(_) => "HTTP 요청 실패",
            Self::ServerError(_) => "서버 오류 응답",
            Self::Timeout => "요청 시간 초과",
            Self::Decode(_) => "본문 디코딩 실패",
            Self::InvalidUrl(_) => "잘못된 URL",
            Self::Snapshot { .. } => "스냅샷 파일 읽기 실패",
            Self::MissingBody => "페이지 본문 없음",
            Self::InvalidSelector(_) => "잘못된 선택자",
        }
    }
}
