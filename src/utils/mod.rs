//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod error;

use encoding_rs::{EUC_KR, UTF_8};

use self::error::FetchError;

/// Decode a response body to UTF-8, honoring the declared charset
///
/// Order of preference:
/// 1. `charset=` in the Content-Type header
/// 2. UTF-8
/// 3. EUC-KR, when UTF-8 decoding produced replacement characters
pub fn decode_body(bytes: &[u8], content_type: &str) -> Result<String, FetchError> {
    let content_type = content_type.to_ascii_lowercase();

    if content_type.contains("charset=euc-kr") {
        return decode_with(EUC_KR, bytes);
    }

    let (text, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return Ok(text.into_owned());
    }

    decode_with(EUC_KR, bytes)
}

fn decode_with(
    encoding: &'static encoding_rs::Encoding,
    bytes: &[u8],
) -> Result<String, FetchError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(FetchError::Decode(format!(
            "Failed to decode content as {}",
            encoding.name()
        )));
    }
    Ok(text.into_owned())
}

/// Parse a loose boolean flag (`1`, `true`, `yes`, `on`)
pub fn parse_flag(value: &str) -> Result<bool, error::ParseError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(error::ParseError::InvalidFlag(other.to_string())),
    }
}
