//! Page rendering: from a URL to an ordered list of text fragments
//!
//! - [`HttpRenderer`] - fetch the live page over HTTP
//! - [`FileRenderer`] - read a saved HTML snapshot
//! - [`StaticRenderer`] - serve a fixed fragment list

pub mod extract;
pub mod fetcher;
pub mod selectors;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::models::Fragment;
use crate::utils::decode_body;
use crate::utils::error::FetchError;

pub use extract::FragmentExtractor;
pub use fetcher::HttpRenderer;

/// Source of the rendered fragment sequence
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Renderer name for logs
    fn name(&self) -> &str;

    /// Produce the visible text fragments of `url` in document order
    async fn render(&self, url: &str) -> Result<Vec<Fragment>, FetchError>;
}

/// Renders a saved HTML file, ignoring the URL
pub struct FileRenderer {
    path: PathBuf,
    extractor: FragmentExtractor,
}

impl FileRenderer {
    pub fn new(path: impl AsRef<Path>, seat_region: &str) -> Result<Self, FetchError> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            extractor: FragmentExtractor::new(seat_region)?,
        })
    }
}

#[async_trait]
impl PageRenderer for FileRenderer {
    fn name(&self) -> &str {
        "file"
    }

    async fn render(&self, _url: &str) -> Result<Vec<Fragment>, FetchError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| FetchError::Snapshot {
                path: self.path.display().to_string(),
                source,
            })?;
        let html = decode_body(&bytes, "")?;
        self.extractor.extract(&html)
    }
}

/// Serves the same fragments on every call
#[derive(Debug, Clone, Default)]
pub struct StaticRenderer {
    fragments: Vec<Fragment>,
}

impl StaticRenderer {
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    /// Plain fragments from bare strings
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(texts.into_iter().map(Fragment::plain).collect())
    }
}

#[async_trait]
impl PageRenderer for StaticRenderer {
    fn name(&self) -> &str {
        "static"
    }

    async fn render(&self, _url: &str) -> Result<Vec<Fragment>, FetchError> {
        Ok(self.fragments.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_static_renderer() {
        let renderer = StaticRenderer::from_texts(["9/27 (토)", "10:00"]);
        let fragments = renderer.render("ignored").await.unwrap();
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[1].text, "10:00");
    }

    #[tokio::test]
    async fn test_file_renderer() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<html><body><p>상급</p><p>3/2</p></body></html>").unwrap();

        let renderer = FileRenderer::new(file.path(), "잔여좌우").unwrap();
        let fragments = renderer.render("").await.unwrap();
        assert_eq!(fragments.len(), 2);
    }

    #[tokio::test]
    async fn test_file_renderer_missing_file() {
        let renderer = FileRenderer::new("/nonexistent/page.html", "잔여좌우").unwrap();
        let result = renderer.render("").await;
        assert!(matches!(result, Err(FetchError::Snapshot { .. })));
    }
}
