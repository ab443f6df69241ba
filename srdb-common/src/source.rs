//! Data sources the YAML collections are fetched from
//!
//! A catalog can be read straight from a local directory or from any HTTP
//! server hosting the data directory. Both are hidden behind [`DataSource`]
//! so the loader and the reports stay agnostic of where bytes come from.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::{Error, Result};

const USER_AGENT: &str = concat!("srdb/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT_SECS: u64 = 30;

/// Somewhere data files can be fetched from by name
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch the full text of one data file
    ///
    /// Failures are reported as [`Error::Fetch`] naming `file_name`.
    async fn fetch_text(&self, file_name: &str) -> Result<String>;

    /// Human-readable location for log messages
    fn describe(&self) -> String;
}

/// Reads files below a local directory
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait]
impl DataSource for FsSource {
    async fn fetch_text(&self, file_name: &str) -> Result<String> {
        let path = self.root.join(file_name);
        debug!(path = %path.display(), "Reading data file");
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| fetch_error(file_name, format!("{} ({})", e, path.display())))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Fetches files relative to an HTTP base URL
#[derive(Debug, Clone)]
pub struct HttpSource {
    http_client: reqwest::Client,
    base: Url,
}

impl HttpSource {
    pub fn new(base: &str) -> Result<Self> {
        // Url::join drops the last path segment unless the base ends with '/'
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        };
        let base = Url::parse(&normalized)
            .map_err(|e| Error::Config(format!("Invalid data base URL {}: {}", base, e)))?;

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http_client, base })
    }

    /// Full URL of a data file
    pub fn url_for(&self, file_name: &str) -> Result<Url> {
        self.base
            .join(file_name)
            .map_err(|e| fetch_error(file_name, format!("invalid URL: {}", e)))
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch_text(&self, file_name: &str) -> Result<String> {
        let url = self.url_for(file_name)?;
        debug!(url = %url, "Fetching data file");

        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| fetch_error(file_name, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(
                file_name,
                format!("HTTP error: {} for {}", status.as_u16(), url),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| fetch_error(file_name, e.to_string()))
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}

/// In-memory files, keyed by name
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    files: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(name.into(), content.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.files.insert(name.into(), content.into());
    }
}

#[async_trait]
impl DataSource for StaticSource {
    async fn fetch_text(&self, file_name: &str) -> Result<String> {
        self.files
            .get(file_name)
            .cloned()
            .ok_or_else(|| fetch_error(file_name, "no such file".to_string()))
    }

    fn describe(&self) -> String {
        format!("memory ({} files)", self.files.len())
    }
}

/// Pick a source for a configured base: URLs go over HTTP, anything else is a directory
pub fn source_for_base(base: &str) -> Result<Arc<dyn DataSource>> {
    if is_http_base(base) {
        Ok(Arc::new(HttpSource::new(base)?))
    } else {
        Ok(Arc::new(FsSource::new(base)))
    }
}

pub fn is_http_base(base: &str) -> bool {
    let lower = base.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn fetch_error(file_name: &str, reason: String) -> Error {
    Error::Fetch {
        file: file_name.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_base_detection() {
        assert!(is_http_base("http://localhost:8000/data/"));
        assert!(is_http_base("HTTPS://example.org/data"));
        assert!(!is_http_base("./data/"));
        assert!(!is_http_base("/srv/catalog/data"));
    }

    #[test]
    fn test_http_source_joins_relative_paths() {
        let source = HttpSource::new("https://example.org/site/data").unwrap();
        let url = source.url_for("song-plays.yml").unwrap();
        assert_eq!(url.as_str(), "https://example.org/site/data/song-plays.yml");
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = HttpSource::new("::not-a-url").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_static_source_missing_file_is_fetch_error() {
        let source = StaticSource::new().with_file("a.yml", "[]");
        assert_eq!(source.fetch_text("a.yml").await.unwrap(), "[]");

        let err = source.fetch_text("b.yml").await.unwrap_err();
        assert!(err.is_fetch());
        assert_eq!(err.file(), Some("b.yml"));
    }

    #[tokio::test]
    async fn test_fs_source_reads_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("performers.yml"), "- code: P1\n  name: Elvis\n").unwrap();

        let source = FsSource::new(dir.path());
        let text = source.fetch_text("performers.yml").await.unwrap();
        assert!(text.contains("Elvis"));

        let err = source.fetch_text("missing.yml").await.unwrap_err();
        assert_eq!(err.file(), Some("missing.yml"));
    }
}
