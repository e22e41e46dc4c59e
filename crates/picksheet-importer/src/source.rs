//! Where tables come from: local files or HTTP(S) URLs.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default HTTP timeout for a whole request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A source of CSV text.
///
/// Implementors read the whole table into memory. Tables are small
/// spreadsheet exports, so streaming is not needed.
pub trait Fetch: Send + Sync {
    /// A human-readable name for messages (path or URL).
    fn name(&self) -> &str;

    /// Read the full contents.
    fn fetch(&self) -> Result<String>;
}

/// A CSV file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    /// Create a source for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    /// The file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Fetch for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<String> {
        std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to open file: {}", self.path.display()))
    }
}

/// A CSV export published at a URL (for example a shared spreadsheet).
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    timeout: Duration,
}

impl HttpSource {
    /// Create a source for the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Fetch for HttpSource {
    fn name(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> Result<String> {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .build()
            .into();

        tracing::debug!(url = %self.url, "fetching table");
        let mut response = agent
            .get(&self.url)
            .header("User-Agent", "picksheet/0.1")
            .call()
            .with_context(|| format!("Failed to fetch {}", self.url))?;

        response
            .body_mut()
            .read_to_string()
            .with_context(|| format!("Failed to read response from {}", self.url))
    }
}

/// Pick a source for a command-line argument.
///
/// `http://` and `https://` arguments are fetched over the network;
/// anything else is a file path.
pub fn source_for(arg: &str) -> Box<dyn Fetch> {
    if is_url(arg) {
        Box::new(HttpSource::new(arg))
    } else {
        Box::new(FileSource::new(arg))
    }
}

fn is_url(arg: &str) -> bool {
    let lower = arg.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
