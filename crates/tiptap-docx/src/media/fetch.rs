//! Fetching remote image bytes.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;

/// Why a fetch failed.
#[derive(Debug, Clone)]
pub struct FetchError {
    /// The requested locator.
    pub url: String,
    /// The cause, unreachable host or a non-2xx status.
    pub reason: String,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "network error fetching {}: {}", self.url, self.reason)
    }
}

impl std::error::Error for FetchError {}

/// Retrieves the bytes behind a locator.
///
/// Dropping the returned future must abandon the request.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`, failing on unreachable hosts and non-2xx responses.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Configuration of [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Bound of a whole request, `None` for no bound.
    pub timeout: Option<Duration>,
    /// The user agent header.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            user_agent: concat!("tiptap-docx/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl FetchConfig {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Fetches over HTTP(S) with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher from a configuration.
    pub fn new(config: &FetchConfig) -> crate::Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| format!("failed to build http client: {e}"))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let error = |reason: String| FetchError {
            url: url.to_owned(),
            reason,
        };

        debug!("fetching image {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| error(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(error(format!("status {status}")));
        }

        let bytes = response.bytes().await.map_err(|e| error(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
