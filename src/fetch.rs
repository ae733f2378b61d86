use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::redirect::Policy;
use tokio::runtime::Runtime;
use url::Url;

use crate::config::ArmoryConfig;
use crate::{ArmoryError, Result};

/// Retrieves the raw markup behind a URL
pub trait PageFetcher {
    fn fetch(&self, url: &Url) -> Result<String>;
}

/// Blocking armory client.
///
/// Wraps an async `reqwest` client and its own runtime, every call to
/// [`PageFetcher::fetch`] waits for the whole response body.
pub struct HttpFetcher {
    client: reqwest::Client,
    runtime: Runtime,
}

impl HttpFetcher {
    pub fn new(config: &ArmoryConfig) -> Result<Self> {
        let mut header = HeaderMap::new();
        header.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).map_err(|e| {
                ArmoryError::Other(anyhow::anyhow!(
                    "user agent {:?}: {}",
                    config.user_agent,
                    e
                ))
            })?,
        );
        let client = reqwest::Client::builder()
            .default_headers(header)
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .redirect(Policy::limited(config.max_redirects))
            .build()?;
        let runtime = Runtime::new()?;

        Ok(Self { client, runtime })
    }

    /// Get the page body, any non-success status is an error
    pub async fn fetch_async(&self, url: &Url) -> Result<String> {
        log::info!("fetching {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<String> {
        self.runtime.block_on(self.fetch_async(url))
    }
}
