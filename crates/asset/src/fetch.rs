//! Byte retrieval for asset files.

use std::future::Future;
use std::time::Duration;

use crate::error::LoadError;

/// Source of raw asset bytes.
pub trait AssetFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, LoadError>> + Send;
}

/// Plain HTTP GET; any non-success status is a fetch failure.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        log::debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::fetch(url, format!("status {status}")));
        }

        let bytes = response.bytes().await.map_err(|e| LoadError::fetch(url, e))?;
        log::debug!("{url}: {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}
