//! Downloads generated images from the provider's CDN.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{AdminError, Result};

#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AdminError::Download(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AdminError::Download(format!("HTTP {status} for {url}")));
        }
        let bytes = response.bytes().await.map_err(|e| AdminError::Download(e.to_string()))?;
        debug!(%url, size = bytes.len(), "Downloaded generated image");
        Ok(bytes.to_vec())
    }
}
