//! Product photo generation: provider call, URL extraction, local persistence.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use validator::Validate;

use super::extract::extract_image_url;
use super::fetcher::ImageFetcher;
use super::provider::{ImageProvider, SourceImage};
use crate::domain::gallery::{GeneratedImageRecord, GeneratedImageStore, NewImage};
use crate::{AdminError, Result};

pub const PROVIDER_TOKEN_VAR: &str = "REPLICATE_API_TOKEN";

#[derive(Debug, Validate)]
pub struct GenerationRequest {
    #[validate(length(min = 1, max = 2000))]
    pub prompt: String,
    pub image: SourceImage,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Downloaded and recorded in the gallery.
    Stored(GeneratedImageRecord),
    /// The provider produced an image but it could not be kept locally; `remote_url` is the only
    /// reference to it.
    Degraded {
        remote_url: String,
        prompt: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

pub struct GenerationService {
    provider: Option<Arc<dyn ImageProvider>>,
    fetcher: Arc<dyn ImageFetcher>,
    store: Arc<GeneratedImageStore>,
}

impl GenerationService {
    /// `provider` is `None` when no provider credential is configured.
    pub fn new(
        provider: Option<Arc<dyn ImageProvider>>,
        fetcher: Arc<dyn ImageFetcher>,
        store: Arc<GeneratedImageStore>,
    ) -> Self {
        Self { provider, fetcher, store }
    }

    pub fn store(&self) -> &GeneratedImageStore {
        &self.store
    }

    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationOutcome> {
        if request.prompt.trim().is_empty() || request.image.is_empty() {
            return Err(AdminError::InvalidInput("image and prompt are required".into()));
        }
        request
            .validate()
            .map_err(|e| AdminError::InvalidInput(format!("invalid generation request: {e}")))?;
        let provider = self.provider.as_ref().ok_or(AdminError::MissingCredential(PROVIDER_TOKEN_VAR))?;

        let output = provider.generate(&request.prompt, &request.image).await?;
        let remote_url = extract_image_url(&output)?;
        info!(%remote_url, "Provider returned image");

        match self.persist(&remote_url, &request.prompt).await {
            Ok(record) => Ok(GenerationOutcome::Stored(record)),
            Err(e) => {
                warn!(error = %e, %remote_url, "Generated image not saved locally, returning provider URL");
                Ok(GenerationOutcome::Degraded {
                    remote_url,
                    prompt: request.prompt,
                    reason: e.to_string(),
                    timestamp: Utc::now(),
                })
            }
        }
    }

    async fn persist(&self, remote_url: &str, prompt: &str) -> Result<GeneratedImageRecord> {
        let bytes = self.fetcher.fetch(remote_url).await?;
        self.store.append(NewImage::jpeg(remote_url, prompt), &bytes).await
    }

    pub async fn list(&self) -> Vec<GeneratedImageRecord> {
        self.store.list().await
    }
}
