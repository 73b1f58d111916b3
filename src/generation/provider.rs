//! Image generation providers.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::Rng;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::{AdminError, Result};

/// The photo the generated image is derived from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl SourceImage {
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self { bytes, content_type: content_type.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}

/// Turns a prompt and a source photo into provider output, which somewhere contains a result URL.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(&self, prompt: &str, image: &SourceImage) -> Result<Value>;
}

#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(default)]
    id: String,
    status: String,
    #[serde(default)]
    output: Value,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    urls: Option<PredictionUrls>,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    get: Option<String>,
}

impl Prediction {
    fn is_pending(&self) -> bool {
        matches!(self.status.as_str(), "starting" | "processing")
    }
}

/// Replicate predictions API client.
pub struct ReplicateProvider {
    client: Client,
    api_base: String,
    model: String,
    token: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl ReplicateProvider {
    pub fn new(client: Client, api_base: impl Into<String>, model: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            model: model.into(),
            token: token.into(),
            poll_interval: Duration::from_secs(2),
            max_polls: 90,
        }
    }

    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    fn input(prompt: &str, image: &SourceImage) -> Value {
        let seed: u32 = rand::thread_rng().gen_range(0..1_000_000);
        json!({
            "prompt": prompt,
            "input_image": image.data_uri(),
            "output_format": "jpg",
            "num_inference_steps": 28,
            "guidance_scale": 3.5,
            "seed": seed,
        })
    }

    async fn read_prediction(response: Response) -> Result<Prediction> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, %body, "Replicate rejected the request");
            return Err(AdminError::Provider(format!("HTTP {status}: {body}")));
        }
        response
            .json::<Prediction>()
            .await
            .map_err(|e| AdminError::Provider(format!("failed to parse prediction: {e}")))
    }
}

#[async_trait]
impl ImageProvider for ReplicateProvider {
    async fn generate(&self, prompt: &str, image: &SourceImage) -> Result<Value> {
        let url = format!("{}/models/{}/predictions", self.api_base, self.model);
        let body = json!({ "input": Self::input(prompt, image) });
        info!(model = %self.model, "Requesting image generation");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await
            .map_err(|e| AdminError::Provider(e.to_string()))?;
        let mut prediction = Self::read_prediction(response).await?;

        let mut polls = 0;
        while prediction.is_pending() {
            let Some(poll_url) = prediction.urls.as_ref().and_then(|u| u.get.clone()) else {
                return Err(AdminError::Provider(format!("prediction {} is {} with no poll URL", prediction.id, prediction.status)));
            };
            if polls >= self.max_polls {
                return Err(AdminError::Provider(format!("prediction {} did not finish in time", prediction.id)));
            }
            polls += 1;
            tokio::time::sleep(self.poll_interval).await;
            debug!(id = %prediction.id, polls, "Polling prediction");
            let response = self
                .client
                .get(&poll_url)
                .bearer_auth(&self.token)
                .send()
                .await
                .map_err(|e| AdminError::Provider(e.to_string()))?;
            prediction = Self::read_prediction(response).await?;
        }

        match prediction.status.as_str() {
            "succeeded" => {
                info!(id = %prediction.id, "Image generation succeeded");
                Ok(prediction.output)
            }
            other => {
                let reason = prediction.error.map_or_else(|| other.to_string(), |e| e.to_string());
                Err(AdminError::Provider(format!("prediction {} {other}: {reason}", prediction.id)))
            }
        }
    }
}
