//! Product photo generation and gallery endpoints.

use axum::{extract::{Multipart, State}, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use super::error::ApiError;
use super::AppState;
use crate::domain::gallery::GeneratedImageRecord;
use crate::generation::{GenerationOutcome, GenerationRequest, SourceImage};
use crate::AdminError;

const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    pub success: bool,
    pub persisted: bool,
    /// Local URL when persisted, provider URL otherwise.
    pub image_url: String,
    pub original_url: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<GenerationOutcome> for GenerationResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        match outcome {
            GenerationOutcome::Stored(record) => Self {
                success: true,
                persisted: true,
                image_url: record.local_url,
                original_url: record.original_url,
                prompt: record.prompt,
                file_name: Some(record.file_name),
                save_error: None,
                timestamp: record.timestamp,
            },
            GenerationOutcome::Degraded { remote_url, prompt, reason, timestamp } => Self {
                success: true,
                persisted: false,
                image_url: remote_url.clone(),
                original_url: remote_url,
                prompt,
                file_name: None,
                save_error: Some(format!("Image could not be saved locally: {reason}")),
                timestamp,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GalleryResponse {
    pub success: bool,
    pub images: Vec<GeneratedImageRecord>,
}

pub async fn describe() -> Json<serde_json::Value> {
    Json(json!({ "message": "POST multipart `image` and `prompt` to generate a product photo" }))
}

pub async fn generate_product_photo(
    State(s): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GenerationResponse>, ApiError> {
    let mut prompt = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AdminError::InvalidInput(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("prompt") => {
                let text = field.text().await.map_err(|e| AdminError::InvalidInput(e.to_string()))?;
                prompt = Some(text.trim().to_string());
            }
            Some("image") => {
                let content_type = field.content_type().unwrap_or(DEFAULT_IMAGE_TYPE).to_string();
                let bytes = field.bytes().await.map_err(|e| AdminError::InvalidInput(e.to_string()))?;
                image = Some(SourceImage::new(bytes.to_vec(), content_type));
            }
            _ => {}
        }
    }

    let (Some(prompt), Some(image)) = (prompt.filter(|p| !p.is_empty()), image.filter(|i| !i.is_empty())) else {
        return Err(AdminError::InvalidInput("image and prompt are required".into()).into());
    };

    let outcome = s.generation.generate(GenerationRequest { prompt, image }).await?;
    Ok(Json(outcome.into()))
}

pub async fn list_generated_images(State(s): State<AppState>) -> Json<GalleryResponse> {
    Json(GalleryResponse { success: true, images: s.generation.list().await })
}
