//! Media upload passthrough to the WooCommerce backend.

use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::error::ApiError;
use super::AppState;
use crate::AdminError;

/// Backend base path used when the dashboard is served behind the same host as the backend.
const SAME_HOST_BACKEND: &str = "/panel/api";

/// Where uploads go for a given backend URL setting.
pub fn resolve_upload_url(backend_url: &str, headers: &HeaderMap) -> String {
    let backend_url = backend_url.trim_end_matches('/');
    if backend_url.starts_with("http") {
        format!("{backend_url}/api/media/upload")
    } else if backend_url == SAME_HOST_BACKEND {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        let host = header("host").unwrap_or("localhost");
        let protocol = header("x-forwarded-proto").unwrap_or("http");
        format!("{protocol}://{host}{backend_url}/media/upload")
    } else {
        format!("{backend_url}/media/upload")
    }
}

async fn rebuild_form(mut multipart: Multipart) -> Result<Form, AdminError> {
    let mut form = Form::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AdminError::InvalidInput(format!("malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else { continue };
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| AdminError::InvalidInput(e.to_string()))?;

        let mut part = Part::bytes(bytes.to_vec());
        if let Some(file_name) = file_name {
            part = part.file_name(file_name);
        }
        if let Some(content_type) = content_type {
            part = part
                .mime_str(&content_type)
                .map_err(|e| AdminError::InvalidInput(format!("bad content type {content_type}: {e}")))?;
        }
        form = form.part(name, part);
    }
    Ok(form)
}

pub async fn upload(
    State(s): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let form = rebuild_form(multipart).await?;
    let url = resolve_upload_url(&s.backend_url, &headers);
    debug!(%url, "Forwarding media upload");

    let response = s
        .http
        .post(&url)
        .multipart(form)
        .send()
        .await
        .map_err(|e| AdminError::Backend(e.to_string()))?;
    let status = response.status();
    let body = response.text().await.map_err(|e| AdminError::Backend(e.to_string()))?;

    if !status.is_success() {
        warn!(%status, %url, "Backend rejected media upload");
        let error = if body.is_empty() { "Image upload failed".to_string() } else { body };
        return Ok((status, Json(json!({ "error": error }))));
    }

    let data: Value = serde_json::from_str(&body)
        .map_err(|e| AdminError::Backend(format!("backend returned invalid JSON: {e}")))?;
    Ok((status, Json(data)))
}
