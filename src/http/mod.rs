//! HTTP surface: router, shared state and handlers.

pub mod currencies;
pub mod error;
pub mod generation;
pub mod media;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use reqwest::Client;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::AppConfig;
use crate::domain::gallery::{is_image_file_name, GeneratedImageStore};
use crate::generation::{GenerationService, HttpImageFetcher, ImageProvider, ReplicateProvider};
use crate::{AdminError, Result};

/// Multipart uploads carry full-size product photos.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub generation: Arc<GenerationService>,
    pub http: Client,
    pub backend_url: String,
    pub images_url_prefix: String,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AdminError::Config(format!("failed to create HTTP client: {e}")))?;

        let provider = config.replicate_api_token.as_ref().map(|token| {
            Arc::new(ReplicateProvider::new(
                http.clone(),
                &config.replicate_api_base,
                &config.replicate_model,
                token,
            )) as Arc<dyn ImageProvider>
        });
        if provider.is_none() {
            tracing::warn!("REPLICATE_API_TOKEN not set; photo generation requests will fail");
        }

        let store = Arc::new(GeneratedImageStore::new(&config.images_dir, &config.images_url_prefix));
        let generation = GenerationService::new(provider, Arc::new(HttpImageFetcher::new(http.clone())), store);

        Ok(Self {
            generation: Arc::new(generation),
            http,
            backend_url: config.backend_url.clone(),
            images_url_prefix: config.images_url_prefix.clone(),
        })
    }
}

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "storefront-admin"})) }))
        .route("/api/ai/generate-product-photo", get(generation::describe).post(generation::generate_product_photo))
        .route("/api/ai/generated-images", get(generation::list_generated_images))
        .route("/api/currencies", get(currencies::list_currencies))
        .route("/api/media/upload", post(media::upload));

    let prefix = state.images_url_prefix.trim_end_matches('/');
    if prefix.starts_with('/') && prefix.len() > 1 {
        let files = ServiceBuilder::new()
            .layer(middleware::from_fn(gallery_files_only))
            .service(ServeDir::new(state.generation.store().root()));
        app = app.nest_service(prefix, files);
    }

    app.layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Keeps the journal, quarantined journals and staged writes out of the static file route.
async fn gallery_files_only(request: Request, next: Next) -> Response {
    let name = request.uri().path().trim_start_matches('/');
    if is_image_file_name(name) {
        next.run(request).await
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}
