//! AI product photo generation
pub mod extract;
pub mod fetcher;
pub mod provider;
pub mod service;

pub use extract::extract_image_url;
pub use fetcher::{HttpImageFetcher, ImageFetcher};
pub use provider::{ImageProvider, ReplicateProvider, SourceImage};
pub use service::{GenerationOutcome, GenerationRequest, GenerationService};
