//! Storefront Admin
//!
//! Backend for the store's admin dashboard. Product, order and customer data live in an external
//! WooCommerce API; this crate owns the pieces of the dashboard with logic of their own.
//!
//! ## Features
//! - Multi-currency display formatting and currency detection for WooCommerce records
//! - Country display helpers
//! - AI product photo generation with a bounded local gallery
//! - Media upload passthrough to the WooCommerce backend

pub mod config;
pub mod domain;
pub mod generation;
pub mod http;

use thiserror::Error;

pub use config::AppConfig;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0} is not configured")]
    MissingCredential(&'static str),

    #[error("Image provider error: {0}")]
    Provider(String),

    #[error("No usable image URL in provider response: {0}")]
    NoImageUrl(String),

    #[error("Image download failed: {0}")]
    Download(String),

    #[error("Backend request failed: {0}")]
    Backend(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Journal serialization error: {0}")]
    Journal(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AdminError>;
