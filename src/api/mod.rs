//! # Inference API
//!
//! Blocking client for OpenAI-compatible endpoints: model listing and
//! single-image caption requests.

pub mod client;
pub mod error;
pub mod types;

pub use client::{filter_vision, ApiClient};
pub use error::ApiError;
pub use types::ModelDescriptor;

/// Anything that can turn PNG bytes and a prompt into a caption.
///
/// The batch pipeline only depends on this seam, so it can run against the
/// HTTP client or an in-process stand-in.
pub trait Captioner: Sync {
	fn caption(&self, image_png: &[u8], prompt: &str, model: Option<&str>) -> Result<String, ApiError>;
}
