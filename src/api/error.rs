//! Errors raised while talking to the inference service

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
	#[error("no model selected")]
	NoModel,

	#[error("failed to load image: {0}")]
	Image(#[from] image::ImageError),

	#[error("request failed: {status} - {body}")]
	Status { status: u16, body: String },

	#[error("request error: {0}")]
	Transport(#[from] reqwest::Error),

	#[error("malformed response: {0}")]
	Decode(#[from] serde_json::Error),

	#[error("response contained no caption")]
	EmptyResponse,
}

impl ApiError {
	/// Transport failures and server-side errors may succeed on a later attempt.
	pub fn is_retryable(&self) -> bool {
		match self {
			ApiError::Transport(_) => true,
			ApiError::Status { status, .. } => *status >= 500,
			_ => false,
		}
	}
}
