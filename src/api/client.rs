//! HTTP client for model listing and caption requests

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use std::path::Path;
use std::thread;

use super::error::ApiError;
use super::types::{ChatRequest, ChatResponse, ModelDescriptor, ModelList};
use super::Captioner;
use crate::config::{ApiConfig, DEFAULT_PROMPT, RETRY_BACKOFF, VISION_KEYWORDS};
use crate::processing::image::load_png;
use crate::ui;

pub struct ApiClient {
	config: ApiConfig,
	http: Client,
}

impl ApiClient {
	pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
		let http = Client::builder().build()?;
		Ok(Self { config, http })
	}

	pub fn config(&self) -> &ApiConfig {
		&self.config
	}

	/// Fetch the model list, logging and swallowing any failure.
	pub fn list_models(&self, vision_only: bool) -> Vec<ModelDescriptor> {
		match self.try_list_models(vision_only) {
			Ok(models) => models,
			Err(e) => {
				ui::warn(&format!("Failed to fetch models from {}: {}", self.config.base_url(), e));
				Vec::new()
			}
		}
	}

	pub fn try_list_models(&self, vision_only: bool) -> Result<Vec<ModelDescriptor>, ApiError> {
		let url = self.config.endpoint("models");
		ui::debug(&format!("GET {}", url));

		let response = self.http.get(&url).timeout(self.config.list_timeout).send()?;
		let body = read_ok_body(response)?;
		let list: ModelList = serde_json::from_str(&body)?;

		Ok(if vision_only { filter_vision(list.data) } else { list.data })
	}

	/// Caption an image file. The model check happens before the file is read.
	pub fn caption_file(&self, path: &Path, prompt: &str, model: Option<&str>) -> Result<String, ApiError> {
		if selected_model(model).is_none() {
			return Err(ApiError::NoModel);
		}
		let png = load_png(path)?;
		self.caption(&png, prompt, model)
	}

	fn send_caption(&self, request: &ChatRequest<'_>) -> Result<String, ApiError> {
		let url = self.config.endpoint("chat/completions");
		ui::debug(&format!("POST {}", url));

		let response = self
			.http
			.post(&url)
			.timeout(self.config.caption_timeout)
			.json(request)
			.send()?;
		let body = read_ok_body(response)?;
		let parsed: ChatResponse = serde_json::from_str(&body)?;

		parsed.into_caption().ok_or(ApiError::EmptyResponse)
	}
}

impl Captioner for ApiClient {
	fn caption(&self, image_png: &[u8], prompt: &str, model: Option<&str>) -> Result<String, ApiError> {
		let model = selected_model(model).ok_or(ApiError::NoModel)?;
		let request = ChatRequest::caption(model, effective_prompt(prompt), png_data_url(image_png), self.config.max_tokens);

		let mut attempt = 0;
		loop {
			match self.send_caption(&request) {
				Err(e) if e.is_retryable() && attempt < self.config.retries => {
					let delay = RETRY_BACKOFF * 2u32.pow(attempt.min(6));
					ui::debug(&format!("Caption attempt {} failed ({}), retrying in {}ms", attempt + 1, e, delay.as_millis()));
					thread::sleep(delay);
					attempt += 1;
				}
				result => return result,
			}
		}
	}
}

/// Keep models whose id mentions one of the vision keywords (case-insensitive).
pub fn filter_vision(models: Vec<ModelDescriptor>) -> Vec<ModelDescriptor> {
	models
		.into_iter()
		.filter(|m| {
			let id = m.id.to_lowercase();
			VISION_KEYWORDS.iter().any(|k| id.contains(k))
		})
		.collect()
}

pub fn png_data_url(image_png: &[u8]) -> String {
	format!("data:image/png;base64,{}", STANDARD.encode(image_png))
}

fn effective_prompt(prompt: &str) -> &str {
	if prompt.trim().is_empty() { DEFAULT_PROMPT } else { prompt }
}

fn selected_model(model: Option<&str>) -> Option<&str> {
	model.map(str::trim).filter(|m| !m.is_empty())
}

fn read_ok_body(response: Response) -> Result<String, ApiError> {
	let status = response.status();
	let body = response.text()?;
	if status != StatusCode::OK {
		return Err(ApiError::Status { status: status.as_u16(), body });
	}
	Ok(body)
}
