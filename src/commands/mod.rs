//! # Command Implementations
//!
//! Each submodule handles one CLI command (models, caption, batch, repl).

pub mod batch;
pub mod caption;
pub mod models;
pub mod repl;

use crate::api::ApiClient;
use crate::ui;

/// Use the given model, or fall back to the first vision model the API reports.
pub(crate) fn resolve_model(client: &ApiClient, explicit: Option<String>) -> Option<String> {
	if let Some(model) = explicit.filter(|m| !m.trim().is_empty()) {
		return Some(model);
	}

	let first = client.list_models(true).into_iter().next().map(|m| m.id);
	match &first {
		Some(id) => ui::info(&format!("No model given, using {}", id)),
		None => ui::warn("No model given and the API reported no vision models"),
	}
	first
}
