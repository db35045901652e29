//! Models command - list what the API offers

use anyhow::Result;
use colored::Colorize;

use crate::api::ApiClient;
use crate::config::ApiConfig;
use crate::ui;

pub fn run(config: &ApiConfig, all: bool) -> Result<()> {
	let client = ApiClient::new(config.clone())?;
	print_models(&client, all);
	Ok(())
}

pub(crate) fn print_models(client: &ApiClient, all: bool) {
	ui::info(&format!("Querying {}", client.config().base_url()));

	let models = client.list_models(!all);
	if models.is_empty() {
		if all {
			ui::warn("No models found");
		} else {
			ui::warn("No vision models found (use --all to list every model)");
		}
		return;
	}

	let kind = if all { "models" } else { "vision models" };
	ui::success(&format!("Found {} {}", models.len(), kind));
	for model in &models {
		println!("  {} {}", "•".bright_blue(), model.id);
	}
}
