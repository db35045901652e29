//! Caption command - preview a caption for one image

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;

use crate::api::ApiClient;
use crate::config::ApiConfig;
use crate::ui;

pub fn run(config: &ApiConfig, image: &Path, model: Option<String>, prompt: &str) -> Result<()> {
	let client = ApiClient::new(config.clone())?;
	let model = super::resolve_model(&client, model);
	caption_one(&client, image, model.as_deref(), prompt)
}

pub(crate) fn caption_one(client: &ApiClient, image: &Path, model: Option<&str>, prompt: &str) -> Result<()> {
	ui::info(&format!("Captioning {}", ui::path_link(image, 60)));

	let start = Instant::now();
	let caption = client
		.caption_file(image, prompt, model)
		.with_context(|| format!("Failed to caption {}", image.display()))?;

	ui::success(&format!("Done in {:.2}s", start.elapsed().as_secs_f32()));
	println!();
	println!("{}", caption);
	Ok(())
}
