//! Captioner - batch image captioning
//!
//! A command-line tool that asks an OpenAI-compatible vision model to
//! describe images, one at a time or a whole directory at once.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use captioner::cli::{Cli, Command};
use captioner::commands;
use captioner::config::ApiConfig;
use captioner::ui::{self, Log};

fn main() {
	let cli = Cli::parse();
	Log::set_verbose(cli.verbose);

	if let Err(e) = run(cli) {
		ui::error(&format!("{:#}", e));
		std::process::exit(1);
	}
}

fn run(cli: Cli) -> Result<()> {
	let config = ApiConfig::resolve(cli.api_url.as_deref())
		.with_retries(cli.retries)
		.with_max_tokens(cli.max_tokens);
	ui::debug(&format!("API base URL: {}", config.base_url()));

	print_header();

	match cli.command {
		Command::Models { all } => commands::models::run(&config, all),
		Command::Caption { image, model, prompt } => commands::caption::run(&config, &image, model, &prompt),
		Command::Batch(args) => commands::batch::run(&config, args),
		Command::Repl => commands::repl::run(config),
	}
}

fn print_header() {
	println!();
	println!(
		"{}",
		format!("─── Captioner v{} ───", env!("CARGO_PKG_VERSION"))
			.bright_blue()
			.bold()
	);
}
