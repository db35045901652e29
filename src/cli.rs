use clap::builder::styling::{AnsiColor, Style, Styles};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

fn styles() -> Styles {
	Styles::styled()
		.header(Style::new().bold().fg_color(Some(AnsiColor::Blue.into())))
		.usage(Style::new().bold().fg_color(Some(AnsiColor::Blue.into())))
		.literal(Style::new().fg_color(Some(AnsiColor::Blue.into())))
		.placeholder(Style::new().fg_color(Some(AnsiColor::Yellow.into())))
		.valid(Style::new().fg_color(Some(AnsiColor::Blue.into())))
		.invalid(Style::new().fg_color(Some(AnsiColor::Red.into())))
}

fn parse_jobs(s: &str) -> Result<usize, String> {
	let val: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
	if val == 0 {
		Err("jobs must be at least 1".to_string())
	} else {
		Ok(val)
	}
}

#[derive(Parser, Debug)]
#[command(
	name = "captioner",
	author,
	version,
	about = "Batch image captioning through OpenAI-compatible vision APIs",
	styles = styles(),
	after_help = format!(
		"{title}
  {bin} {models}                          {models_desc}
  {bin} {caption} {caption_args}   {caption_desc}
  {bin} {batch}   {batch_args}       {batch_desc}
  {bin} {batch}   {rename_args}  {rename_desc}
  {bin} {repl}                            {repl_desc}",
		title = "Examples:".bright_blue().bold(),
		bin = "captioner".bright_blue(),
		models = "models".yellow(),
		models_desc = "List vision models".dimmed(),
		caption = "caption".yellow(),
		caption_args = "cat.png -m llava",
		caption_desc = "Caption one image".dimmed(),
		batch = "batch".yellow(),
		batch_args = "-i ./raw -o ./out",
		batch_desc = "Caption a directory".dimmed(),
		rename_args = "-i ./raw -o ./out --rename --prefix img_",
		rename_desc = "... and renumber".dimmed(),
		repl = "repl".yellow(),
		repl_desc = "Interactive session".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	/// API base URL; "/v1" is appended when missing (env: CAPTIONER_API_URL)
	#[arg(short = 'u', long = "api-url", global = true, value_name = "URL")]
	pub api_url: Option<String>,

	/// Extra attempts for caption requests that fail with a network or 5xx error
	#[arg(long = "retries", global = true, default_value_t = 0)]
	pub retries: u32,

	/// Upper bound on generated tokens per caption
	#[arg(long = "max-tokens", global = true, default_value_t = crate::config::MAX_TOKENS)]
	pub max_tokens: u32,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// List models offered by the API
	Models {
		/// Show all models, not only vision-capable ones
		#[arg(short = 'a', long = "all")]
		all: bool,
	},

	/// Caption a single image and print the result
	Caption {
		/// Image to caption
		#[arg(value_name = "IMAGE")]
		image: PathBuf,

		/// Model id (default: first vision model reported by the API)
		#[arg(short = 'm', long = "model")]
		model: Option<String>,

		/// Instruction sent with the image
		#[arg(short = 'p', long = "prompt", default_value = "")]
		prompt: String,
	},

	/// Caption every image in a directory
	Batch(BatchArgs),

	/// Interactive session
	Repl,
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
	/// Directory containing the images (not searched recursively)
	#[arg(short = 'i', long = "input", value_name = "DIR")]
	pub input: PathBuf,

	/// Directory receiving image copies and .txt captions (created if missing)
	#[arg(short = 'o', long = "output", value_name = "DIR")]
	pub output: PathBuf,

	/// Model id (default: first vision model reported by the API)
	#[arg(short = 'm', long = "model")]
	pub model: Option<String>,

	/// Instruction sent with every image
	#[arg(short = 'p', long = "prompt", default_value = "")]
	pub prompt: String,

	/// Rename outputs to {prefix}{number}{suffix}
	#[arg(short = 'r', long = "rename")]
	pub rename: bool,

	/// Prefix for renamed files
	#[arg(long = "prefix", default_value = "", requires = "rename")]
	pub prefix: String,

	/// Suffix for renamed files (placed before the extension)
	#[arg(long = "suffix", default_value = "", requires = "rename")]
	pub suffix: String,

	/// First sequence number, zero-padded to 4 digits
	#[arg(long = "start", default_value_t = 1, requires = "rename")]
	pub start: u32,

	/// Write failed caption text into the .txt file instead of skipping the image
	#[arg(long = "keep-failed")]
	pub keep_failed: bool,

	/// Images captioned in parallel
	#[arg(short = 'j', long = "jobs", default_value_t = 1, value_parser = parse_jobs)]
	pub jobs: usize,
}
