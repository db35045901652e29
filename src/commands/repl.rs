//! REPL mode - interactive captioning session

use anyhow::{bail, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::api::ApiClient;
use crate::config::ApiConfig;
use crate::core::{BatchJob, FailurePolicy, RenamePolicy};
use crate::ui;

/// Settings carried between commands.
pub struct Session {
	client: ApiClient,
	model: Option<String>,
	prompt: String,
	rename: RenamePolicy,
	on_failure: FailurePolicy,
}

impl Session {
	pub fn new(config: ApiConfig) -> Result<Self> {
		Ok(Self {
			client: ApiClient::new(config)?,
			model: None,
			prompt: String::new(),
			rename: RenamePolicy::disabled(),
			on_failure: FailurePolicy::Skip,
		})
	}
}

type Handler = fn(&mut Session, &[String]) -> Result<()>;

struct Action {
	name: &'static str,
	usage: &'static str,
	help: &'static str,
	handler: Handler,
}

const ACTIONS: &[Action] = &[
	Action { name: "url", usage: "<base-url>", help: "Point the session at another API", handler: set_url },
	Action { name: "models", usage: "[all]", help: "List vision models (or every model)", handler: list_models },
	Action { name: "use", usage: "<model>", help: "Select the captioning model", handler: use_model },
	Action { name: "prompt", usage: "[text]", help: "Set the instruction; empty resets to default", handler: set_prompt },
	Action { name: "rename", usage: "<prefix> [start] [suffix] | off", help: "Configure batch renaming", handler: set_rename },
	Action { name: "keep-failed", usage: "on|off", help: "Persist failed captions in batch runs", handler: set_keep_failed },
	Action { name: "caption", usage: "<image>", help: "Caption one image", handler: caption },
	Action { name: "batch", usage: "<input-dir> <output-dir>", help: "Caption a directory", handler: batch },
	Action { name: "status", usage: "", help: "Show session settings", handler: status },
];

#[derive(Debug, PartialEq, Eq)]
enum Flow {
	Continue,
	Exit,
}

pub fn run(config: ApiConfig) -> Result<()> {
	let mut session = Session::new(config)?;

	ui::info("Starting interactive session");
	ui::info("Type 'help' for commands, or 'exit' to quit");
	println!();

	let stdin = io::stdin();
	let mut lines = stdin.lock().lines();

	loop {
		print!("{} ", "captioner>".bright_blue().bold());
		io::stdout().flush()?;

		let Some(line) = lines.next() else { break };
		if dispatch(&mut session, &line?) == Flow::Exit {
			break;
		}
	}

	ui::info("Goodbye!");
	Ok(())
}

fn dispatch(session: &mut Session, line: &str) -> Flow {
	let words = split_args(line);
	let Some((name, args)) = words.split_first() else {
		return Flow::Continue;
	};

	match name.as_str() {
		"exit" | "quit" | "q" => return Flow::Exit,
		"help" | "?" => show_help(),
		_ => match ACTIONS.iter().find(|a| a.name == name.as_str()) {
			Some(action) => {
				if let Err(e) = (action.handler)(session, args) {
					ui::error(&format!("{:#}", e));
				}
			}
			None => ui::warn(&format!("Unknown command '{}', type 'help'", name)),
		},
	}

	Flow::Continue
}

/// Split a command line on whitespace, keeping double-quoted runs together.
fn split_args(line: &str) -> Vec<String> {
	let mut args = Vec::new();
	let mut current = String::new();
	let mut quoted = false;
	let mut pending = false;

	for c in line.chars() {
		match c {
			'"' => {
				quoted = !quoted;
				pending = true;
			}
			c if c.is_whitespace() && !quoted => {
				if pending {
					args.push(std::mem::take(&mut current));
					pending = false;
				}
			}
			c => {
				current.push(c);
				pending = true;
			}
		}
	}
	if pending {
		args.push(current);
	}

	args
}

fn set_url(session: &mut Session, args: &[String]) -> Result<()> {
	let [url] = args else { bail!("usage: url <base-url>") };

	let config = session.client.config().clone().with_base_url(url);
	session.client = ApiClient::new(config)?;
	ui::success(&format!("API base URL set to {}", session.client.config().base_url()));
	Ok(())
}

fn list_models(session: &mut Session, args: &[String]) -> Result<()> {
	let all = args.first().is_some_and(|a| a == "all");
	super::models::print_models(&session.client, all);
	Ok(())
}

fn use_model(session: &mut Session, args: &[String]) -> Result<()> {
	let [model] = args else { bail!("usage: use <model>") };

	session.model = Some(model.clone());
	ui::success(&format!("Using model {}", model));
	Ok(())
}

fn set_prompt(session: &mut Session, args: &[String]) -> Result<()> {
	session.prompt = args.join(" ");
	if session.prompt.is_empty() {
		ui::success("Prompt reset to default");
	} else {
		ui::success(&format!("Prompt set to \"{}\"", session.prompt));
	}
	Ok(())
}

fn set_rename(session: &mut Session, args: &[String]) -> Result<()> {
	session.rename = match args {
		[off] if off == "off" => RenamePolicy::disabled(),
		[prefix] => RenamePolicy::sequence(prefix.as_str(), "", 1),
		[prefix, start] => RenamePolicy::sequence(prefix.as_str(), "", parse_start(start)?),
		[prefix, start, suffix] => RenamePolicy::sequence(prefix.as_str(), suffix.as_str(), parse_start(start)?),
		_ => bail!("usage: rename <prefix> [start] [suffix] | off"),
	};

	if session.rename.enabled {
		let example = crate::core::OutputNames::derive(Path::new("x.png"), 0, &session.rename);
		ui::success(&format!("Renaming enabled, first image will be {}", example.image.to_string_lossy()));
	} else {
		ui::success("Renaming disabled");
	}
	Ok(())
}

fn parse_start(s: &str) -> Result<u32> {
	s.parse().map_err(|_| anyhow::anyhow!("'{}' is not a valid start number", s))
}

fn set_keep_failed(session: &mut Session, args: &[String]) -> Result<()> {
	session.on_failure = match args.first().map(String::as_str) {
		Some("on") => FailurePolicy::Persist,
		Some("off") => FailurePolicy::Skip,
		_ => bail!("usage: keep-failed on|off"),
	};
	ui::success(&format!("Failed captions: {:?}", session.on_failure));
	Ok(())
}

fn caption(session: &mut Session, args: &[String]) -> Result<()> {
	let [image] = args else { bail!("usage: caption <image>") };
	super::caption::caption_one(&session.client, Path::new(image), session.model.as_deref(), &session.prompt)
}

fn batch(session: &mut Session, args: &[String]) -> Result<()> {
	let [input, output] = args else { bail!("usage: batch <input-dir> <output-dir>") };

	let mut job = BatchJob::new(PathBuf::from(input), PathBuf::from(output))
		.with_prompt(session.prompt.clone())
		.with_rename(session.rename.clone())
		.with_failure_policy(session.on_failure);
	job.model = session.model.clone();

	super::batch::execute(&session.client, &job)
}

fn status(session: &mut Session, _args: &[String]) -> Result<()> {
	let unset = "(none)".dimmed().to_string();
	println!("  {} {}", "API:".bright_blue(), session.client.config().base_url());
	println!("  {} {}", "Model:".bright_blue(), session.model.clone().unwrap_or_else(|| unset.clone()));
	println!(
		"  {} {}",
		"Prompt:".bright_blue(),
		if session.prompt.is_empty() { unset.clone() } else { session.prompt.clone() }
	);
	let rename = if session.rename.enabled {
		format!("{}<{:04}>{}", session.rename.prefix, session.rename.start_number, session.rename.suffix)
	} else {
		unset
	};
	println!("  {} {}", "Rename:".bright_blue(), rename);
	println!("  {} {:?}", "Failed captions:".bright_blue(), session.on_failure);
	Ok(())
}

fn show_help() {
	println!("{}", "Commands:".bright_blue().bold());
	for action in ACTIONS {
		println!("  {:<12} {:<34} {}", action.name, action.usage.dimmed(), action.help);
	}
	println!("  {:<12} {:<34} {}", "help", "", "Show this help message");
	println!("  {:<12} {:<34} {}", "exit", "", "Leave the session");
}

#[cfg(test)]
mod tests {
	use super::*;

	fn session() -> Session {
		Session::new(ApiConfig::new("http://127.0.0.1:9")).unwrap()
	}

	fn words(items: &[&str]) -> Vec<String> {
		items.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn splits_quoted_arguments() {
		assert_eq!(split_args("  batch ./in   \"my out\" "), words(&["batch", "./in", "my out"]));
		assert_eq!(split_args("prompt \"\""), words(&["prompt", ""]));
		assert!(split_args("   ").is_empty());
	}

	#[test]
	fn exit_words_end_the_session() {
		let mut s = session();
		assert_eq!(dispatch(&mut s, "quit"), Flow::Exit);
		assert_eq!(dispatch(&mut s, ""), Flow::Continue);
		assert_eq!(dispatch(&mut s, "bogus"), Flow::Continue);
	}

	#[test]
	fn url_rebuilds_client() {
		let mut s = session();
		dispatch(&mut s, "url http://other:4321/");
		assert_eq!(s.client.config().base_url(), "http://other:4321/v1");
	}

	#[test]
	fn settings_are_remembered() {
		let mut s = session();
		dispatch(&mut s, "use llava-13b");
		dispatch(&mut s, "prompt list the objects");
		dispatch(&mut s, "rename img_ 5");
		dispatch(&mut s, "keep-failed on");

		assert_eq!(s.model.as_deref(), Some("llava-13b"));
		assert_eq!(s.prompt, "list the objects");
		assert_eq!(s.rename, RenamePolicy::sequence("img_", "", 5));
		assert_eq!(s.on_failure, FailurePolicy::Persist);

		dispatch(&mut s, "rename off");
		assert!(!s.rename.enabled);
	}

	#[test]
	fn bad_arguments_leave_state_unchanged() {
		let mut s = session();
		dispatch(&mut s, "rename img_ five");
		assert!(!s.rename.enabled);
		dispatch(&mut s, "use");
		assert!(s.model.is_none());
	}

	#[test]
	fn batch_without_model_reports_error() {
		let input = tempfile::tempdir().unwrap();
		let output = tempfile::tempdir().unwrap();
		image::RgbImage::new(2, 2).save(input.path().join("a.png")).unwrap();

		let mut s = session();
		let args = vec![input.path().display().to_string(), output.path().display().to_string()];
		let err = batch(&mut s, &args).unwrap_err();
		assert!(err.to_string().contains("select a model"));
	}
}
