//! Unified logging system

use chrono::Local;
use colored::*;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub struct Log;

impl Log {
	pub fn set_verbose(enabled: bool) {
		VERBOSE.store(enabled, Ordering::Relaxed);
	}

	pub fn is_verbose() -> bool {
		VERBOSE.load(Ordering::Relaxed)
	}
}

fn timestamp() -> ColoredString {
	Local::now().format("%H:%M:%S").to_string().dimmed()
}

pub fn info(msg: &str) {
	println!("[{}] {} {}", timestamp(), "ℹ".bright_blue().bold(), msg.bright_white());
}

pub fn success(msg: &str) {
	println!("[{}] {} {}", timestamp(), "✓".bright_green().bold(), msg.bright_white());
}

pub fn warn(msg: &str) {
	eprintln!("[{}] {} {}", timestamp(), "⚠".bright_yellow().bold(), msg.bright_white());
}

pub fn error(msg: &str) {
	eprintln!("[{}] {} {}", timestamp(), "✗".bright_red().bold(), msg.bright_white());
}

pub fn debug(msg: &str) {
	if Log::is_verbose() {
		println!("[{}] {} {}", timestamp(), "⚙".bright_black().bold(), msg.dimmed());
	}
}

pub fn header(text: &str) {
	println!();
	println!("{}", format!("─── {} ───", text).bright_blue().bold());
}

/// Batch statistics shown after a run.
pub fn summary(processed: usize, failed: usize, duration_secs: f32) {
	header("Summary");

	println!("  {} {}", "Processed:".bright_blue(), processed);
	if failed > 0 {
		println!("  {} {}", "Failed:".red(), failed);
	}

	println!("  {} {:.2}s", "Duration:".bright_blue(), duration_secs);
	if processed > 0 {
		let avg_ms = (duration_secs * 1000.0) / processed as f32;
		println!("  {} {:.0}ms/image", "Average:".bright_blue(), avg_ms);
	}
	println!();
}

/// Clickable file path (OSC 8 terminal hyperlink)
pub fn path_link(path: &Path, max_len: usize) -> String {
	let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

	let uri = if cfg!(windows) {
		let path_str = absolute.to_string_lossy();
		let cleaned = path_str.strip_prefix(r"\\?\").unwrap_or(&path_str);
		format!("file:///{}", cleaned.replace('\\', "/"))
	} else {
		format!("file://{}", absolute.display())
	};

	let filename = path
		.file_name()
		.map(|n| n.to_string_lossy().into_owned())
		.unwrap_or_else(|| path.display().to_string());

	format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", uri, truncate_middle(&filename, max_len))
}

/// Shorten a name to `max_len` characters by eliding its middle.
fn truncate_middle(name: &str, max_len: usize) -> String {
	let chars: Vec<char> = name.chars().collect();
	if chars.len() <= max_len || max_len < 8 {
		return name.to_string();
	}

	let head = max_len / 2;
	let tail = max_len - head - 3;
	let start: String = chars[..head].iter().collect();
	let end: String = chars[chars.len() - tail..].iter().collect();
	format!("{}...{}", start, end)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn short_names_are_untouched() {
		assert_eq!(truncate_middle("cat.png", 60), "cat.png");
	}

	#[test]
	fn long_names_are_elided() {
		let name = "a".repeat(30) + "b.png";
		let short = truncate_middle(&name, 20);
		assert_eq!(short.chars().count(), 20);
		assert!(short.starts_with("aaaaaaaaaa..."));
		assert!(short.ends_with("b.png"));
	}

	#[test]
	fn multibyte_names_do_not_panic() {
		let name = "图像".repeat(20) + ".jpg";
		let short = truncate_middle(&name, 12);
		assert!(short.contains("..."));
	}
}
