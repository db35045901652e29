//! Batch captioning over a directory

use anyhow::Context;
use rayon::prelude::*;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

use super::image::load_png;
use super::scan::scan_images;
use crate::api::Captioner;
use crate::core::{BatchJob, FailurePolicy, OutputNames, RenamePolicy};
use crate::ui;

/// Problems that stop a batch before any file is touched.
#[derive(Debug, Error)]
pub enum BatchError {
	#[error("input directory missing: {}", .0.display())]
	InputMissing(PathBuf),

	#[error("output directory not provided")]
	OutputMissing,

	#[error("failed to create output directory {}: {source}", .path.display())]
	CreateOutput { path: PathBuf, source: io::Error },

	#[error("failed to read input directory {}: {source}", .path.display())]
	ReadInput { path: PathBuf, source: io::Error },

	#[error("no image files found in input directory")]
	NoImages,

	#[error("select a model before processing")]
	NoModel,

	#[error("failed to start worker pool: {0}")]
	Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Result of processing one source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
	Processed { original: String, names: OutputNames },
	/// Caption request failed but the failure text was written as the caption.
	PersistedFailure { original: String, names: OutputNames, reason: String },
	/// Caption request failed; nothing was written.
	CaptionFailed { original: String, reason: String },
	/// Loading, copying or writing failed.
	Failed { original: String, reason: String },
}

impl FileOutcome {
	pub fn is_success(&self) -> bool {
		matches!(self, FileOutcome::Processed { .. })
	}

	pub fn original(&self) -> &str {
		match self {
			FileOutcome::Processed { original, .. }
			| FileOutcome::PersistedFailure { original, .. }
			| FileOutcome::CaptionFailed { original, .. }
			| FileOutcome::Failed { original, .. } => original,
		}
	}
}

impl fmt::Display for FileOutcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FileOutcome::Processed { original, names } => write!(
				f,
				"processed: {} -> {}, caption saved as {}",
				original,
				names.image.to_string_lossy(),
				names.caption.to_string_lossy()
			),
			FileOutcome::PersistedFailure { original, names, reason } => write!(
				f,
				"processed with failed caption: {} -> {}, failure saved as {} ({})",
				original,
				names.image.to_string_lossy(),
				names.caption.to_string_lossy(),
				reason
			),
			FileOutcome::CaptionFailed { original, reason } => {
				write!(f, "caption failed for {}: {}", original, reason)
			}
			FileOutcome::Failed { original, reason } => {
				write!(f, "error processing {}: {}", original, reason)
			}
		}
	}
}

/// Ordered per-file outcomes of a batch, in sorted filename order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
	pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
	pub fn processed(&self) -> usize {
		self.outcomes.iter().filter(|o| o.is_success()).count()
	}

	pub fn failed(&self) -> usize {
		self.outcomes.len() - self.processed()
	}
}

impl fmt::Display for BatchReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.outcomes.is_empty() {
			return write!(f, "no images processed");
		}
		for (i, outcome) in self.outcomes.iter().enumerate() {
			if i > 0 {
				writeln!(f)?;
			}
			write!(f, "{}", outcome)?;
		}
		Ok(())
	}
}

/// Caption every supported image in `job.input_dir` and write image/caption
/// pairs to `job.output_dir`.
///
/// Configuration problems are returned as [`BatchError`] before any file is
/// copied. Per-file problems end up in the report and never abort the batch.
pub fn run_batch<C>(job: &BatchJob, captioner: &C) -> Result<BatchReport, BatchError>
where
	C: Captioner + ?Sized,
{
	let files = validate(job)?;
	let planned = plan_outputs(&files, &job.rename);
	let total = files.len();
	ui::debug(&format!("Captioning {} images with {} worker(s)", total, job.jobs));

	let process = |(index, (path, names)): (usize, (&PathBuf, &Planned))| {
		let start = Instant::now();
		let outcome = process_file(job, captioner, path, names);
		log_outcome(index, total, path, &outcome, start.elapsed().as_millis());
		outcome
	};

	let outcomes: Vec<FileOutcome> = if job.jobs <= 1 {
		files.iter().zip(&planned).enumerate().map(process).collect()
	} else {
		let pool = rayon::ThreadPoolBuilder::new().num_threads(job.jobs).build()?;
		pool.install(|| files.par_iter().zip(planned.par_iter()).enumerate().map(process).collect())
	};

	Ok(BatchReport { outcomes })
}

fn validate(job: &BatchJob) -> Result<Vec<PathBuf>, BatchError> {
	let input = &job.input_dir;
	if input.as_os_str().is_empty() || !input.is_dir() {
		return Err(BatchError::InputMissing(input.clone()));
	}

	let output = &job.output_dir;
	if output.as_os_str().is_empty() {
		return Err(BatchError::OutputMissing);
	}
	if !output.exists() {
		fs::create_dir_all(output).map_err(|source| BatchError::CreateOutput {
			path: output.clone(),
			source,
		})?;
		ui::debug(&format!("Created output directory: {}", output.display()));
	}

	let files = scan_images(input).map_err(|source| BatchError::ReadInput {
		path: input.clone(),
		source,
	})?;
	if files.is_empty() {
		return Err(BatchError::NoImages);
	}

	if job.model_id().is_none() {
		return Err(BatchError::NoModel);
	}

	Ok(files)
}

/// Output names for one file, or why the file cannot be written.
type Planned = Result<OutputNames, String>;

/// Derive output names for every file up front. A file whose image or caption
/// name is already taken by an earlier file is refused, so no output is ever
/// written twice and the result does not depend on worker timing.
fn plan_outputs(files: &[PathBuf], rename: &RenamePolicy) -> Vec<Planned> {
	let mut claimed: HashMap<OsString, &Path> = HashMap::new();

	files
		.iter()
		.enumerate()
		.map(|(index, path)| {
			let names = OutputNames::derive(path, index, rename);
			let clash = [("image", &names.image), ("caption", &names.caption)]
				.into_iter()
				.find_map(|(kind, name)| claimed.get(name).map(|owner| (kind, name, *owner)));

			if let Some((kind, name, owner)) = clash {
				return Err(format!(
					"{} name {} already used by {}",
					kind,
					name.to_string_lossy(),
					file_label(owner)
				));
			}

			claimed.insert(names.image.clone(), path);
			claimed.insert(names.caption.clone(), path);
			Ok(names)
		})
		.collect()
}

fn file_label(path: &Path) -> String {
	path.file_name()
		.map(|n| n.to_string_lossy().into_owned())
		.unwrap_or_else(|| path.display().to_string())
}

fn process_file<C>(job: &BatchJob, captioner: &C, path: &Path, planned: &Planned) -> FileOutcome
where
	C: Captioner + ?Sized,
{
	let original = file_label(path);

	let names = match planned {
		Ok(names) => names.clone(),
		Err(reason) => return FileOutcome::Failed { original, reason: reason.clone() },
	};

	let png = match load_png(path) {
		Ok(png) => png,
		Err(e) => return FileOutcome::Failed { original, reason: e.to_string() },
	};

	let (text, failure) = match captioner.caption(&png, &job.prompt, job.model_id()) {
		Ok(text) => (text, None),
		Err(e) => match job.on_failure {
			FailurePolicy::Skip => {
				return FileOutcome::CaptionFailed { original, reason: e.to_string() };
			}
			FailurePolicy::Persist => (format!("caption failed: {}", e), Some(e.to_string())),
		},
	};

	if let Err(e) = write_pair(path, &job.output_dir, &names, &text) {
		return FileOutcome::Failed { original, reason: format!("{:#}", e) };
	}

	match failure {
		None => FileOutcome::Processed { original, names },
		Some(reason) => FileOutcome::PersistedFailure { original, names, reason },
	}
}

fn write_pair(source: &Path, output_dir: &Path, names: &OutputNames, caption: &str) -> anyhow::Result<()> {
	let image_path = output_dir.join(&names.image);
	copy_preserving_mtime(source, &image_path)
		.with_context(|| format!("failed to copy image to {}", image_path.display()))?;

	let caption_path = output_dir.join(&names.caption);
	fs::write(&caption_path, caption.as_bytes())
		.with_context(|| format!("failed to write caption to {}", caption_path.display()))?;

	Ok(())
}

/// Copy file contents and permissions, then carry over the modification time.
fn copy_preserving_mtime(source: &Path, dest: &Path) -> io::Result<()> {
	if let (Ok(a), Ok(b)) = (source.canonicalize(), dest.canonicalize()) {
		if a == b {
			return Ok(());
		}
	}

	fs::copy(source, dest)?;

	let modified = fs::metadata(source)?.modified()?;
	match fs::OpenOptions::new().write(true).open(dest) {
		Ok(file) => file.set_modified(modified)?,
		// Read-only copies keep the fresh timestamp.
		Err(e) => ui::debug(&format!("Could not set mtime on {}: {}", dest.display(), e)),
	}
	Ok(())
}

fn log_outcome(index: usize, total: usize, path: &Path, outcome: &FileOutcome, elapsed_ms: u128) {
	let queue = format!("[{}/{}]", index + 1, total);
	let link = ui::path_link(path, 60);

	match outcome {
		FileOutcome::Processed { names, .. } => {
			ui::success(&format!(
				"{} {} -> {} ({}ms)",
				queue,
				link,
				names.caption.to_string_lossy(),
				elapsed_ms
			));
		}
		FileOutcome::PersistedFailure { reason, .. } => {
			ui::warn(&format!("{} {}: caption failed, kept anyway: {}", queue, link, reason));
		}
		FileOutcome::CaptionFailed { reason, .. } => {
			ui::error(&format!("{} {}: {}", queue, link, reason));
		}
		FileOutcome::Failed { reason, .. } => {
			ui::error(&format!("{} {}: {}", queue, link, reason));
		}
	}
}
