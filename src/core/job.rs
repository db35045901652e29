//! Batch job description

use std::path::PathBuf;

use super::naming::RenamePolicy;

/// What to do with a file whose caption request failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
	/// Write nothing for the file and flag it in the report.
	#[default]
	Skip,
	/// Write the failure text into the caption file as if it were a caption.
	Persist,
}

/// One batch run over an input directory.
#[derive(Debug, Clone)]
pub struct BatchJob {
	pub input_dir: PathBuf,
	pub output_dir: PathBuf,
	pub prompt: String,
	pub model: Option<String>,
	pub rename: RenamePolicy,
	pub on_failure: FailurePolicy,
	/// Worker threads; 1 means strictly sequential.
	pub jobs: usize,
}

impl BatchJob {
	pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
		Self {
			input_dir: input_dir.into(),
			output_dir: output_dir.into(),
			prompt: String::new(),
			model: None,
			rename: RenamePolicy::disabled(),
			on_failure: FailurePolicy::Skip,
			jobs: 1,
		}
	}

	pub fn with_model(mut self, model: impl Into<String>) -> Self {
		self.model = Some(model.into());
		self
	}

	pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
		self.prompt = prompt.into();
		self
	}

	pub fn with_rename(mut self, rename: RenamePolicy) -> Self {
		self.rename = rename;
		self
	}

	pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
		self.on_failure = policy;
		self
	}

	pub fn with_jobs(mut self, jobs: usize) -> Self {
		self.jobs = jobs.max(1);
		self
	}

	/// The selected model, treating an empty id as unset.
	pub fn model_id(&self) -> Option<&str> {
		self.model.as_deref().map(str::trim).filter(|m| !m.is_empty())
	}
}
