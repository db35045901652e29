//! Batch command - caption a directory

use anyhow::Result;
use std::time::Instant;

use crate::api::ApiClient;
use crate::cli::BatchArgs;
use crate::config::ApiConfig;
use crate::core::{BatchJob, FailurePolicy, RenamePolicy};
use crate::processing::run_batch;
use crate::ui;

pub fn run(config: &ApiConfig, args: BatchArgs) -> Result<()> {
	let client = ApiClient::new(config.clone())?;
	let model = super::resolve_model(&client, args.model.clone());
	let job = job_from_args(args, model);
	execute(&client, &job)
}

pub(crate) fn job_from_args(args: BatchArgs, model: Option<String>) -> BatchJob {
	let rename = if args.rename {
		RenamePolicy::sequence(args.prefix, args.suffix, args.start)
	} else {
		RenamePolicy::disabled()
	};
	let on_failure = if args.keep_failed { FailurePolicy::Persist } else { FailurePolicy::Skip };

	let mut job = BatchJob::new(args.input, args.output)
		.with_prompt(args.prompt)
		.with_rename(rename)
		.with_failure_policy(on_failure)
		.with_jobs(args.jobs);
	job.model = model;
	job
}

pub(crate) fn execute(client: &ApiClient, job: &BatchJob) -> Result<()> {
	ui::header("Batch");
	ui::info(&format!("Input:  {}", job.input_dir.display()));
	ui::info(&format!("Output: {}", job.output_dir.display()));
	if let Some(model) = job.model_id() {
		ui::info(&format!("Model:  {}", model));
	}

	let start = Instant::now();
	let report = run_batch(job, client)?;

	ui::summary(report.processed(), report.failed(), start.elapsed().as_secs_f32());
	println!("{}", report);

	if report.failed() > 0 {
		let failed: Vec<&str> = report
			.outcomes
			.iter()
			.filter(|o| !o.is_success())
			.map(|o| o.original())
			.collect();
		ui::warn(&format!("Completed with {} failures: {}", failed.len(), failed.join(", ")));
	} else {
		ui::success("All images captioned");
	}

	Ok(())
}
