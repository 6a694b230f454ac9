// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Beacon scheduler binary.

mod args;
mod logging;
mod signals;

use std::fs;
use std::sync::Arc;

use anyhow::Context;
use beacon_config::SchedulerConfig;
use beacon_jobs::{JobLog, ProcessExecutor, Scheduler};
use beacon_status::{CachetClient, StatusReporter};
use clap::Parser;
use tracing::{debug, error, info, warn};

use args::Args;
use signals::ShutdownSignal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	let mut config = beacon_config::load_config_with_file(&args.config)
		.with_context(|| format!("loading configuration from {}", args.config.display()))?;
	if let Some(dir) = &args.log_dir {
		config.logging.dir = dir.clone();
	}
	if let Some(job) = &args.job {
		config.only_job(job)?;
	}

	logging::init(
		args.debug_enabled(),
		&config.logging.level,
		&args.log_file(&config.logging),
	)?;

	info!(
		config = %args.config.display(),
		jobs = config.jobs.len(),
		version = env!("CARGO_PKG_VERSION"),
		"starting beacon-scheduler"
	);
	if args.debug_enabled() {
		debug!("Loaded configuration:\n{config}");
	}

	let client = CachetClient::builder()
		.base_url(&config.status.url)
		.api_token(&config.status.api_token)
		.request_timeout(config.status.request_timeout)
		.build()
		.context("creating status page client")?;
	client
		.ping()
		.await
		.with_context(|| format!("status page at {} is not reachable", client.base_url()))?;
	info!(url = %client.base_url(), "Status page is reachable");

	let mut scheduler = build_scheduler(&config, Arc::new(client))?;
	let mut signals = ShutdownSignal::install().context("installing signal handlers")?;
	scheduler.start()?;

	if scheduler.pending() == 0 {
		warn!("No enabled jobs, waiting for shutdown signal");
	}

	let received = signals.recv().await;
	match &received {
		Ok(()) => info!("Received shutdown signal"),
		Err(e) => error!(error = %e, "Signal handling failed, shutting down"),
	}

	let summary = scheduler.shutdown().await;
	for report in &summary.reports {
		debug!(
			job = %report.job,
			state = %report.state,
			passes = report.passes,
			consecutive_failures = report.consecutive_failures,
			"job summary"
		);
	}
	received.context("waiting for shutdown signal")?;
	if summary.panicked > 0 {
		anyhow::bail!("{} job cycle(s) ended abnormally", summary.panicked);
	}

	info!("beacon-scheduler stopped");
	Ok(())
}

fn build_scheduler(
	config: &SchedulerConfig,
	reporter: Arc<dyn StatusReporter>,
) -> anyhow::Result<Scheduler> {
	let jobs_dir = config.logging.jobs_dir();
	fs::create_dir_all(&jobs_dir)
		.with_context(|| format!("creating job log directory {}", jobs_dir.display()))?;

	let mut scheduler = Scheduler::new(Arc::new(ProcessExecutor::new()), reporter);
	for job in &config.jobs {
		let log = JobLog::open(&jobs_dir, job.name())
			.with_context(|| format!("opening log file for job '{}'", job.name()))?;
		scheduler.register(job.clone(), log)?;
	}
	Ok(scheduler)
}
