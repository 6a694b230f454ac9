// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;
use std::sync::Arc;

use beacon_jobs_core::JobDefinition;
use beacon_status::StatusReporter;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use crate::completion::Completion;
use crate::cycle::{CycleReport, CycleState, JobCycle};
use crate::error::{JobError, Result};
use crate::executor::CommandRunner;
use crate::log::JobLog;
use crate::retry::RetryController;
use crate::sync::StatusSynchronizer;

struct RegisteredJob {
	definition: JobDefinition,
	log: JobLog,
}

/// What `shutdown` observed once every cycle had stopped.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSummary {
	pub reports: Vec<CycleReport>,
	/// Cycle tasks that ended by panicking.
	pub panicked: usize,
}

/// Owns every job cycle and coordinates their shutdown.
pub struct Scheduler {
	jobs: BTreeMap<String, RegisteredJob>,
	retry: RetryController,
	sync: StatusSynchronizer,
	shutdown: CancellationToken,
	completion: Option<Completion>,
	handles: Vec<JoinHandle<CycleReport>>,
}

impl Scheduler {
	pub fn new(runner: Arc<dyn CommandRunner>, reporter: Arc<dyn StatusReporter>) -> Self {
		Self {
			jobs: BTreeMap::new(),
			retry: RetryController::new(runner),
			sync: StatusSynchronizer::new(reporter),
			shutdown: CancellationToken::new(),
			completion: None,
			handles: Vec::new(),
		}
	}

	/// Adds a job. Names must be unique.
	pub fn register(&mut self, definition: JobDefinition, log: JobLog) -> Result<()> {
		if self.completion.is_some() {
			return Err(JobError::AlreadyStarted);
		}
		let name = definition.name().to_string();
		if self.jobs.contains_key(&name) {
			return Err(JobError::DuplicateJob(name));
		}
		self.jobs.insert(name, RegisteredJob { definition, log });
		Ok(())
	}

	pub fn job_names(&self) -> Vec<String> {
		self.jobs.keys().cloned().collect()
	}

	/// The token every cycle observes; cancelling it starts shutdown.
	pub fn shutdown_token(&self) -> CancellationToken {
		self.shutdown.clone()
	}

	/// Cycles that have not yet acknowledged `Stopped`.
	pub fn pending(&self) -> usize {
		self.completion
			.as_ref()
			.map_or(self.jobs.len(), Completion::remaining)
	}

	/// Spawns one cycle task per enabled job.
	///
	/// Disabled jobs are counted complete immediately. Nothing is spawned if
	/// shutdown has already been requested.
	#[instrument(skip(self))]
	pub fn start(&mut self) -> Result<()> {
		if self.completion.is_some() {
			return Err(JobError::AlreadyStarted);
		}

		let completion = Completion::new(self.jobs.len());
		self.completion = Some(completion.clone());

		for (name, registered) in &self.jobs {
			if !registered.definition.enabled() {
				info!(job = %name, "Job is disabled, skipping execution");
				completion.done();
				continue;
			}
			if self.shutdown.is_cancelled() {
				info!(job = %name, "Shutdown already requested, not starting job");
				completion.done();
				continue;
			}

			let cycle = JobCycle::new(
				registered.definition.clone(),
				self.retry.clone(),
				self.sync.clone(),
				registered.log.clone(),
			);
			let cancel = self.shutdown.clone();
			let guard = completion.guard();

			let handle = tokio::spawn(async move {
				let report = cycle.run(cancel).await;
				drop(guard);
				report
			});
			self.handles.push(handle);
			info!(job = %name, "Execution of job has been started");
		}

		info!(
			job_count = self.jobs.len(),
			running = self.handles.len(),
			"Job scheduler started"
		);
		Ok(())
	}

	/// Broadcasts cancellation and waits until every cycle has stopped.
	#[instrument(skip(self))]
	pub async fn shutdown(&mut self) -> ShutdownSummary {
		info!("Stopping jobs");
		self.shutdown.cancel();

		if let Some(completion) = &self.completion {
			completion.wait().await;
		}

		let mut summary = ShutdownSummary::default();
		for handle in self.handles.drain(..) {
			match handle.await {
				Ok(report) => summary.reports.push(report),
				Err(e) => {
					error!(error = %e, "Job cycle task ended abnormally");
					summary.panicked += 1;
				}
			}
		}

		for (name, registered) in &self.jobs {
			if !registered.definition.enabled() {
				summary.reports.push(CycleReport {
					job: name.clone(),
					state: CycleState::Stopped,
					passes: 0,
					consecutive_failures: 0,
				});
			}
		}

		info!(stopped = summary.reports.len(), "All jobs have been stopped");
		summary
	}
}
