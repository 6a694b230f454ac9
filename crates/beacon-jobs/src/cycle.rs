// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The recurring execution loop of a single job.
//!
//! A pass (one retry sequence plus, on failure, one reconciliation) is awaited
//! inline by the cycle task, so a job never runs twice at the same time.
//! Ticks that fall due while a pass is still running are skipped.

use std::fmt;

use beacon_jobs_core::JobDefinition;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::log::JobLog;
use crate::retry::{RetryController, SequenceOutcome};
use crate::runtime::JobRuntime;
use crate::sync::StatusSynchronizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
	Idle,
	Running,
	Succeeded,
	Failed,
	Stopped,
}

impl fmt::Display for CycleState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CycleState::Idle => write!(f, "idle"),
			CycleState::Running => write!(f, "running"),
			CycleState::Succeeded => write!(f, "succeeded"),
			CycleState::Failed => write!(f, "failed"),
			CycleState::Stopped => write!(f, "stopped"),
		}
	}
}

/// Acknowledgement a cycle hands back once it has stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
	pub job: String,
	pub state: CycleState,
	pub passes: u64,
	pub consecutive_failures: u32,
}

pub struct JobCycle {
	job: JobDefinition,
	retry: RetryController,
	sync: StatusSynchronizer,
	log: JobLog,
	runtime: JobRuntime,
	state: CycleState,
}

impl JobCycle {
	pub fn new(
		job: JobDefinition,
		retry: RetryController,
		sync: StatusSynchronizer,
		log: JobLog,
	) -> Self {
		Self {
			job,
			retry,
			sync,
			log,
			runtime: JobRuntime::new(),
			state: CycleState::Idle,
		}
	}

	pub fn state(&self) -> CycleState {
		self.state
	}

	/// Runs passes until `cancel` fires, then reports `Stopped`.
	///
	/// Disabled jobs stop immediately. Enabled jobs run one pass right away
	/// and then one per interval tick.
	pub async fn run(mut self, cancel: CancellationToken) -> CycleReport {
		if !self.job.enabled() {
			info!(job = %self.job.name(), "Job is disabled, skipping execution");
			return self.stop();
		}
		if cancel.is_cancelled() {
			return self.stop();
		}

		let interval = self.job.interval();
		let mut ticker = interval_at(Instant::now() + interval, interval);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

		if self.pass(&cancel).await {
			loop {
				tokio::select! {
					biased;
					_ = cancel.cancelled() => break,
					_ = ticker.tick() => {
						if !self.pass(&cancel).await {
							break;
						}
					}
				}
			}
		}

		drop(ticker);
		self.stop()
	}

	/// Runs one pass. Returns `false` when the pass was cut short by cancellation.
	async fn pass(&mut self, cancel: &CancellationToken) -> bool {
		let run_id = Uuid::new_v4();
		let span = info_span!("job_cycle", job = %self.job.name(), run_id = %run_id);
		self.execute_pass(cancel).instrument(span).await
	}

	async fn execute_pass(&mut self, cancel: &CancellationToken) -> bool {
		if cancel.is_cancelled() {
			return false;
		}
		self.state = CycleState::Running;

		let outcome = self
			.retry
			.attempt(&self.job, &mut self.runtime, &self.log, cancel)
			.await;

		match outcome {
			SequenceOutcome::Success(_) => {
				self.state = CycleState::Succeeded;
				self.runtime.finish_pass(true);
			}
			SequenceOutcome::Failure(result) => {
				self.state = CycleState::Failed;
				self.runtime.finish_pass(false);
				warn!(
					consecutive_failures = self.runtime.consecutive_failures(),
					outcome = %result.outcome(),
					"Job failed after all attempts"
				);

				if let Err(e) = self.sync.reconcile(&self.job, &result, &self.log).await {
					self.log
						.append(format!("Could not reconcile component status: {e}"));
					warn!(
						component_id = %self.job.component_id(),
						error = %e,
						"Status reconciliation failed, continuing with next tick"
					);
				}
			}
			SequenceOutcome::Cancelled => return false,
		}

		self.log
			.append(format!("Next check in {:?}", self.job.interval()));
		self.state = CycleState::Idle;
		true
	}

	fn stop(mut self) -> CycleReport {
		self.state = CycleState::Stopped;
		if self.job.enabled() {
			self.log.append("Job stopped");
			info!(job = %self.job.name(), passes = self.runtime.passes(), "Job stopped");
		}

		CycleReport {
			job: self.job.name().to_string(),
			state: self.state,
			passes: self.runtime.passes(),
			consecutive_failures: self.runtime.consecutive_failures(),
		}
	}
}
