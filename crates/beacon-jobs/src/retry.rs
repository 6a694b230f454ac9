// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bounded retries with a fixed, interruptible delay.

use std::sync::Arc;

use beacon_jobs_core::{ExecutionResult, JobDefinition, Outcome};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::executor::CommandRunner;
use crate::log::JobLog;
use crate::runtime::JobRuntime;

/// Final result of one retry sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceOutcome {
	/// An attempt succeeded; later attempts were not made.
	Success(ExecutionResult),
	/// Every attempt failed; carries the last attempt.
	Failure(ExecutionResult),
	/// Cancellation arrived while waiting between attempts.
	Cancelled,
}

#[derive(Clone)]
pub struct RetryController {
	runner: Arc<dyn CommandRunner>,
}

impl RetryController {
	pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
		Self { runner }
	}

	/// Runs the job's command up to `max_attempts` times.
	///
	/// The attempt counter in `runtime` is incremented once per runner call.
	/// Only the delay between attempts observes `cancel`; an attempt that has
	/// started runs until it exits or hits its timeout.
	#[instrument(skip_all, fields(job = %job.name(), max_attempts = job.max_attempts()))]
	pub async fn attempt(
		&self,
		job: &JobDefinition,
		runtime: &mut JobRuntime,
		log: &JobLog,
		cancel: &CancellationToken,
	) -> SequenceOutcome {
		runtime.begin_sequence();

		loop {
			let attempt = runtime.next_attempt();
			log.append(format!(
				"Starting to execute job (attempt {attempt}/{})",
				job.max_attempts()
			));

			let result = self.runner.run(job).await;
			runtime.record(result.clone());

			match result.outcome() {
				Outcome::Success => {
					log.append(format!(
						"Job execution successful ({:?})",
						result.elapsed()
					));
					info!(attempt, elapsed_ms = result.elapsed().as_millis() as u64, "Job succeeded");
					return SequenceOutcome::Success(result);
				}
				Outcome::Timeout => {
					log.append(format!(
						"The job took longer than the configured timeout ({:?}), execution has been aborted",
						job.timeout()
					));
				}
				Outcome::NonZeroExit => {
					log.append(format!("The job didn't execute successfully ({})", result.exit()));
					log.append(format!("Output of job: {}", result.output()));
				}
				Outcome::SpawnFailure => {
					log.append(format!("Error executing command: {}", result.exit()));
				}
			}
			warn!(attempt, outcome = %result.outcome(), exit = %result.exit(), "Job attempt failed");

			if attempt >= job.max_attempts() {
				log.append(format!(
					"All {} attempt(s) failed",
					job.max_attempts()
				));
				return SequenceOutcome::Failure(result);
			}

			let remaining = job.max_attempts() - attempt;
			log.append(format!(
				"Retrying in {:?}. {remaining} tries left before updating component status",
				job.retry_delay()
			));

			tokio::select! {
				biased;
				_ = cancel.cancelled() => {
					runtime.mark_cancelled();
					log.append("Job received signal to stop");
					info!(attempt, "Retry sequence cancelled");
					return SequenceOutcome::Cancelled;
				}
				_ = tokio::time::sleep(job.retry_delay()) => {}
			}
		}
	}
}
