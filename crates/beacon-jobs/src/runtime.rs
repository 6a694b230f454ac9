// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use beacon_jobs_core::ExecutionResult;

/// Mutable execution context of one job, owned by its cycle task.
#[derive(Debug, Default)]
pub struct JobRuntime {
	attempt: u32,
	cancelled: bool,
	last_result: Option<ExecutionResult>,
	passes: u64,
	consecutive_failures: u32,
}

impl JobRuntime {
	pub fn new() -> Self {
		Self::default()
	}

	/// Resets the attempt counter for a new retry sequence.
	pub fn begin_sequence(&mut self) {
		self.attempt = 0;
	}

	/// Increments and returns the attempt counter.
	pub fn next_attempt(&mut self) -> u32 {
		self.attempt += 1;
		self.attempt
	}

	pub fn attempt(&self) -> u32 {
		self.attempt
	}

	pub fn record(&mut self, result: ExecutionResult) {
		self.last_result = Some(result);
	}

	pub fn last_result(&self) -> Option<&ExecutionResult> {
		self.last_result.as_ref()
	}

	pub fn mark_cancelled(&mut self) {
		self.cancelled = true;
	}

	pub fn cancelled(&self) -> bool {
		self.cancelled
	}

	/// Records the end of a cycle pass that ran to a final outcome.
	pub fn finish_pass(&mut self, succeeded: bool) {
		self.passes += 1;
		if succeeded {
			self.consecutive_failures = 0;
		} else {
			self.consecutive_failures += 1;
		}
	}

	pub fn passes(&self) -> u64 {
		self.passes
	}

	pub fn consecutive_failures(&self) -> u32 {
		self.consecutive_failures
	}
}
