// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Results of single process attempts.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a single attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
	Success,
	NonZeroExit,
	Timeout,
	SpawnFailure,
}

impl Outcome {
	pub fn is_success(&self) -> bool {
		matches!(self, Outcome::Success)
	}
}

impl fmt::Display for Outcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Outcome::Success => write!(f, "success"),
			Outcome::NonZeroExit => write!(f, "non_zero_exit"),
			Outcome::Timeout => write!(f, "timeout"),
			Outcome::SpawnFailure => write!(f, "spawn_failure"),
		}
	}
}

/// What is known about the process once the attempt is over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExitDetail {
	/// The process exited on its own with this code.
	Code { code: i32 },
	/// The process was terminated by a signal it did not receive from us.
	Signal { signal: i32 },
	/// The process was killed after its deadline elapsed.
	Killed,
	/// The process never started.
	NotSpawned { error: String },
	/// The process ran but its exit status could not be collected.
	Lost { error: String },
}

impl fmt::Display for ExitDetail {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ExitDetail::Code { code } => write!(f, "exit code {code}"),
			ExitDetail::Signal { signal } => write!(f, "terminated by signal {signal}"),
			ExitDetail::Killed => write!(f, "killed after timeout"),
			ExitDetail::NotSpawned { error } => write!(f, "not spawned: {error}"),
			ExitDetail::Lost { error } => write!(f, "exit status unavailable: {error}"),
		}
	}
}

/// Record of one process attempt. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
	outcome: Outcome,
	output: String,
	elapsed: Duration,
	exit: ExitDetail,
	started_at: DateTime<Utc>,
}

impl ExecutionResult {
	pub fn new(
		outcome: Outcome,
		output: impl Into<String>,
		elapsed: Duration,
		exit: ExitDetail,
		started_at: DateTime<Utc>,
	) -> Self {
		Self {
			outcome,
			output: output.into(),
			elapsed,
			exit,
			started_at,
		}
	}

	/// Result for a process that could not be created.
	pub fn spawn_failure(error: impl fmt::Display, started_at: DateTime<Utc>) -> Self {
		Self {
			outcome: Outcome::SpawnFailure,
			output: String::new(),
			elapsed: Duration::ZERO,
			exit: ExitDetail::NotSpawned {
				error: error.to_string(),
			},
			started_at,
		}
	}

	pub fn outcome(&self) -> Outcome {
		self.outcome
	}

	pub fn is_success(&self) -> bool {
		self.outcome.is_success()
	}

	/// Captured standard output, lossily decoded.
	pub fn output(&self) -> &str {
		&self.output
	}

	pub fn elapsed(&self) -> Duration {
		self.elapsed
	}

	pub fn exit(&self) -> &ExitDetail {
		&self.exit
	}

	pub fn started_at(&self) -> DateTime<Utc> {
		self.started_at
	}
}
