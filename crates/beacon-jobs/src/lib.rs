// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Job execution and scheduling for beacon.
//!
//! This crate runs a fixed set of interval-scheduled external commands. Each
//! job gets its own cycle task which executes the command with a hard timeout,
//! retries failed attempts with a fixed delay, and reconciles the job's status
//! page component once every attempt has failed. A single cancellation token
//! stops every cycle; the scheduler waits until all of them have acknowledged.

pub mod completion;
pub mod cycle;
pub mod error;
pub mod executor;
pub mod log;
pub mod retry;
pub mod runtime;
pub mod scheduler;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

pub use completion::{Completion, CompletionGuard};
pub use cycle::{CycleReport, CycleState, JobCycle};
pub use error::{JobError, Result};
pub use executor::{CommandRunner, ProcessExecutor};
pub use log::JobLog;
pub use retry::{RetryController, SequenceOutcome};
pub use runtime::JobRuntime;
pub use scheduler::{Scheduler, ShutdownSummary};
pub use sync::{ReconcileAction, StatusSynchronizer};

pub use tokio_util::sync::CancellationToken;
