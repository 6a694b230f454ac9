// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Single process attempts under a deadline.
//!
//! An attempt races the child's exit against the deadline while stdout is
//! drained alongside. Whichever of exit and deadline comes first decides the
//! state. Output still buffered in the pipe after exit gets a short grace
//! period, since a background process may keep the pipe open indefinitely.
//! On timeout the child is only signalled after `try_wait` confirms it is
//! still running, and it is reaped afterwards.

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use beacon_jobs_core::{ExecutionResult, ExitDetail, JobDefinition, Outcome};
use chrono::Utc;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStdout, Command};
use tracing::{debug, warn};

const READ_CHUNK: usize = 8 * 1024;

/// How long to keep reading stdout once the child has exited.
const OUTPUT_GRACE: Duration = Duration::from_millis(250);

/// Runs one attempt of a job's command.
#[async_trait]
pub trait CommandRunner: Send + Sync {
	async fn run(&self, job: &JobDefinition) -> ExecutionResult;
}

/// [`CommandRunner`] that spawns an OS process.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor;

enum AttemptState {
	Exited(std::io::Result<ExitStatus>),
	TimedOut,
}

impl ProcessExecutor {
	pub fn new() -> Self {
		Self
	}

	/// Spawns `command` once and waits at most `timeout` for it to exit.
	pub async fn execute(
		&self,
		command: &Path,
		args: &[String],
		working_directory: Option<&Path>,
		timeout: Duration,
	) -> ExecutionResult {
		let started_at = Utc::now();
		let start = Instant::now();

		let mut cmd = Command::new(command);
		cmd.args(args)
			.stdin(Stdio::null())
			.stdout(Stdio::piped())
			.stderr(Stdio::null())
			.kill_on_drop(true);
		if let Some(dir) = working_directory {
			cmd.current_dir(dir);
		}

		let mut child = match cmd.spawn() {
			Ok(child) => child,
			Err(e) => {
				warn!(command = %command.display(), error = %e, "Failed to spawn process");
				return ExecutionResult::spawn_failure(e, started_at);
			}
		};

		let stdout = child.stdout.take();
		let mut buffer = Vec::new();

		let state = {
			let drain = read_output(stdout, &mut buffer);
			tokio::pin!(drain);
			let deadline = tokio::time::sleep(timeout);
			tokio::pin!(deadline);
			let mut drained = false;

			let state = loop {
				tokio::select! {
					status = child.wait() => break AttemptState::Exited(status),
					_ = &mut deadline => break AttemptState::TimedOut,
					_ = &mut drain, if !drained => drained = true,
				}
			};

			if matches!(state, AttemptState::Exited(_))
				&& !drained
				&& tokio::time::timeout(OUTPUT_GRACE, &mut drain).await.is_err()
			{
				debug!(command = %command.display(), "Output still open after exit, keeping what was read");
			}
			state
		};

		let (outcome, exit) = match state {
			AttemptState::Exited(Ok(status)) => {
				let outcome = if status.success() {
					Outcome::Success
				} else {
					Outcome::NonZeroExit
				};
				(outcome, exit_detail(status))
			}
			AttemptState::Exited(Err(e)) => (
				Outcome::NonZeroExit,
				ExitDetail::Lost {
					error: e.to_string(),
				},
			),
			AttemptState::TimedOut => (Outcome::Timeout, terminate(&mut child).await),
		};

		let elapsed = start.elapsed();
		debug!(
			command = %command.display(),
			outcome = %outcome,
			exit = %exit,
			elapsed_ms = elapsed.as_millis() as u64,
			"Process attempt finished"
		);

		ExecutionResult::new(
			outcome,
			String::from_utf8_lossy(&buffer).into_owned(),
			elapsed,
			exit,
			started_at,
		)
	}
}

#[async_trait]
impl CommandRunner for ProcessExecutor {
	async fn run(&self, job: &JobDefinition) -> ExecutionResult {
		self.execute(
			job.command(),
			job.args(),
			job.working_directory(),
			job.timeout(),
		)
		.await
	}
}

/// Reads stdout into `buffer` until EOF. Cancel-safe: bytes already read stay
/// in `buffer`.
async fn read_output(stdout: Option<ChildStdout>, buffer: &mut Vec<u8>) {
	let Some(mut stdout) = stdout else {
		return;
	};
	let mut chunk = [0u8; READ_CHUNK];
	loop {
		match stdout.read(&mut chunk).await {
			Ok(0) => break,
			Ok(n) => buffer.extend_from_slice(&chunk[..n]),
			Err(e) => {
				debug!(error = %e, "Stopped reading process output");
				break;
			}
		}
	}
}

/// Kills the child if it is still running and reaps it.
async fn terminate(child: &mut Child) -> ExitDetail {
	match child.try_wait() {
		Ok(Some(status)) => exit_detail(status),
		Ok(None) => {
			if let Err(e) = child.start_kill() {
				warn!(error = %e, "Failed to kill timed out process");
			}
			if let Err(e) = child.wait().await {
				warn!(error = %e, "Failed to reap timed out process");
			}
			ExitDetail::Killed
		}
		Err(e) => ExitDetail::Lost {
			error: e.to_string(),
		},
	}
}

fn exit_detail(status: ExitStatus) -> ExitDetail {
	if let Some(code) = status.code() {
		return ExitDetail::Code { code };
	}

	#[cfg(unix)]
	{
		use std::os::unix::process::ExitStatusExt;
		if let Some(signal) = status.signal() {
			return ExitDetail::Signal { signal };
		}
	}

	ExitDetail::Lost {
		error: status.to_string(),
	}
}

#[cfg(all(test, unix))]
mod tests {
	use super::*;

	fn sh(script: &str) -> Vec<String> {
		vec!["-c".to_string(), script.to_string()]
	}

	#[tokio::test]
	async fn test_zero_exit_is_success_with_output() {
		let result = ProcessExecutor::new()
			.execute(Path::new("sh"), &sh("echo hello"), None, Duration::from_secs(10))
			.await;

		assert_eq!(result.outcome(), Outcome::Success);
		assert_eq!(result.output(), "hello\n");
		assert_eq!(result.exit(), &ExitDetail::Code { code: 0 });
	}

	#[tokio::test]
	async fn test_non_zero_exit() {
		let result = ProcessExecutor::new()
			.execute(
				Path::new("sh"),
				&sh("echo failing; exit 3"),
				None,
				Duration::from_secs(10),
			)
			.await;

		assert_eq!(result.outcome(), Outcome::NonZeroExit);
		assert_eq!(result.output(), "failing\n");
		assert_eq!(result.exit(), &ExitDetail::Code { code: 3 });
	}

	#[tokio::test]
	async fn test_deadline_kills_process_and_keeps_partial_output() {
		let started = Instant::now();
		let result = ProcessExecutor::new()
			.execute(
				Path::new("sh"),
				&sh("echo partial; exec sleep 30"),
				None,
				Duration::from_millis(300),
			)
			.await;

		assert_eq!(result.outcome(), Outcome::Timeout);
		assert_eq!(result.exit(), &ExitDetail::Killed);
		assert_eq!(result.output(), "partial\n");
		assert!(started.elapsed() < Duration::from_secs(10));
		assert!(result.elapsed() >= Duration::from_millis(300));
	}

	#[tokio::test]
	async fn test_exit_is_classified_while_background_process_holds_stdout() {
		let started = Instant::now();
		let result = ProcessExecutor::new()
			.execute(
				Path::new("sh"),
				&sh("sleep 5 & echo ok"),
				None,
				Duration::from_secs(3),
			)
			.await;

		assert_eq!(result.outcome(), Outcome::Success);
		assert_eq!(result.exit(), &ExitDetail::Code { code: 0 });
		assert_eq!(result.output(), "ok\n");
		assert!(started.elapsed() < Duration::from_secs(2));
	}

	#[tokio::test]
	async fn test_non_zero_exit_with_background_process_is_not_timeout() {
		let result = ProcessExecutor::new()
			.execute(
				Path::new("sh"),
				&sh("sleep 5 & echo broken; exit 2"),
				None,
				Duration::from_secs(3),
			)
			.await;

		assert_eq!(result.outcome(), Outcome::NonZeroExit);
		assert_eq!(result.exit(), &ExitDetail::Code { code: 2 });
		assert_eq!(result.output(), "broken\n");
	}

	#[tokio::test]
	async fn test_long_runner_is_never_success() {
		let result = ProcessExecutor::new()
			.execute(
				Path::new("sh"),
				&sh("exec sleep 5"),
				None,
				Duration::from_millis(100),
			)
			.await;

		assert_eq!(result.outcome(), Outcome::Timeout);
		assert!(!result.is_success());
	}

	#[tokio::test]
	async fn test_missing_binary_is_spawn_failure() {
		let result = ProcessExecutor::new()
			.execute(
				Path::new("/nonexistent/beacon-test-binary"),
				&[],
				None,
				Duration::from_secs(1),
			)
			.await;

		assert_eq!(result.outcome(), Outcome::SpawnFailure);
		assert!(result.output().is_empty());
		assert!(matches!(result.exit(), ExitDetail::NotSpawned { .. }));
	}

	#[tokio::test]
	async fn test_runs_in_working_directory() {
		let dir = tempfile::tempdir().unwrap();
		let expected = dir.path().canonicalize().unwrap();

		let result = ProcessExecutor::new()
			.execute(
				Path::new("sh"),
				&sh("pwd -P"),
				Some(dir.path()),
				Duration::from_secs(10),
			)
			.await;

		assert_eq!(result.outcome(), Outcome::Success);
		assert_eq!(result.output().trim_end(), expected.to_string_lossy());
	}

	#[tokio::test]
	async fn test_signal_termination_is_non_zero_exit() {
		let result = ProcessExecutor::new()
			.execute(
				Path::new("sh"),
				&sh("kill -9 $$"),
				None,
				Duration::from_secs(10),
			)
			.await;

		assert_eq!(result.outcome(), Outcome::NonZeroExit);
		assert_eq!(result.exit(), &ExitDetail::Signal { signal: 9 });
	}

	#[tokio::test]
	async fn test_runner_uses_job_definition() {
		let job = JobDefinition::builder("echo", "sh")
			.args(sh("echo from-job"))
			.interval(Duration::from_secs(60))
			.timeout(Duration::from_secs(10))
			.component_id(1)
			.failure_status(4)
			.build()
			.unwrap();

		let result = ProcessExecutor::new().run(&job).await;
		assert_eq!(result.outcome(), Outcome::Success);
		assert_eq!(result.output(), "from-job\n");
	}
}
