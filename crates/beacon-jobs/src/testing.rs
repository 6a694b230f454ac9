// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Scripted collaborators shared by the unit tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use beacon_jobs_core::{ComponentId, ExecutionResult, ExitDetail, JobDefinition, Outcome};
use beacon_status::{ComponentStatus, NewIncident, StatusError, StatusReporter};
use chrono::Utc;

use crate::executor::CommandRunner;

pub fn job(name: &str, component: u32, max_attempts: u32, retry_delay: Duration) -> JobDefinition {
	JobDefinition::builder(name, "/bin/true")
		.interval(Duration::from_secs(60))
		.timeout(Duration::from_secs(10))
		.max_attempts(max_attempts)
		.retry_delay(retry_delay)
		.component_id(component)
		.failure_status(2)
		.build()
		.unwrap()
}

pub fn result(outcome: Outcome) -> ExecutionResult {
	let exit = match outcome {
		Outcome::Success => ExitDetail::Code { code: 0 },
		Outcome::NonZeroExit => ExitDetail::Code { code: 1 },
		Outcome::Timeout => ExitDetail::Killed,
		Outcome::SpawnFailure => ExitDetail::NotSpawned {
			error: "No such file or directory".to_string(),
		},
	};
	ExecutionResult::new(outcome, "", Duration::ZERO, exit, Utc::now())
}

/// Returns scripted outcomes in order, then `fallback` forever.
pub struct ScriptedRunner {
	script: Mutex<VecDeque<Outcome>>,
	fallback: Outcome,
	duration: Duration,
	calls: AtomicU32,
	per_job: Mutex<HashMap<String, u32>>,
	active: AtomicU32,
	max_active: AtomicU32,
}

impl ScriptedRunner {
	pub fn new(script: impl IntoIterator<Item = Outcome>, fallback: Outcome) -> Self {
		Self {
			script: Mutex::new(script.into_iter().collect()),
			fallback,
			duration: Duration::ZERO,
			calls: AtomicU32::new(0),
			per_job: Mutex::new(HashMap::new()),
			active: AtomicU32::new(0),
			max_active: AtomicU32::new(0),
		}
	}

	pub fn always(outcome: Outcome) -> Self {
		Self::new([], outcome)
	}

	/// Makes every attempt take `duration` of (tokio) time.
	pub fn taking(mut self, duration: Duration) -> Self {
		self.duration = duration;
		self
	}

	pub fn calls(&self) -> u32 {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn calls_for(&self, job: &str) -> u32 {
		self.per_job.lock().unwrap().get(job).copied().unwrap_or(0)
	}

	pub fn max_active(&self) -> u32 {
		self.max_active.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
	async fn run(&self, job: &JobDefinition) -> ExecutionResult {
		self.calls.fetch_add(1, Ordering::SeqCst);
		*self
			.per_job
			.lock()
			.unwrap()
			.entry(job.name().to_string())
			.or_default() += 1;

		let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
		self.max_active.fetch_max(active, Ordering::SeqCst);
		if !self.duration.is_zero() {
			tokio::time::sleep(self.duration).await;
		}
		self.active.fetch_sub(1, Ordering::SeqCst);

		let outcome = self
			.script
			.lock()
			.unwrap()
			.pop_front()
			.unwrap_or(self.fallback);
		result(outcome)
	}
}

/// In-memory status page with call counters.
#[derive(Default)]
pub struct MockReporter {
	statuses: Mutex<HashMap<ComponentId, u32>>,
	failing_fetch: Mutex<HashSet<ComponentId>>,
	failing_update: Mutex<HashSet<ComponentId>>,
	fail_incidents: Mutex<bool>,
	get_calls: AtomicU32,
	set_calls: AtomicU32,
	incident_calls: AtomicU32,
}

impl MockReporter {
	pub fn with_status(component: u32, status: u32) -> Self {
		let reporter = Self::default();
		reporter
			.statuses
			.lock()
			.unwrap()
			.insert(ComponentId(component), status);
		reporter
	}

	pub fn fail_fetch(&self, component: u32) {
		self.failing_fetch
			.lock()
			.unwrap()
			.insert(ComponentId(component));
	}

	pub fn fail_update(&self, component: u32) {
		self.failing_update
			.lock()
			.unwrap()
			.insert(ComponentId(component));
	}

	pub fn fail_incidents(&self) {
		*self.fail_incidents.lock().unwrap() = true;
	}

	pub fn status(&self, component: u32) -> Option<u32> {
		self.statuses
			.lock()
			.unwrap()
			.get(&ComponentId(component))
			.copied()
	}

	pub fn get_calls(&self) -> u32 {
		self.get_calls.load(Ordering::SeqCst)
	}

	pub fn set_calls(&self) -> u32 {
		self.set_calls.load(Ordering::SeqCst)
	}

	pub fn incident_calls(&self) -> u32 {
		self.incident_calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl StatusReporter for MockReporter {
	async fn ping(&self) -> beacon_status::Result<()> {
		Ok(())
	}

	async fn get_status(&self, component: ComponentId) -> beacon_status::Result<ComponentStatus> {
		self.get_calls.fetch_add(1, Ordering::SeqCst);
		if self.failing_fetch.lock().unwrap().contains(&component) {
			return Err(StatusError::Server {
				status: 500,
				message: "fetch failed".to_string(),
			});
		}
		let status = self
			.statuses
			.lock()
			.unwrap()
			.get(&component)
			.copied()
			.unwrap_or(1);
		Ok(ComponentStatus {
			id: component,
			status,
			status_name: format!("status {status}"),
		})
	}

	async fn set_status(&self, component: ComponentId, status: u32) -> beacon_status::Result<()> {
		self.set_calls.fetch_add(1, Ordering::SeqCst);
		if self.failing_update.lock().unwrap().contains(&component) {
			return Err(StatusError::Server {
				status: 500,
				message: "update failed".to_string(),
			});
		}
		self.statuses.lock().unwrap().insert(component, status);
		Ok(())
	}

	async fn create_incident(&self, _incident: &NewIncident) -> beacon_status::Result<()> {
		self.incident_calls.fetch_add(1, Ordering::SeqCst);
		if *self.fail_incidents.lock().unwrap() {
			return Err(StatusError::Server {
				status: 500,
				message: "incident failed".to_string(),
			});
		}
		Ok(())
	}
}
