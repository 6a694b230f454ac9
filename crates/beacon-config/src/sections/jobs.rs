// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-job configuration section (`[jobs.<name>]`).

use std::path::PathBuf;
use std::time::Duration;

use beacon_jobs_core::JobDefinition;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct JobConfigLayer {
	pub enabled: Option<bool>,
	pub command: Option<String>,
	pub args: Option<Vec<String>>,
	pub working_directory: Option<PathBuf>,
	pub interval_secs: Option<u64>,
	pub timeout_secs: Option<u64>,
	pub max_attempts: Option<u32>,
	pub retry_delay_secs: Option<u64>,
	pub component_id: Option<u32>,
	pub failure_status: Option<u32>,
	pub create_incident: Option<bool>,
}

impl JobConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.command.is_some() {
			self.command = other.command;
		}
		if other.args.is_some() {
			self.args = other.args;
		}
		if other.working_directory.is_some() {
			self.working_directory = other.working_directory;
		}
		if other.interval_secs.is_some() {
			self.interval_secs = other.interval_secs;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
		if other.max_attempts.is_some() {
			self.max_attempts = other.max_attempts;
		}
		if other.retry_delay_secs.is_some() {
			self.retry_delay_secs = other.retry_delay_secs;
		}
		if other.component_id.is_some() {
			self.component_id = other.component_id;
		}
		if other.failure_status.is_some() {
			self.failure_status = other.failure_status;
		}
		if other.create_incident.is_some() {
			self.create_incident = other.create_incident;
		}
	}

	/// Turns the layer into a validated definition for the job called `name`.
	pub fn finalize(self, name: &str) -> Result<JobDefinition, ConfigError> {
		let missing = |field: &str| ConfigError::Missing(format!("jobs.{name}.{field}"));

		let command = self.command.ok_or_else(|| missing("command"))?;
		let interval_secs = self.interval_secs.ok_or_else(|| missing("interval_secs"))?;
		let timeout_secs = self.timeout_secs.ok_or_else(|| missing("timeout_secs"))?;
		let component_id = self.component_id.ok_or_else(|| missing("component_id"))?;
		let failure_status = self
			.failure_status
			.ok_or_else(|| missing("failure_status"))?;

		let mut builder = JobDefinition::builder(name, command.trim())
			.enabled(self.enabled.unwrap_or(true))
			.args(self.args.unwrap_or_default())
			.interval(Duration::from_secs(interval_secs))
			.timeout(Duration::from_secs(timeout_secs))
			.max_attempts(self.max_attempts.unwrap_or(1))
			.retry_delay(Duration::from_secs(self.retry_delay_secs.unwrap_or(0)))
			.component_id(component_id)
			.failure_status(failure_status)
			.create_incident(self.create_incident.unwrap_or(false));
		if let Some(dir) = self.working_directory {
			builder = builder.working_directory(dir);
		}

		builder.build().map_err(|source| ConfigError::InvalidJob {
			job: name.to_string(),
			source,
		})
	}
}
