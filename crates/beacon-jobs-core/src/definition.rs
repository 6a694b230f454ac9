// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Job definitions.
//!
//! A [`JobDefinition`] can only be obtained through [`JobDefinitionBuilder::build`],
//! so every definition handed to the scheduler has already passed validation.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DefinitionError, Result};

/// Upper bound for interval, timeout and retry delay (one year).
pub const MAX_DURATION: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Identifier of a component on the status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub u32);

impl fmt::Display for ComponentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Immutable configuration and identity of one scheduled job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDefinition {
	name: String,
	enabled: bool,
	command: PathBuf,
	args: Vec<String>,
	working_directory: Option<PathBuf>,
	interval: Duration,
	timeout: Duration,
	max_attempts: u32,
	retry_delay: Duration,
	component_id: ComponentId,
	failure_status: u32,
	create_incident: bool,
}

impl JobDefinition {
	/// Starts a builder for a job with the given name and command.
	pub fn builder(name: impl Into<String>, command: impl Into<PathBuf>) -> JobDefinitionBuilder {
		JobDefinitionBuilder::new(name, command)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn enabled(&self) -> bool {
		self.enabled
	}

	pub fn command(&self) -> &Path {
		&self.command
	}

	pub fn args(&self) -> &[String] {
		&self.args
	}

	pub fn working_directory(&self) -> Option<&Path> {
		self.working_directory.as_deref()
	}

	/// Time between two cycle passes.
	pub fn interval(&self) -> Duration {
		self.interval
	}

	/// Hard deadline for a single attempt.
	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	pub fn max_attempts(&self) -> u32 {
		self.max_attempts
	}

	/// Fixed wait between two failed attempts.
	pub fn retry_delay(&self) -> Duration {
		self.retry_delay
	}

	pub fn component_id(&self) -> ComponentId {
		self.component_id
	}

	/// Status code the component is set to once every attempt has failed.
	pub fn failure_status(&self) -> u32 {
		self.failure_status
	}

	pub fn create_incident(&self) -> bool {
		self.create_incident
	}

	/// Returns a copy of this definition with the enabled flag replaced.
	pub fn with_enabled(&self, enabled: bool) -> Self {
		Self {
			enabled,
			..self.clone()
		}
	}
}

impl fmt::Display for JobDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "- {}", self.name)?;
		writeln!(f, "    enabled = {}", self.enabled)?;
		writeln!(f, "    command = {}", self.command.display())?;
		writeln!(f, "    args = {:?}", self.args)?;
		match &self.working_directory {
			Some(dir) => writeln!(f, "    working_directory = {}", dir.display())?,
			None => writeln!(f, "    working_directory = (inherited)")?,
		}
		writeln!(f, "    interval = {:?}", self.interval)?;
		writeln!(f, "    timeout = {:?}", self.timeout)?;
		writeln!(f, "    max_attempts = {}", self.max_attempts)?;
		writeln!(f, "    retry_delay = {:?}", self.retry_delay)?;
		writeln!(f, "    component_id = {}", self.component_id)?;
		writeln!(f, "    failure_status = {}", self.failure_status)?;
		write!(f, "    create_incident = {}", self.create_incident)
	}
}

/// Builder for [`JobDefinition`]; [`build`](Self::build) validates every field.
#[derive(Debug, Clone)]
pub struct JobDefinitionBuilder {
	name: String,
	enabled: bool,
	command: PathBuf,
	args: Vec<String>,
	working_directory: Option<PathBuf>,
	interval: Duration,
	timeout: Duration,
	max_attempts: u32,
	retry_delay: Duration,
	component_id: u32,
	failure_status: u32,
	create_incident: bool,
}

impl JobDefinitionBuilder {
	pub fn new(name: impl Into<String>, command: impl Into<PathBuf>) -> Self {
		Self {
			name: name.into(),
			enabled: true,
			command: command.into(),
			args: Vec::new(),
			working_directory: None,
			interval: Duration::ZERO,
			timeout: Duration::ZERO,
			max_attempts: 1,
			retry_delay: Duration::ZERO,
			component_id: 0,
			failure_status: 0,
			create_incident: false,
		}
	}

	pub fn enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}

	pub fn args<I, S>(mut self, args: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.args = args.into_iter().map(Into::into).collect();
		self
	}

	pub fn working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
		self.working_directory = Some(dir.into());
		self
	}

	pub fn interval(mut self, interval: Duration) -> Self {
		self.interval = interval;
		self
	}

	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	pub fn max_attempts(mut self, attempts: u32) -> Self {
		self.max_attempts = attempts;
		self
	}

	pub fn retry_delay(mut self, delay: Duration) -> Self {
		self.retry_delay = delay;
		self
	}

	pub fn component_id(mut self, id: u32) -> Self {
		self.component_id = id;
		self
	}

	pub fn failure_status(mut self, status: u32) -> Self {
		self.failure_status = status;
		self
	}

	pub fn create_incident(mut self, create: bool) -> Self {
		self.create_incident = create;
		self
	}

	/// Validates the collected fields and produces the definition.
	pub fn build(self) -> Result<JobDefinition> {
		if self.name.trim().is_empty() {
			return Err(DefinitionError::EmptyName);
		}
		if self.command.as_os_str().is_empty() {
			return Err(DefinitionError::EmptyCommand);
		}
		if self.interval.is_zero() {
			return Err(DefinitionError::ZeroInterval);
		}
		if self.timeout.is_zero() {
			return Err(DefinitionError::ZeroTimeout);
		}
		for (field, value) in [
			("interval", self.interval),
			("timeout", self.timeout),
			("retry_delay", self.retry_delay),
		] {
			if value > MAX_DURATION {
				return Err(DefinitionError::TooLong {
					field,
					max: MAX_DURATION,
				});
			}
		}
		if self.max_attempts == 0 {
			return Err(DefinitionError::ZeroAttempts);
		}
		if self.component_id == 0 {
			return Err(DefinitionError::InvalidComponentId);
		}
		if self.failure_status == 0 {
			return Err(DefinitionError::InvalidFailureStatus);
		}

		Ok(JobDefinition {
			name: self.name,
			enabled: self.enabled,
			command: self.command,
			args: self.args,
			working_directory: self.working_directory,
			interval: self.interval,
			timeout: self.timeout,
			max_attempts: self.max_attempts,
			retry_delay: self.retry_delay,
			component_id: ComponentId(self.component_id),
			failure_status: self.failure_status,
			create_incident: self.create_incident,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn valid() -> JobDefinitionBuilder {
		JobDefinition::builder("disk-check", "/usr/local/bin/check_disk")
			.interval(Duration::from_secs(300))
			.timeout(Duration::from_secs(30))
			.component_id(4)
			.failure_status(4)
	}

	#[test]
	fn test_build_valid_definition() {
		let def = valid()
			.args(["-w", "80"])
			.working_directory("/tmp")
			.max_attempts(3)
			.retry_delay(Duration::from_secs(10))
			.build()
			.unwrap();

		assert_eq!(def.name(), "disk-check");
		assert!(def.enabled());
		assert_eq!(def.args(), &["-w".to_string(), "80".to_string()]);
		assert_eq!(def.working_directory(), Some(Path::new("/tmp")));
		assert_eq!(def.max_attempts(), 3);
		assert_eq!(def.component_id(), ComponentId(4));
		assert!(!def.create_incident());
	}

	#[test]
	fn test_defaults_to_single_attempt_without_delay() {
		let def = valid().build().unwrap();
		assert_eq!(def.max_attempts(), 1);
		assert_eq!(def.retry_delay(), Duration::ZERO);
		assert!(def.working_directory().is_none());
	}

	#[test]
	fn test_rejects_empty_name() {
		let result = JobDefinition::builder("  ", "/bin/true")
			.interval(Duration::from_secs(1))
			.timeout(Duration::from_secs(1))
			.component_id(1)
			.failure_status(1)
			.build();
		assert_eq!(result.unwrap_err(), DefinitionError::EmptyName);
	}

	#[test]
	fn test_rejects_empty_command() {
		let result = JobDefinition::builder("job", "")
			.interval(Duration::from_secs(1))
			.timeout(Duration::from_secs(1))
			.component_id(1)
			.failure_status(1)
			.build();
		assert_eq!(result.unwrap_err(), DefinitionError::EmptyCommand);
	}

	#[test]
	fn test_rejects_zero_interval() {
		let result = valid().interval(Duration::ZERO).build();
		assert_eq!(result.unwrap_err(), DefinitionError::ZeroInterval);
	}

	#[test]
	fn test_rejects_zero_timeout() {
		let result = valid().timeout(Duration::ZERO).build();
		assert_eq!(result.unwrap_err(), DefinitionError::ZeroTimeout);
	}

	#[test]
	fn test_rejects_durations_beyond_one_year() {
		let result = valid().interval(Duration::from_secs(u64::MAX)).build();
		assert_eq!(
			result.unwrap_err(),
			DefinitionError::TooLong {
				field: "interval",
				max: MAX_DURATION
			}
		);

		let result = valid().timeout(MAX_DURATION + Duration::from_secs(1)).build();
		assert!(matches!(
			result,
			Err(DefinitionError::TooLong { field: "timeout", .. })
		));

		let result = valid().retry_delay(Duration::MAX).build();
		assert!(matches!(
			result,
			Err(DefinitionError::TooLong {
				field: "retry_delay",
				..
			})
		));

		assert!(valid().interval(MAX_DURATION).build().is_ok());
	}

	#[test]
	fn test_rejects_zero_attempts() {
		let result = valid().max_attempts(0).build();
		assert_eq!(result.unwrap_err(), DefinitionError::ZeroAttempts);
	}

	#[test]
	fn test_rejects_zero_component() {
		let result = valid().component_id(0).build();
		assert_eq!(result.unwrap_err(), DefinitionError::InvalidComponentId);
	}

	#[test]
	fn test_rejects_zero_failure_status() {
		let result = valid().failure_status(0).build();
		assert_eq!(result.unwrap_err(), DefinitionError::InvalidFailureStatus);
	}

	#[test]
	fn test_with_enabled_keeps_other_fields() {
		let def = valid().max_attempts(2).build().unwrap();
		let disabled = def.with_enabled(false);
		assert!(!disabled.enabled());
		assert_eq!(disabled.max_attempts(), 2);
		assert_eq!(disabled.name(), def.name());
	}

	#[test]
	fn test_display_lists_every_field() {
		let def = valid().build().unwrap();
		let text = def.to_string();
		for field in [
			"enabled",
			"command",
			"args",
			"working_directory",
			"interval",
			"timeout",
			"max_attempts",
			"retry_delay",
			"component_id",
			"failure_status",
			"create_incident",
		] {
			assert!(text.contains(field), "missing {field} in:\n{text}");
		}
		assert!(text.starts_with("- disk-check"));
	}

	proptest! {
		#[test]
		fn any_positive_fields_build(
			interval in 1u64..100_000,
			timeout in 1u64..100_000,
			attempts in 1u32..100,
			delay in 0u64..1_000,
			component in 1u32..10_000,
			status in 1u32..10,
		) {
			let def = JobDefinition::builder("job", "/bin/true")
				.interval(Duration::from_secs(interval))
				.timeout(Duration::from_secs(timeout))
				.max_attempts(attempts)
				.retry_delay(Duration::from_secs(delay))
				.component_id(component)
				.failure_status(status)
				.build();
			prop_assert!(def.is_ok());
		}
	}
}
