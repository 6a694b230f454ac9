// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the beacon scheduler.
//!
//! Settings are merged from built-in defaults, a TOML file and `BEACON_*`
//! environment variables, in that order of precedence. Jobs are declared only
//! in the file, one `[jobs.<name>]` table each.
//!
//! ```toml
//! [status]
//! url = "https://status.example.com"
//! api_token = "..."
//!
//! [jobs.web]
//! command = "/usr/lib/beacon/check-http"
//! args = ["https://example.com"]
//! interval_secs = 60
//! timeout_secs = 10
//! max_attempts = 3
//! retry_delay_secs = 5
//! component_id = 1
//! failure_status = 4
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use beacon_jobs_core::{ComponentId, JobDefinition};
use tracing::debug;

pub use error::ConfigError;
pub use layer::SchedulerConfigLayer;
pub use sections::*;
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, DEFAULT_CONFIG_PATH,
};

/// Fully resolved scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
	pub status: StatusConfig,
	pub logging: LoggingConfig,
	/// Jobs ordered by name.
	pub jobs: Vec<JobDefinition>,
}

/// Load configuration from defaults, the given file and the environment.
///
/// The binary passes [`DEFAULT_CONFIG_PATH`] unless told otherwise.
pub fn load_config_with_file(
	config_path: impl Into<PathBuf>,
) -> Result<SchedulerConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource::default()),
	];
	load_from_sources(sources)
}

/// Merge the given sources by precedence and finalize the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<SchedulerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = SchedulerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

fn finalize(layer: SchedulerConfigLayer) -> Result<SchedulerConfig, ConfigError> {
	let status = layer.status.unwrap_or_default().finalize()?;
	let logging = layer.logging.unwrap_or_default().finalize();

	let jobs = layer
		.jobs
		.into_iter()
		.map(|(name, job)| job.finalize(&name))
		.collect::<Result<Vec<_>, _>>()?;

	let config = SchedulerConfig {
		status,
		logging,
		jobs,
	};
	config.check_components()?;
	Ok(config)
}

impl SchedulerConfig {
	/// Enables only the named job and disables every other one.
	pub fn only_job(&mut self, name: &str) -> Result<(), ConfigError> {
		if !self.jobs.iter().any(|job| job.name() == name) {
			return Err(ConfigError::JobNotFound(name.to_string()));
		}
		self.jobs = self
			.jobs
			.iter()
			.map(|job| job.with_enabled(job.name() == name))
			.collect();
		self.check_components()
	}

	pub fn enabled_jobs(&self) -> impl Iterator<Item = &JobDefinition> {
		self.jobs.iter().filter(|job| job.enabled())
	}

	/// Two enabled jobs reporting to one component would overwrite each
	/// other's status.
	fn check_components(&self) -> Result<(), ConfigError> {
		let mut owners: BTreeMap<ComponentId, &str> = BTreeMap::new();
		for job in self.enabled_jobs() {
			if let Some(first) = owners.insert(job.component_id(), job.name()) {
				return Err(ConfigError::DuplicateComponent {
					component: job.component_id(),
					first: first.to_string(),
					second: job.name().to_string(),
				});
			}
		}
		Ok(())
	}
}

impl fmt::Display for SchedulerConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Status page:")?;
		writeln!(f, "    url = {}", self.status.url)?;
		writeln!(f, "    api_token = [REDACTED]")?;
		writeln!(f, "    request_timeout = {:?}", self.status.request_timeout)?;
		writeln!(f, "Logging:")?;
		writeln!(f, "    dir = {}", self.logging.dir.display())?;
		writeln!(f, "    level = {}", self.logging.level)?;
		write!(f, "Jobs ({}):", self.jobs.len())?;
		for job in &self.jobs {
			write!(f, "\n{job}")?;
		}
		Ok(())
	}
}
