// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::SchedulerConfigLayer;
use crate::sections::{LoggingConfigLayer, StatusConfigLayer};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/beacon/config.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<SchedulerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<SchedulerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(SchedulerConfigLayer::default())
	}
}

/// TOML file configuration source. The file must exist: it is the only place
/// jobs can be declared.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<SchedulerConfigLayer, ConfigError> {
		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: SchedulerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!(jobs = layer.jobs.len(), "parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: BEACON_<SECTION>_<FIELD>. Jobs are only configurable from the
/// file.
#[derive(Default)]
pub struct EnvSource {
	vars: Option<HashMap<String, String>>,
}

impl EnvSource {
	/// Reads from a fixed set of variables instead of the process environment.
	pub fn from_vars<I, K, V>(vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			vars: Some(
				vars.into_iter()
					.map(|(k, v)| (k.into(), v.into()))
					.collect(),
			),
		}
	}

	fn var(&self, name: &str) -> Option<String> {
		let value = match &self.vars {
			Some(vars) => vars.get(name).cloned(),
			None => std::env::var(name).ok(),
		};
		value.filter(|s| !s.is_empty())
	}

	fn var_u64(&self, name: &str) -> Result<Option<u64>, ConfigError> {
		match self.var(name) {
			Some(v) => v
				.parse::<u64>()
				.map(Some)
				.map_err(|_| ConfigError::InvalidValue {
					key: name.to_string(),
					message: format!("invalid u64 value '{v}'"),
				}),
			None => Ok(None),
		}
	}

	fn load_status(&self) -> Result<StatusConfigLayer, ConfigError> {
		Ok(StatusConfigLayer {
			url: self.var("BEACON_STATUS_URL"),
			api_token: self.var("BEACON_STATUS_API_TOKEN"),
			request_timeout_secs: self.var_u64("BEACON_STATUS_REQUEST_TIMEOUT_SECS")?,
		})
	}

	fn load_logging(&self) -> LoggingConfigLayer {
		LoggingConfigLayer {
			dir: self.var("BEACON_LOG_DIR").map(PathBuf::from),
			level: self.var("BEACON_LOG_LEVEL"),
		}
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<SchedulerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(SchedulerConfigLayer {
			status: Some(self.load_status()?),
			logging: Some(self.load_logging()),
			jobs: Default::default(),
		})
	}
}
