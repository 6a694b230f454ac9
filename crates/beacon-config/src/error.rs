// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use beacon_jobs_core::{ComponentId, DefinitionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read config file {path}: {source}")]
	FileRead {
		path: PathBuf,
		source: std::io::Error,
	},

	#[error("failed to parse config file {path}: {source}")]
	TomlParse {
		path: PathBuf,
		source: toml::de::Error,
	},

	#[error("missing required setting: {0}")]
	Missing(String),

	#[error("invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },

	#[error("job '{job}' configuration error: {source}")]
	InvalidJob {
		job: String,
		source: DefinitionError,
	},

	#[error("jobs '{first}' and '{second}' both report to component {component}")]
	DuplicateComponent {
		component: ComponentId,
		first: String,
		second: String,
	},

	#[error("job '{0}' not found")]
	JobNotFound(String),
}
