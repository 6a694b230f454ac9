// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Logging configuration section.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_LOG_DIR: &str = "/var/log/beacon";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfigLayer {
	pub dir: Option<PathBuf>,
	pub level: Option<String>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.dir.is_some() {
			self.dir = other.dir;
		}
		if other.level.is_some() {
			self.level = other.level;
		}
	}

	pub fn finalize(self) -> LoggingConfig {
		LoggingConfig {
			dir: self.dir.unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
			level: self.level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
	pub dir: PathBuf,
	pub level: String,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		LoggingConfigLayer::default().finalize()
	}
}

impl LoggingConfig {
	/// Directory holding one log file per job.
	pub fn jobs_dir(&self) -> PathBuf {
		self.dir.join("jobs")
	}

	pub fn general_log_file(&self) -> PathBuf {
		self.dir.join("beacon.log")
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}
}
