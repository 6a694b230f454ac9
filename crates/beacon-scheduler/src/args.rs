// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use beacon_config::{LoggingConfig, DEFAULT_CONFIG_PATH};
use clap::Parser;

/// Beacon scheduler - runs health checks and keeps status page components in sync
#[derive(Parser, Debug)]
#[command(name = "beacon-scheduler", version)]
pub struct Args {
	/// Path to the configuration file
	#[arg(long, env = "BEACON_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
	pub config: PathBuf,

	/// Log to stdout at debug level and dump the loaded configuration
	#[arg(short, long)]
	pub debug: bool,

	/// Run only this job (implies --debug)
	#[arg(short, long, value_name = "NAME")]
	pub job: Option<String>,

	/// General log file, defaults to <log dir>/beacon.log
	#[arg(long, value_name = "PATH")]
	pub log_file: Option<PathBuf>,

	/// Log directory, overrides the configured one
	#[arg(long, value_name = "PATH")]
	pub log_dir: Option<PathBuf>,
}

impl Args {
	pub fn debug_enabled(&self) -> bool {
		self.debug || self.job.is_some()
	}

	pub fn log_file(&self, logging: &LoggingConfig) -> PathBuf {
		self.log_file
			.clone()
			.unwrap_or_else(|| logging.general_log_file())
	}
}
