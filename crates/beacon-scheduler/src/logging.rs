// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

/// Sets up the global subscriber. Debug mode logs to stdout; otherwise output
/// is appended to `log_file` without colours. `RUST_LOG` wins over `level`.
pub fn init(debug: bool, level: &str, log_file: &Path) -> anyhow::Result<()> {
	let default_level = if debug { "debug" } else { level };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	if debug {
		tracing_subscriber::fmt().with_env_filter(filter).init();
		return Ok(());
	}

	let file = open_log_file(log_file)?;
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_ansi(false)
		.with_writer(Mutex::new(file))
		.init();
	Ok(())
}

fn open_log_file(path: &Path) -> anyhow::Result<File> {
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		fs::create_dir_all(parent)
			.with_context(|| format!("creating log directory {}", parent.display()))?;
	}
	OpenOptions::new()
		.create(true)
		.append(true)
		.open(path)
		.with_context(|| format!("opening log file {}", path.display()))
}
