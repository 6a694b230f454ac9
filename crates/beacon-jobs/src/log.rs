// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-job log sink.
//!
//! Every line is mirrored to `tracing` with a `job` field. When a log file is
//! attached the line is also appended there as `YYYY/MM/DD HH:MM:SS <message>`.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Local;
use tracing::{debug, warn};

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

#[derive(Clone)]
pub struct JobLog {
	job: Arc<str>,
	file: Option<Arc<LogFile>>,
}

struct LogFile {
	path: PathBuf,
	handle: Mutex<File>,
}

impl JobLog {
	/// Opens (or creates) `<dir>/<job>.log` in append mode.
	pub fn open(dir: &Path, job: &str) -> io::Result<Self> {
		let path = dir.join(format!("{job}.log"));
		let handle = OpenOptions::new().create(true).append(true).open(&path)?;
		Ok(Self {
			job: Arc::from(job),
			file: Some(Arc::new(LogFile {
				path,
				handle: Mutex::new(handle),
			})),
		})
	}

	/// A sink that only forwards to `tracing`.
	pub fn tracing_only(job: &str) -> Self {
		Self {
			job: Arc::from(job),
			file: None,
		}
	}

	pub fn job(&self) -> &str {
		&self.job
	}

	pub fn path(&self) -> Option<&Path> {
		self.file.as_ref().map(|f| f.path.as_path())
	}

	pub fn append(&self, message: impl AsRef<str>) {
		let message = message.as_ref();
		debug!(job = %self.job, "{message}");

		let Some(file) = &self.file else {
			return;
		};

		let line = format!("{} {}\n", Local::now().format(TIMESTAMP_FORMAT), message);
		let result = match file.handle.lock() {
			Ok(mut handle) => handle.write_all(line.as_bytes()),
			Err(poisoned) => poisoned.into_inner().write_all(line.as_bytes()),
		};
		if let Err(e) = result {
			warn!(job = %self.job, path = %file.path.display(), error = %e, "Failed to write job log");
		}
	}
}

impl std::fmt::Debug for JobLog {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("JobLog")
			.field("job", &self.job)
			.field("path", &self.path())
			.finish()
	}
}
