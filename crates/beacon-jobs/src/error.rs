// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use beacon_status::StatusError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, JobError>;

#[derive(Debug, Error)]
pub enum JobError {
	#[error("job '{0}' is already registered")]
	DuplicateJob(String),

	#[error("scheduler has already been started")]
	AlreadyStarted,

	#[error("status page error: {0}")]
	Status(#[from] StatusError),
}
