// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for job definitions.

use std::time::Duration;

use thiserror::Error;

/// Result type for job definition operations.
pub type Result<T> = std::result::Result<T, DefinitionError>;

/// Reasons a job definition is rejected before scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
	#[error("job name must not be empty")]
	EmptyName,

	#[error("command must not be empty")]
	EmptyCommand,

	#[error("interval has to be greater than 0")]
	ZeroInterval,

	#[error("timeout has to be greater than 0")]
	ZeroTimeout,

	#[error("{field} must not exceed {max:?}")]
	TooLong { field: &'static str, max: Duration },

	#[error("max_attempts has to be at least 1")]
	ZeroAttempts,

	#[error("component_id has to be greater than 0")]
	InvalidComponentId,

	#[error("failure_status has to be greater than 0")]
	InvalidFailureStatus,
}
