// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use beacon_jobs_core::ComponentId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatusError>;

/// Errors raised at the status page boundary.
#[derive(Debug, Error)]
pub enum StatusError {
	#[error("API token is missing or empty")]
	InvalidApiToken,

	#[error("base URL is missing or empty")]
	InvalidBaseUrl,

	#[error("request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	#[error("component {id} not found")]
	ComponentNotFound { id: ComponentId },

	#[error("server error (HTTP {status}): {message}")]
	Server { status: u16, message: String },

	#[error("unexpected response: {0}")]
	InvalidResponse(String),
}
