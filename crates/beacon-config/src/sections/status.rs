// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Status page connection section.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StatusConfigLayer {
	pub url: Option<String>,
	pub api_token: Option<String>,
	pub request_timeout_secs: Option<u64>,
}

impl fmt::Debug for StatusConfigLayer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StatusConfigLayer")
			.field("url", &self.url)
			.field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
			.field("request_timeout_secs", &self.request_timeout_secs)
			.finish()
	}
}

impl StatusConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.url.is_some() {
			self.url = other.url;
		}
		if other.api_token.is_some() {
			self.api_token = other.api_token;
		}
		if other.request_timeout_secs.is_some() {
			self.request_timeout_secs = other.request_timeout_secs;
		}
	}

	pub fn finalize(self) -> Result<StatusConfig, ConfigError> {
		let url = self
			.url
			.filter(|u| !u.trim().is_empty())
			.ok_or_else(|| ConfigError::Missing("status.url".to_string()))?;
		let api_token = self
			.api_token
			.filter(|t| !t.is_empty())
			.ok_or_else(|| ConfigError::Missing("status.api_token".to_string()))?;
		let timeout_secs = self
			.request_timeout_secs
			.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
		if timeout_secs == 0 {
			return Err(ConfigError::InvalidValue {
				key: "status.request_timeout_secs".to_string(),
				message: "has to be greater than 0".to_string(),
			});
		}

		Ok(StatusConfig {
			url,
			api_token,
			request_timeout: Duration::from_secs(timeout_secs),
		})
	}
}

#[derive(Clone, PartialEq)]
pub struct StatusConfig {
	pub url: String,
	pub api_token: String,
	pub request_timeout: Duration,
}

impl fmt::Debug for StatusConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StatusConfig")
			.field("url", &self.url)
			.field("api_token", &"[REDACTED]")
			.field("request_timeout", &self.request_timeout)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn layer() -> StatusConfigLayer {
		StatusConfigLayer {
			url: Some("https://status.example.com".to_string()),
			api_token: Some("secret-token".to_string()),
			request_timeout_secs: None,
		}
	}

	#[test]
	fn test_finalize_defaults_timeout() {
		let config = layer().finalize().unwrap();
		assert_eq!(config.url, "https://status.example.com");
		assert_eq!(config.request_timeout, Duration::from_secs(30));
	}

	#[test]
	fn test_missing_url() {
		let layer = StatusConfigLayer {
			url: None,
			..layer()
		};
		match layer.finalize() {
			Err(ConfigError::Missing(key)) => assert_eq!(key, "status.url"),
			other => panic!("Expected Missing error, got: {:?}", other),
		}
	}

	#[test]
	fn test_empty_token_counts_as_missing() {
		let layer = StatusConfigLayer {
			api_token: Some(String::new()),
			..layer()
		};
		match layer.finalize() {
			Err(ConfigError::Missing(key)) => assert_eq!(key, "status.api_token"),
			other => panic!("Expected Missing error, got: {:?}", other),
		}
	}

	#[test]
	fn test_zero_request_timeout_rejected() {
		let layer = StatusConfigLayer {
			request_timeout_secs: Some(0),
			..layer()
		};
		assert!(matches!(
			layer.finalize(),
			Err(ConfigError::InvalidValue { .. })
		));
	}

	#[test]
	fn test_debug_redacts_token() {
		let config = layer().finalize().unwrap();
		let debug = format!("{config:?}");
		assert!(!debug.contains("secret-token"));
		assert!(debug.contains("[REDACTED]"));

		let debug = format!("{:?}", layer());
		assert!(!debug.contains("secret-token"));
	}

	#[test]
	fn test_merge_keeps_unset_fields() {
		let mut base = layer();
		base.merge(StatusConfigLayer {
			url: Some("https://other.example.com".to_string()),
			..Default::default()
		});
		assert_eq!(base.url.as_deref(), Some("https://other.example.com"));
		assert_eq!(base.api_token.as_deref(), Some("secret-token"));
	}
}
