// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cachet REST client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use beacon_jobs_core::ComponentId;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, error, info};

use crate::error::{Result, StatusError};
use crate::reporter::{ComponentStatus, NewIncident, StatusReporter};

const USER_AGENT: &str = concat!("beacon/", env!("CARGO_PKG_VERSION"));
const TOKEN_HEADER: &str = "X-Cachet-Token";

/// Cachet incident status "Investigating".
const INCIDENT_INVESTIGATING: u8 = 1;

/// Configuration for the Cachet client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
	/// Timeout for HTTP requests.
	pub request_timeout: Duration,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			request_timeout: Duration::from_secs(30),
		}
	}
}

/// Builder for constructing a [`CachetClient`].
pub struct CachetClientBuilder {
	api_token: Option<String>,
	base_url: Option<String>,
	config: ClientConfig,
}

impl CachetClientBuilder {
	pub fn new() -> Self {
		Self {
			api_token: None,
			base_url: None,
			config: ClientConfig::default(),
		}
	}

	/// Sets the Cachet API token sent with every request.
	pub fn api_token(mut self, token: impl Into<String>) -> Self {
		self.api_token = Some(token.into());
		self
	}

	/// Sets the base URL of the Cachet instance.
	///
	/// Example: `https://status.example.com`
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());
		self
	}

	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.config.request_timeout = timeout;
		self
	}

	pub fn build(self) -> Result<CachetClient> {
		let api_token = self
			.api_token
			.filter(|t| !t.trim().is_empty())
			.ok_or(StatusError::InvalidApiToken)?;
		let base_url = self
			.base_url
			.filter(|u| !u.trim().is_empty())
			.ok_or(StatusError::InvalidBaseUrl)?;

		// Normalize base URL
		let base_url = base_url.trim_end_matches('/').to_string();

		let http_client = Client::builder()
			.user_agent(USER_AGENT)
			.timeout(self.config.request_timeout)
			.build()
			.map_err(StatusError::RequestFailed)?;

		info!(base_url = %base_url, "Cachet client initialized");

		Ok(CachetClient {
			inner: Arc::new(CachetClientInner {
				api_token,
				base_url,
				http_client,
			}),
		})
	}
}

impl Default for CachetClientBuilder {
	fn default() -> Self {
		Self::new()
	}
}

struct CachetClientInner {
	api_token: String,
	base_url: String,
	http_client: Client,
}

/// [`StatusReporter`] backed by the Cachet v1 REST API.
///
/// # Example
///
/// ```ignore
/// let client = CachetClient::builder()
///     .base_url("https://status.example.com")
///     .api_token("token")
///     .build()?;
///
/// client.ping().await?;
/// let current = client.get_status(ComponentId(4)).await?;
/// ```
#[derive(Clone)]
pub struct CachetClient {
	inner: Arc<CachetClientInner>,
}

impl CachetClient {
	pub fn builder() -> CachetClientBuilder {
		CachetClientBuilder::new()
	}

	pub fn base_url(&self) -> &str {
		&self.inner.base_url
	}

	fn url(&self, path: &str) -> String {
		format!("{}/api/v1/{}", self.inner.base_url, path)
	}

	async fn check(response: Response, component: Option<ComponentId>) -> Result<Response> {
		if response.status() == StatusCode::NOT_FOUND {
			if let Some(id) = component {
				return Err(StatusError::ComponentNotFound { id });
			}
		}

		if !response.status().is_success() {
			let status = response.status().as_u16();
			let message = response.text().await.unwrap_or_default();
			error!(status, message = %message, "Cachet request failed");
			return Err(StatusError::Server { status, message });
		}

		Ok(response)
	}
}

#[async_trait]
impl StatusReporter for CachetClient {
	async fn ping(&self) -> Result<()> {
		let url = self.url("ping");
		debug!(url = %url, "Pinging Cachet");

		let response = self.inner.http_client.get(&url).send().await?;
		if response.status() != StatusCode::OK {
			let status = response.status().as_u16();
			let message = response.text().await.unwrap_or_default();
			return Err(StatusError::Server { status, message });
		}
		Ok(())
	}

	async fn get_status(&self, component: ComponentId) -> Result<ComponentStatus> {
		let url = self.url(&format!("components/{component}"));
		debug!(url = %url, component_id = %component, "Fetching component");

		let response = self
			.inner
			.http_client
			.get(&url)
			.header(TOKEN_HEADER, &self.inner.api_token)
			.send()
			.await?;
		let response = Self::check(response, Some(component)).await?;

		let body: Envelope<ComponentBody> = response
			.json()
			.await
			.map_err(|e| StatusError::InvalidResponse(e.to_string()))?;

		Ok(ComponentStatus {
			id: component,
			status: body.data.status,
			status_name: body.data.status_name.unwrap_or_default(),
		})
	}

	async fn set_status(&self, component: ComponentId, status: u32) -> Result<()> {
		let url = self.url(&format!("components/{component}"));
		debug!(url = %url, component_id = %component, status, "Updating component");

		let response = self
			.inner
			.http_client
			.put(&url)
			.header(TOKEN_HEADER, &self.inner.api_token)
			.json(&UpdateComponentRequest { status })
			.send()
			.await?;
		Self::check(response, Some(component)).await?;

		Ok(())
	}

	async fn create_incident(&self, incident: &NewIncident) -> Result<()> {
		let url = self.url("incidents");
		debug!(url = %url, component_id = %incident.component_id, "Creating incident");

		let request = CreateIncidentRequest {
			name: &incident.name,
			message: &incident.message,
			status: INCIDENT_INVESTIGATING,
			visible: 1,
			component_id: incident.component_id.0,
			component_status: incident.component_status,
		};

		let response = self
			.inner
			.http_client
			.post(&url)
			.header(TOKEN_HEADER, &self.inner.api_token)
			.json(&request)
			.send()
			.await?;
		Self::check(response, None).await?;

		Ok(())
	}
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
	data: T,
}

#[derive(Debug, Deserialize)]
struct ComponentBody {
	#[serde(deserialize_with = "status_code")]
	status: u32,
	#[serde(default)]
	status_name: Option<String>,
}

/// Cachet versions disagree on whether `status` is a number or a numeric string.
fn status_code<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw {
		Number(u32),
		Text(String),
	}

	match Raw::deserialize(deserializer)? {
		Raw::Number(n) => Ok(n),
		Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
	}
}

#[derive(Debug, Serialize)]
struct UpdateComponentRequest {
	status: u32,
}

#[derive(Debug, Serialize)]
struct CreateIncidentRequest<'a> {
	name: &'a str,
	message: &'a str,
	status: u8,
	visible: u8,
	component_id: u32,
	component_status: u32,
}
