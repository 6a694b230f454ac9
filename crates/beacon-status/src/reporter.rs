// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use beacon_jobs_core::ComponentId;

use crate::error::Result;

/// Current state of a component as recorded by the status page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentStatus {
	pub id: ComponentId,
	pub status: u32,
	/// Human readable status, e.g. `Major Outage`.
	pub status_name: String,
}

/// An incident opened when a job drives its component into the failure status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIncident {
	pub component_id: ComponentId,
	pub component_status: u32,
	pub name: String,
	pub message: String,
}

/// Boundary to the external status-tracking service.
///
/// Implementations must be safe to share between job cycles; each job talks
/// to its own component only.
#[async_trait]
pub trait StatusReporter: Send + Sync {
	/// Checks that the service is reachable and answering.
	async fn ping(&self) -> Result<()>;

	async fn get_status(&self, component: ComponentId) -> Result<ComponentStatus>;

	async fn set_status(&self, component: ComponentId, status: u32) -> Result<()>;

	async fn create_incident(&self, incident: &NewIncident) -> Result<()>;
}
